use checkout_common::Secret;
use log::*;

#[derive(Debug, Clone, Default)]
pub struct ShiprocketConfig {
    pub base_url: String,
    pub email: String,
    pub password: Secret<String>,
    /// The pickup location nickname registered with Shiprocket.
    pub pickup_location: String,
    /// The sales channel orders are created under.
    pub channel_id: String,
}

impl ShiprocketConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("CHK_SHIPROCKET_BASE_URL").unwrap_or_else(|_| {
            info!("CHK_SHIPROCKET_BASE_URL not set, using the production API");
            "https://apiv2.shiprocket.in/v1/external".to_string()
        });
        let email = std::env::var("CHK_SHIPROCKET_EMAIL").unwrap_or_else(|_| {
            warn!("CHK_SHIPROCKET_EMAIL not set, using (probably useless) default");
            "ops@example.com".to_string()
        });
        let password = Secret::new(std::env::var("CHK_SHIPROCKET_PASSWORD").unwrap_or_else(|_| {
            warn!("CHK_SHIPROCKET_PASSWORD not set, using (probably useless) default");
            "password".to_string()
        }));
        let pickup_location = std::env::var("CHK_SHIPROCKET_PICKUP_LOCATION").unwrap_or_else(|_| {
            warn!("CHK_SHIPROCKET_PICKUP_LOCATION not set, using Home as default");
            "Home".to_string()
        });
        let channel_id = std::env::var("CHK_SHIPROCKET_CHANNEL_ID").unwrap_or_else(|_| {
            warn!("CHK_SHIPROCKET_CHANNEL_ID not set, using (probably useless) default");
            "5794009".to_string()
        });
        Self { base_url, email, password, pickup_location, channel_id }
    }
}
