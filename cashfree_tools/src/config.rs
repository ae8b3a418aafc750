use checkout_common::Secret;
use log::*;

#[derive(Debug, Clone, Default)]
pub struct CashfreeConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub api_version: String,
    /// Where Cashfree redirects the customer after payment. `{order_id}` is substituted by Cashfree.
    pub return_url: String,
    /// Where Cashfree posts webhook notifications.
    pub notify_url: String,
}

impl CashfreeConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("CHK_CASHFREE_BASE_URL").unwrap_or_else(|_| {
            warn!("CHK_CASHFREE_BASE_URL not set, using the sandbox environment");
            "https://sandbox.cashfree.com/pg".to_string()
        });
        let client_id = std::env::var("CHK_CASHFREE_CLIENT_ID").unwrap_or_else(|_| {
            warn!("CHK_CASHFREE_CLIENT_ID not set, using (probably useless) default");
            "TEST00000000000000000000".to_string()
        });
        let client_secret = Secret::new(std::env::var("CHK_CASHFREE_CLIENT_SECRET").unwrap_or_else(|_| {
            warn!("CHK_CASHFREE_CLIENT_SECRET not set, using (probably useless) default");
            "cfsk_ma_test_00000000000000".to_string()
        }));
        let api_version = std::env::var("CHK_CASHFREE_API_VERSION").unwrap_or_else(|_| {
            warn!("CHK_CASHFREE_API_VERSION not set, using 2022-01-01 as default");
            "2022-01-01".to_string()
        });
        let return_url = std::env::var("CHK_CASHFREE_RETURN_URL").unwrap_or_else(|_| {
            warn!("CHK_CASHFREE_RETURN_URL not set, using (probably useless) default");
            "http://localhost:3000/payment/{order_id}".to_string()
        });
        let notify_url = std::env::var("CHK_CASHFREE_NOTIFY_URL").unwrap_or_else(|_| {
            warn!("CHK_CASHFREE_NOTIFY_URL not set, using (probably useless) default");
            "http://localhost:4040/webhook/cashfree".to_string()
        });
        Self { base_url, client_id, client_secret, api_version, return_url, notify_url }
    }
}
