use std::env;

use cashfree_tools::CashfreeConfig;
use chrono::Duration;
use log::*;
use shiprocket_tools::ShiprocketConfig;

const DEFAULT_CHK_HOST: &str = "127.0.0.1";
const DEFAULT_CHK_PORT: u16 = 4040;
const DEFAULT_PROCESSING_KEY_TTL_MINUTES: i64 = 60;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How long an issued processing key stays valid. Expired keys are rejected at verification time and
    /// periodically swept from the store.
    pub processing_key_ttl: Duration,
    /// When false, webhook HMAC signature checks are skipped. Only ever disable this in testing.
    pub hmac_checks: bool,
    pub cashfree: CashfreeConfig,
    pub shiprocket: ShiprocketConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CHK_HOST.to_string(),
            port: DEFAULT_CHK_PORT,
            database_url: String::default(),
            processing_key_ttl: Duration::minutes(DEFAULT_PROCESSING_KEY_TTL_MINUTES),
            hmac_checks: true,
            cashfree: CashfreeConfig::default(),
            shiprocket: ShiprocketConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CHK_HOST").ok().unwrap_or_else(|| DEFAULT_CHK_HOST.into());
        let port = env::var("CHK_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CHK_PORT. {e} Using the default, {DEFAULT_CHK_PORT}, \
                         instead."
                    );
                    DEFAULT_CHK_PORT
                })
            })
            .unwrap_or(DEFAULT_CHK_PORT);
        let database_url = env::var("CHK_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ CHK_DATABASE_URL is not set. Using the default, sqlite://data/checkout_store.db");
            "sqlite://data/checkout_store.db".to_string()
        });
        let processing_key_ttl = env::var("CHK_PROCESSING_KEY_TTL")
            .map(|s| {
                s.parse::<i64>().map(Duration::minutes).unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid number of minutes for CHK_PROCESSING_KEY_TTL. {e} Using the \
                         default, {DEFAULT_PROCESSING_KEY_TTL_MINUTES} minutes, instead."
                    );
                    Duration::minutes(DEFAULT_PROCESSING_KEY_TTL_MINUTES)
                })
            })
            .unwrap_or_else(|_| Duration::minutes(DEFAULT_PROCESSING_KEY_TTL_MINUTES));
        let hmac_checks = env::var("CHK_DISABLE_HMAC_CHECKS")
            .map(|s| !matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);
        if !hmac_checks {
            warn!("🪛️ Webhook HMAC checks are DISABLED. Do not run this configuration in production.");
        }
        let cashfree = CashfreeConfig::new_from_env_or_default();
        let shiprocket = ShiprocketConfig::new_from_env_or_default();
        Self { host, port, database_url, processing_key_ttl, hmac_checks, cashfree, shiprocket }
    }
}
