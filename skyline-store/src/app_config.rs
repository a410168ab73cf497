use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Share of price_paid returned on cancellation.
    #[serde(default = "default_refund_rate")]
    pub refund_rate: f64,
    /// PENDING_PAYMENT bookings older than this are garbage-collected.
    #[serde(default = "default_pending_ttl")]
    pub pending_ttl_seconds: u64,
    /// Demand simulator sweep interval.
    #[serde(default = "default_demand_interval")]
    pub demand_interval_seconds: u64,
    #[serde(default = "default_demand_min")]
    pub demand_factor_min: f64,
    #[serde(default = "default_demand_max")]
    pub demand_factor_max: f64,
}

fn default_refund_rate() -> f64 {
    0.80
}
fn default_pending_ttl() -> u64 {
    900
}
fn default_demand_interval() -> u64 {
    300
}
fn default_demand_min() -> f64 {
    0.9
}
fn default_demand_max() -> f64 {
    1.1
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SKYLINE__SERVER__PORT=9000` overrides server.port
            .add_source(config::Environment::with_prefix("SKYLINE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
