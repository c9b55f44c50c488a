use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub booking_rules: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// Hard-lease duration granted by a successful lock request.
    #[serde(default = "default_lease_seconds")]
    pub lease_seconds: u64,
    /// How often the reconciler sweeps expired leases back to available.
    #[serde(default = "default_reconcile_interval_seconds")]
    pub reconcile_interval_seconds: u64,
    /// TTL of advisory seat selections (UX hints only).
    #[serde(default = "default_selection_ttl_seconds")]
    pub selection_ttl_seconds: u64,
}

fn default_lease_seconds() -> u64 {
    600
}
fn default_reconcile_interval_seconds() -> u64 {
    300
}
fn default_selection_ttl_seconds() -> u64 {
    90
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret used to sign lock tokens (HS256).
    pub token_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // E.g. RUTA__SERVER__PORT=9000
            .add_source(config::Environment::with_prefix("RUTA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
