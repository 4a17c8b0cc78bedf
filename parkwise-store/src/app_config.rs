use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// File name of the parking database, kept next to the executable unless overridden.
pub const DEFAULT_DB_FILE: &str = "parking.db";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub billing: BillingConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    pub rate_per_minute: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Rows shown by the recent-sessions listing when the caller gives no limit.
    pub recent_limit: u32,
}

impl DatabaseConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DB_FILE)))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `PARKWISE__BILLING__RATE_PER_MINUTE=1.5`
            .add_source(config::Environment::with_prefix("PARKWISE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.acquire_timeout_secs", 3_i64)?
            .set_default("billing.rate_per_minute", parkwise_core::billing::DEFAULT_RATE_PER_MINUTE)?
            .set_default("ledger.recent_limit", 50_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_without_files() {
        let config: Config = Config::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.billing.rate_per_minute, 1.0);
        assert_eq!(config.ledger.recent_limit, 50);
        assert!(config.database.path.is_none());
        assert!(config.database.resolved_path().ends_with(DEFAULT_DB_FILE));
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let db = DatabaseConfig {
            path: Some(PathBuf::from("/tmp/lot.db")),
            acquire_timeout_secs: 3,
        };
        assert_eq!(db.resolved_path(), PathBuf::from("/tmp/lot.db"));
        assert_eq!(db.acquire_timeout(), Duration::from_secs(3));
    }
}
