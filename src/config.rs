use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret used to decode the tenant claim from bearer tokens.
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Point values for each match criterion. A criterion contributes either
/// 0 or its full weight; the defaults sum to 100.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_destination_weight")]
    pub destination: u32,
    #[serde(default = "default_budget_weight")]
    pub budget: u32,
    #[serde(default = "default_duration_weight")]
    pub duration: u32,
    #[serde(default = "default_dates_weight")]
    pub dates: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            destination: default_destination_weight(),
            budget: default_budget_weight(),
            duration: default_duration_weight(),
            dates: default_dates_weight(),
        }
    }
}

fn default_destination_weight() -> u32 { 50 }
fn default_budget_weight() -> u32 { 25 }
fn default_duration_weight() -> u32 { 20 }
fn default_dates_weight() -> u32 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with ITINERA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with ITINERA_)
            // e.g., ITINERA_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ITINERA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ITINERA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Substitute well-known environment variables into config values.
/// DATABASE_URL and JWT_SECRET are conventionally set bare in deployment
/// environments, so they win over file-based values when present.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("ITINERA_DATABASE__URL"))
        .ok();

    let jwt_secret = env::var("JWT_SECRET")
        .or_else(|_| env::var("ITINERA_AUTH__JWT_SECRET"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = database_url {
        builder = builder.set_override("database.url", url)?;
    }
    if let Some(secret) = jwt_secret {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.destination, 50);
        assert_eq!(weights.budget, 25);
        assert_eq!(weights.duration, 20);
        assert_eq!(weights.dates, 5);
        // Defaults cover the full 0-100 score range
        assert_eq!(
            weights.destination + weights.budget + weights.duration + weights.dates,
            100
        );
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
