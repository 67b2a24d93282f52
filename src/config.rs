use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::MAX_DISPLAY_PRECISION;
use crate::services::DuplicatePolicy;

/// Prefix of environment overrides, e.g. `GEO_NEAREST__SERVER__PORT`
pub const ENV_PREFIX: &str = "GEO_NEAREST";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub matching: MatchingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Largest source or target set accepted over HTTP
    #[serde(default = "default_max_points")]
    pub max_points_per_set: usize,
    /// Decimals shown for distances
    #[serde(default = "default_precision")]
    pub display_precision: u32,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_points_per_set: default_max_points(),
            display_precision: default_precision(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

fn default_max_points() -> usize { 10_000 }
fn default_precision() -> u32 { 2 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with GEO_NEAREST__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize::<Self>()?
            .checked()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize::<Self>()?
            .checked()
    }

    /// Reject values that deserialize but cannot be used
    pub fn checked(self) -> Result<Self, ConfigError> {
        if self.matching.display_precision > MAX_DISPLAY_PRECISION {
            return Err(ConfigError::Message(format!(
                "matching.display_precision must be at most {}, got {}",
                MAX_DISPLAY_PRECISION, self.matching.display_precision
            )));
        }
        if self.matching.max_points_per_set == 0 {
            return Err(ConfigError::Message(
                "matching.max_points_per_set must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

// e.g., GEO_NEAREST__SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.matching.max_points_per_set, 10_000);
        assert_eq!(settings.matching.display_precision, 2);
        assert_eq!(settings.matching.duplicate_policy, DuplicatePolicy::Warn);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
            [matching]
            display_precision = 4
            duplicate_policy = "reject"

            [logging]
            format = "pretty"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.matching.display_precision, 4);
        assert_eq!(settings.matching.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(settings.matching.max_points_per_set, 10_000);
        assert_eq!(settings.logging.format, "pretty");
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn test_environment_overrides_file() {
        let vars = [
            ("GEO_NEAREST__MATCHING__DUPLICATE_POLICY", "reject"),
            ("GEO_NEAREST__SERVER__PORT", "9090"),
            ("OTHER__SERVER__PORT", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings: Settings = Config::builder()
            .add_source(File::from_str("[server]\nport = 7070\n", FileFormat::Toml))
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.matching.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(settings.server.port, 9090);
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir().join(format!("geo-nearest-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[matching]\nmax_points_per_set = 25\n").unwrap();

        let settings = Settings::load_from(&path);
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.matching.max_points_per_set, 25);
        assert_eq!(settings.matching.display_precision, 2);
    }

    #[test]
    fn test_rejects_unusable_precision() {
        let mut settings = Settings::default();
        settings.matching.display_precision = MAX_DISPLAY_PRECISION;
        assert!(settings.clone().checked().is_ok());

        settings.matching.display_precision = 400;
        let err = settings.checked().unwrap_err();
        assert!(err.to_string().contains("display_precision"));
    }
}
