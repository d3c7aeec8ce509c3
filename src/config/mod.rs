//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "SINGLETABLE_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "SINGLETABLE";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "SINGLETABLE_LOG";

use serde::Deserialize;

use crate::resolver::ResolverConfig;
use crate::storage::StorageConfig;
use crate::utils::retry::RetryConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend selection and backend-specific settings.
    pub storage: StorageConfig,
    /// Resolver behavior (type policy).
    pub resolver: ResolverConfig,
    /// Optional retry layer around the store.
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        Ok(config)
    }

    /// Create config for testing: in-memory storage, no retries.
    pub fn for_test() -> Self {
        let mut config = Self::default();
        config.storage.storage_type = crate::storage::StorageType::Memory;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TypePolicy;
    use crate::storage::StorageType;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.resolver.type_policy, TypePolicy::Verify);
        assert!(!config.retry.enabled);
        assert_eq!(config.storage.timeout_ms, 0);
    }

    #[test]
    fn test_config_for_test() {
        let config = Config::for_test();
        assert_eq!(config.storage.storage_type, StorageType::Memory);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
storage:
  type: memory
  timeout_ms: 250
resolver:
  type_policy: force
retry:
  enabled: true
  max_times: 2
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert_eq!(config.storage.timeout_ms, 250);
        assert_eq!(config.resolver.type_policy, TypePolicy::Force);
        assert!(config.retry.enabled);
        assert_eq!(config.retry.max_times, 2);
        assert_eq!(config.retry.min_delay_ms, 50);
    }

    #[test]
    #[serial]
    fn test_load_from_path() {
        let file = write_config("storage:\n  type: memory\nresolver:\n  type_policy: trust\n");

        let config = Config::load(file.path().to_str()).unwrap();

        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert_eq!(config.resolver.type_policy, TypePolicy::Trust);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config("storage:\n  type: memory\n  timeout_ms: 100\n");
        std::env::set_var("SINGLETABLE__STORAGE__TIMEOUT_MS", "900");

        let result = Config::load(file.path().to_str());
        std::env::remove_var("SINGLETABLE__STORAGE__TIMEOUT_MS");

        let config = result.unwrap();
        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert_eq!(config.storage.timeout_ms, 900);
    }

    #[test]
    #[serial]
    fn test_missing_explicit_path_is_error() {
        assert!(Config::load(Some("/nonexistent/singletable.yaml")).is_err());
    }
}
