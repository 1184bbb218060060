//! Configuration for the generators.
//!
//! Supports a YAML file and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "WRAPGEN_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "wrapgen.yaml";

/// Generator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output package naming.
    pub output: OutputConfig,
    /// Go toolchain layout used to find imported packages.
    pub go: GoConfig,
    /// Monitoring decorator settings.
    pub monitoring: MonitoringConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the source package name to form the output package.
    pub package_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            package_suffix: "mws".to_string(),
        }
    }
}

/// Go toolchain layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoConfig {
    /// GOROOT; standard library packages live under `<root>/src`.
    pub root: Option<PathBuf>,
    /// GOPATH entries; packages live under `<entry>/src`.
    pub path: Vec<PathBuf>,
}

/// Monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Label key attached to every metric observation.
    pub label: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            label: "operation".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (`explicit`, else `WRAPGEN_CONFIG`, else `wrapgen.yaml`)
    /// 3. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = std::env::var(CONFIG_ENV)
                    .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
                if Path::new(&config_path).exists() {
                    Self::from_file(Path::new(&config_path))?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let suffix = &self.output.package_suffix;
        if !suffix.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(ConfigError::Invalid(format!(
                "output.package_suffix must be a Go identifier fragment, got {:?}",
                suffix
            )));
        }
        if self.monitoring.label.is_empty() {
            return Err(ConfigError::Invalid(
                "monitoring.label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(root) = std::env::var_os("GOROOT") {
            self.go.root = Some(PathBuf::from(root));
        }

        if let Some(gopath) = std::env::var_os("GOPATH") {
            self.go.path = std::env::split_paths(&gopath).collect();
        }

        if let Ok(suffix) = std::env::var("WRAPGEN_PACKAGE_SUFFIX") {
            self.output.package_suffix = suffix;
        }

        if self.go.root.is_none() {
            let fallback = Path::new("/usr/local/go");
            if fallback.join("src").is_dir() {
                self.go.root = Some(fallback.to_path_buf());
            }
        }

        if self.go.path.is_empty() {
            if let Some(home) = std::env::var_os("HOME") {
                self.go.path.push(PathBuf::from(home).join("go"));
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.package_suffix, "mws");
        assert_eq!(config.monitoring.label, "operation");
        assert!(config.go.root.is_none());
        assert!(config.go.path.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
output:
  package_suffix: wrappers

go:
  root: /opt/go
  path:
    - /home/dev/go
    - /srv/go

monitoring:
  label: method
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.output.package_suffix, "wrappers");
        assert_eq!(config.go.root, Some(PathBuf::from("/opt/go")));
        assert_eq!(config.go.path.len(), 2);
        assert_eq!(config.monitoring.label, "method");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("monitoring:\n  label: op\n").unwrap();
        assert_eq!(config.output.package_suffix, "mws");
        assert_eq!(config.monitoring.label, "op");
    }

    #[test]
    fn test_invalid_suffix_rejected() {
        let err = Config::from_yaml("output:\n  package_suffix: \"a-b\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/wrapgen.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_, _)));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("GOROOT", "/env/goroot");
        std::env::set_var("WRAPGEN_PACKAGE_SUFFIX", "wrapped");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.go.root, Some(PathBuf::from("/env/goroot")));
        assert_eq!(config.output.package_suffix, "wrapped");

        std::env::remove_var("GOROOT");
        std::env::remove_var("WRAPGEN_PACKAGE_SUFFIX");
    }

    #[test]
    #[serial]
    fn test_env_suffix_is_validated() {
        std::env::remove_var(CONFIG_ENV);
        std::env::set_var("WRAPGEN_PACKAGE_SUFFIX", "a-b");
        let result = Config::load(None);
        std::env::remove_var("WRAPGEN_PACKAGE_SUFFIX");

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
