//! Configuration management for node-cleanup
//!
//! Settings are resolved from, in increasing priority:
//! 1. Default values
//! 2. Configuration file (TOML format)
//! 3. Environment variables
//! 4. Command-line flags (applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Kubeconfig file; inferred by kube when unset
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context; the current context when unset
    pub context: Option<String>,
    /// Label selector restricting which nodes are considered
    pub label_selector: Option<String>,
    /// Only report what would have been deleted
    pub dry_run: bool,
    /// Report format (table, json, yaml)
    pub output: String,
    /// Logging configuration
    pub logging: LoggingSettings,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            label_selector: None,
            dry_run: false,
            output: "table".to_string(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level used without `--verbose` (trace, debug, info, warn, error)
    pub level: String,
    /// Use JSON formatting on the console
    pub json: bool,
    /// Directory for an additional log file
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            directory: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

const VALID_OUTPUTS: [&str; 4] = ["table", "json", "yaml", "yml"];
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl CleanupConfig {
    /// Load configuration from an explicit file, or the standard locations
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            // An explicitly requested file must exist
            Some(path) => Self::load_from_file(path)?,
            None => match Self::find_config_file() {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("NODE_CLEANUP_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/node-cleanup/config.toml")),
            Some(PathBuf::from("./node-cleanup.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(path) = lookup("NODE_CLEANUP_KUBECONFIG") {
            self.kubeconfig = Some(PathBuf::from(path));
        }
        if let Some(context) = lookup("NODE_CLEANUP_CONTEXT") {
            self.context = Some(context);
        }
        if let Some(selector) = lookup("NODE_CLEANUP_SELECTOR") {
            self.label_selector = Some(selector);
        }
        if let Some(dry_run) = lookup("NODE_CLEANUP_DRY_RUN") {
            self.dry_run = dry_run.parse().unwrap_or(self.dry_run);
        }
        if let Some(dir) = lookup("NODE_CLEANUP_LOG_DIR") {
            self.logging.directory = Some(PathBuf::from(dir));
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_OUTPUTS.contains(&self.output.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown output format '{}'",
                self.output
            )));
        }

        if !VALID_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        if matches!(&self.label_selector, Some(s) if s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "Label selector cannot be empty".to_string(),
            ));
        }

        if matches!(&self.context, Some(c) if c.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "Context cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CleanupConfig::default();
        assert!(!config.dry_run);
        assert_eq!(config.output, "table");
        assert_eq!(config.logging.level, "warn");
        assert!(config.kubeconfig.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
kubeconfig = "/etc/kubernetes/admin.conf"
context = "prod"
label_selector = "node-role.kubernetes.io/worker"
output = "json"

[logging]
json = true
"#
        )
        .unwrap();

        let config = CleanupConfig::load_from_file(file.path()).unwrap();
        assert_eq!(
            config.kubeconfig,
            Some(PathBuf::from("/etc/kubernetes/admin.conf"))
        );
        assert_eq!(config.context.as_deref(), Some("prod"));
        assert_eq!(
            config.label_selector.as_deref(),
            Some("node-role.kubernetes.io/worker")
        );
        assert_eq!(config.output, "json");
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.dry_run);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = CleanupConfig::load(Some(Path::new("/nonexistent/node-cleanup.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(..)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dry_run = \"sometimes").unwrap();
        let err = CleanupConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("NODE_CLEANUP_CONTEXT", "staging"),
            ("NODE_CLEANUP_SELECTOR", "pool=spot"),
            ("NODE_CLEANUP_DRY_RUN", "true"),
            ("NODE_CLEANUP_LOG_DIR", "/var/log/node-cleanup"),
        ]
        .into_iter()
        .collect();

        let mut config = CleanupConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.context.as_deref(), Some("staging"));
        assert_eq!(config.label_selector.as_deref(), Some("pool=spot"));
        assert!(config.dry_run);
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/var/log/node-cleanup"))
        );
        assert!(config.kubeconfig.is_none());
    }

    #[test]
    fn test_unparsable_dry_run_override_is_ignored() {
        let mut config = CleanupConfig::default();
        config.apply_overrides(|key| (key == "NODE_CLEANUP_DRY_RUN").then(|| "yes".to_string()));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_config_validation() {
        let mut bad_output = CleanupConfig::default();
        bad_output.output = "xml".to_string();
        assert!(bad_output.validate().is_err());

        let mut bad_level = CleanupConfig::default();
        bad_level.logging.level = "loud".to_string();
        assert!(bad_level.validate().is_err());

        let mut empty_selector = CleanupConfig::default();
        empty_selector.label_selector = Some("  ".to_string());
        assert!(empty_selector.validate().is_err());

        let mut empty_context = CleanupConfig::default();
        empty_context.context = Some(String::new());
        assert!(empty_context.validate().is_err());
    }
}
