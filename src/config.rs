use anyhow::{anyhow, Result};
use thiserror::Error;

/// The management endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// This trait describes interaction with the configuration for webapps.
pub trait Config: Send + Sync {
    /// Returns a value from the configuration by its key.
    fn get(&self, key: &str) -> Result<String>;
    /// Returns a value from the configuration by its key, with the source.
    fn get_with_source(&self, key: &str) -> Result<(String, String)>;
    /// Sets a value in the configuration by its key.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Check if the configuration can be written to for the given key.
    fn check_writable(&self, key: &str) -> Result<()>;

    /// Write the configuration.
    fn write(&self) -> Result<()>;

    /// Return the string representation of the config.
    fn config_to_string(&self) -> Result<String>;
}

pub struct ConfigOption {
    pub key: String,
    pub description: String,
    pub default_value: String,
    pub allowed_values: Vec<String>,
}

pub fn config_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption {
            key: "subscription".to_string(),
            description: "the subscription id that owns the web apps".to_string(),
            default_value: "".to_string(),
            allowed_values: vec![],
        },
        ConfigOption {
            key: "endpoint".to_string(),
            description: "the base URL of the management service".to_string(),
            default_value: DEFAULT_ENDPOINT.to_string(),
            allowed_values: vec![],
        },
        ConfigOption {
            key: "token".to_string(),
            description: "the bearer token used to authenticate requests".to_string(),
            default_value: "".to_string(),
            allowed_values: vec![],
        },
        ConfigOption {
            key: "prompt".to_string(),
            description: "toggle interactive prompting in the terminal".to_string(),
            default_value: "enabled".to_string(),
            allowed_values: vec!["enabled".to_string(), "disabled".to_string()],
        },
        ConfigOption {
            key: "format".to_string(),
            description: "the default output format for listings".to_string(),
            default_value: "table".to_string(),
            allowed_values: crate::types::FormatOutput::variants(),
        },
    ]
}

pub fn default_value(key: &str) -> Option<String> {
    config_options()
        .into_iter()
        .find(|o| o.key == key)
        .map(|o| o.default_value)
}

pub fn validate_key(key: &str) -> Result<()> {
    for config_key in config_options() {
        if key == config_key.key {
            return Ok(());
        }
    }

    Err(anyhow!("invalid key"))
}

#[derive(Error, Debug)]
pub enum InvalidValueError {
    #[error("invalid values, valid values: {0:?}")]
    ValidValues(Vec<String>),
}

pub fn validate_value(key: &str, value: &str) -> Result<()> {
    let valid_values = config_options()
        .into_iter()
        .find(|o| o.key == key)
        .map(|o| o.allowed_values)
        .unwrap_or_default();

    if valid_values.is_empty() || valid_values.iter().any(|v| v == value) {
        return Ok(());
    }

    Err(InvalidValueError::ValidValues(valid_values).into())
}

pub fn new_blank_config() -> Result<crate::config_from_file::FileConfig> {
    Ok(crate::config_from_file::FileConfig {
        map: crate::config_map::ConfigMap {
            root: toml_edit::Table::new(),
        },
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("subscription").is_ok());
        assert!(validate_key("prompt").is_ok());
        assert_eq!(validate_key("hosts").unwrap_err().to_string(), "invalid key");
    }

    #[test]
    fn test_validate_value() {
        assert!(validate_value("prompt", "disabled").is_ok());
        assert!(validate_value("format", "yaml").is_ok());
        assert!(validate_value("endpoint", "http://localhost:8080").is_ok());
        assert_eq!(
            validate_value("prompt", "maybe").unwrap_err().to_string(),
            r#"invalid values, valid values: ["enabled", "disabled"]"#
        );
    }

    #[test]
    fn test_default_value() {
        assert_eq!(default_value("endpoint"), Some(DEFAULT_ENDPOINT.to_string()));
        assert_eq!(default_value("token"), Some("".to_string()));
        assert_eq!(default_value("nope"), None);
    }
}
