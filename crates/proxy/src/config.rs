//! Proxy configuration.

use serde::{Deserialize, Serialize};
use sluice_core::Properties;

/// Property key for the log label.
pub const LABEL_KEY: &str = "sluice.proxy.label";

/// Property key for panic capture.
pub const CATCH_PANICS_KEY: &str = "sluice.proxy.catch_panics";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A property held a value of the wrong shape
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Property key
        key: String,
        /// Offending value
        value: String,
    },
}

/// Configuration for a context-scoped proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Name attached to every log line of this proxy
    pub label: Option<String>,

    /// Turn backend panics into recognized failures instead of unwinding
    pub catch_panics: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            label: None,
            catch_panics: true,
        }
    }
}

impl ProxyConfig {
    /// Read configuration from interpreter properties.
    ///
    /// Missing keys keep their defaults.
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(label) = properties.get(LABEL_KEY) {
            config.label = Some(label.clone());
        }

        if let Some(value) = properties.get(CATCH_PANICS_KEY) {
            config.catch_panics = parse_bool(CATCH_PANICS_KEY, value)?;
        }

        Ok(config)
    }

    /// Set the log label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set panic capture.
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ProxyConfig::default();
        assert!(config.catch_panics);
        assert!(config.label.is_none());
    }

    #[test]
    fn test_config_from_properties() {
        let mut props = Properties::new();
        props.insert(LABEL_KEY.to_string(), "spark".to_string());
        props.insert(CATCH_PANICS_KEY.to_string(), "False".to_string());
        props.insert("zeppelin.spark.maxResult".to_string(), "1000".to_string());

        let config = ProxyConfig::from_properties(&props).unwrap();
        assert_eq!(config.label.as_deref(), Some("spark"));
        assert!(!config.catch_panics);
    }

    #[test]
    fn test_config_rejects_bad_bool() {
        let mut props = Properties::new();
        props.insert(CATCH_PANICS_KEY.to_string(), "sometimes".to_string());

        let err = ProxyConfig::from_properties(&props).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: CATCH_PANICS_KEY.to_string(),
                value: "sometimes".to_string(),
            }
        );
    }

    #[test]
    fn test_config_deserialize_partial_json() {
        let config: ProxyConfig = serde_json::from_str(r#"{"label": "jdbc"}"#).unwrap();
        assert_eq!(config, ProxyConfig::default().with_label("jdbc"));
    }
}
