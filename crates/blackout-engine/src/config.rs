//! Session configuration.

use serde::Deserialize;

use crate::error::{BlackoutError, Result};

pub const DEFAULT_CACHE_KEY: &str = "blackout.unavailable-dates";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Knobs for an [`AvailabilitySession`](crate::session::AvailabilitySession).
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stage a closed range for confirmation instead of committing it on the
    /// second click.
    pub require_confirmation: bool,
    /// Key of the in-progress snapshot in the session cache.
    pub cache_key: String,
    /// Root URL of the availability service.
    pub endpoint: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            require_confirmation: true,
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document such as:
    ///
    /// ```toml
    /// require_confirmation = false
    /// endpoint = "https://availability.example.com"
    /// ```
    ///
    /// # Errors
    /// Returns `BlackoutError::Config` on invalid TOML, unknown value types, or
    /// an empty cache key.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| BlackoutError::Config(e.to_string()))?;
        if config.cache_key.trim().is_empty() {
            return Err(BlackoutError::Config("cache_key must not be empty".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            require_confirmation = false
            endpoint = "https://availability.example.com"
            "#,
        )
        .unwrap();
        assert!(!config.require_confirmation);
        assert_eq!(config.endpoint, "https://availability.example.com");
        assert_eq!(config.cache_key, DEFAULT_CACHE_KEY);
    }

    #[test]
    fn empty_cache_key_is_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str(r#"cache_key = " ""#),
            Err(BlackoutError::Config(_))
        ));
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        assert!(matches!(
            SessionConfig::from_toml_str("require_confirmation = \"yes\""),
            Err(BlackoutError::Config(_))
        ));
    }
}
