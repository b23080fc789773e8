use std::fmt;
use thiserror::Error;

pub const API_URL_VAR: &str = "CRUCIBLE_API_URL";
pub const API_KEY_VAR: &str = "CRUCIBLE_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "CRUCIBLE_API_URL and CRUCIBLE_API_KEY environment variables must be set (missing: {})",
        .missing.join(", ")
    )]
    Missing { missing: Vec<&'static str> },
}

/// Connection settings for the Crucible API, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
}

impl Config {
    /// Empty values count as absent.
    pub fn resolve(api_url: Option<String>, api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_url = api_url.filter(|v| !v.trim().is_empty());
        let api_key = api_key.filter(|v| !v.trim().is_empty());

        match (api_url, api_key) {
            (Some(api_url), Some(api_key)) => Ok(Self {
                api_url: api_url.trim_end_matches('/').to_string(),
                api_key,
            }),
            (api_url, api_key) => {
                let mut missing = Vec::new();
                if api_url.is_none() {
                    missing.push(API_URL_VAR);
                }
                if api_key.is_none() {
                    missing.push(API_KEY_VAR);
                }
                Err(ConfigError::Missing { missing })
            }
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_both_values() {
        let config = Config::resolve(
            Some("https://crucible.example.org/api/v1/".to_string()),
            Some("secret".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_url, "https://crucible.example.org/api/v1");
        assert_eq!(config.api_key, "secret");
    }

    #[test]
    fn missing_key_names_both_variables() {
        let err = Config::resolve(Some("https://crucible.example.org".to_string()), None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                missing: vec![API_KEY_VAR]
            }
        );
        let message = err.to_string();
        assert!(message.contains("CRUCIBLE_API_URL"));
        assert!(message.contains("CRUCIBLE_API_KEY"));
    }

    #[test]
    fn blank_values_are_missing() {
        let err = Config::resolve(Some("  ".to_string()), Some(String::new())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                missing: vec![API_URL_VAR, API_KEY_VAR]
            }
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = Config::resolve(Some("http://localhost".to_string()), Some("secret".to_string())).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
