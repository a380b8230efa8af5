//! Auth sub-service configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// GoTrue-compatible auth endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth sub-service (e.g. "https://auth.brandreach.io")
    pub base_url: String,

    /// Public API key sent with every auth request
    pub api_key: SecretString,

    /// Seconds before token expiry at which a refresh is scheduled
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
}

impl AuthConfig {
    /// Validate auth configuration
    pub fn validate(&self, is_production: bool) -> Result<(), ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::MissingAuthUrl);
        }
        if is_production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::AuthUrlMustBeHttps);
        }
        Ok(())
    }
}

fn default_refresh_margin_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> AuthConfig {
        AuthConfig {
            base_url: base_url.to_string(),
            api_key: SecretString::new("anon-key".to_string()),
            refresh_margin_secs: default_refresh_margin_secs(),
        }
    }

    #[test]
    fn http_url_is_fine_outside_production() {
        assert!(config("http://localhost:9999").validate(false).is_ok());
    }

    #[test]
    fn production_requires_https() {
        assert!(matches!(
            config("http://auth.brandreach.io").validate(true),
            Err(ValidationError::AuthUrlMustBeHttps)
        ));
        assert!(config("https://auth.brandreach.io").validate(true).is_ok());
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(matches!(
            config("  ").validate(false),
            Err(ValidationError::MissingAuthUrl)
        ));
    }
}
