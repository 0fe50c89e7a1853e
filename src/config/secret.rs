//! Studio access token
//!
//! The token comes from `studio.auth_token` or `COURSE_IMPORT_STUDIO_AUTH_TOKEN`
//! and is only unwrapped to build the `Authorization: Bearer` header. Its
//! buffer is zeroized on drop and `Debug` never prints it.

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret};
use serde::Deserialize;
use zeroize::Zeroize;

/// Raw token text
#[derive(Clone, Zeroize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct TokenValue(String);

impl CloneableSecret for TokenValue {}
impl DebugSecret for TokenValue {}

impl TokenValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token wrapped so it cannot leak through logs or `Debug`
pub type SecretString = Secret<TokenValue>;

/// Wraps a token read from the environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(TokenValue(value))
}

/// `Authorization` header value for `token`
pub(crate) fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let token = secret_string("token-123".to_string());
        assert_eq!(bearer(&token), "Bearer token-123");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = secret_string("sk-live-abc".to_string());
        let debug_output = format!("{token:?}");

        assert!(!debug_output.contains("sk-live-abc"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_deserializes_from_config_field() {
        #[derive(Deserialize)]
        struct Studio {
            auth_token: Option<SecretString>,
        }

        let studio: Studio = toml::from_str(r#"auth_token = "from-file""#).unwrap();
        let token = studio.auth_token.unwrap();
        assert_eq!(token.expose_secret().as_str(), "from-file");

        let studio: Studio = toml::from_str("").unwrap();
        assert!(studio.auth_token.is_none());
    }
}
