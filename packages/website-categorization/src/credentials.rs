//! API key handling.
//!
//! The key travels in the query string of every request, so it is kept in
//! `secrecy` memory and redacted wherever it could be printed.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Website Categorization API key.
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// The key in clear text, for building the request query only.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_redacted_in_debug() {
        let key = ApiKey::new("at_LoremIpsumDolorSitAmetConsect");

        assert_eq!(format!("{:?}", key), "ApiKey([REDACTED])");
    }

    #[test]
    fn test_expose_and_clone() {
        let key = ApiKey::from("at_key");
        let copy = key.clone();

        assert_eq!(copy.expose(), "at_key");
        assert!(!key.is_empty());
        assert!(ApiKey::from(String::new()).is_empty());
    }
}
