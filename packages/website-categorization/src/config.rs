//! Client configuration.

use std::env;
use std::time::Duration;

use reqwest::header::HeaderValue;
use url::Url;

use crate::credentials::ApiKey;
use crate::error::{CategorizationError, Result};

/// Default Website Categorization API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://website-categorization.whoisxmlapi.com/api/v3";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "WEBSITE_CATEGORIZATION_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "WEBSITE_CATEGORIZATION_BASE_URL";

/// Value of the `User-Agent` header identifying this client.
pub const USER_AGENT: &str = concat!("website-categorization-rust/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings shared by every call a client makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    /// Lookup endpoint; the taxonomy lives under `<base_url>/categories`.
    pub base_url: Url,
    pub user_agent: HeaderValue,
    /// Bound on a whole round trip, body included. `None` disables it.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            user_agent: HeaderValue::from_static(USER_AGENT),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Load from `WEBSITE_CATEGORIZATION_API_KEY` and the optional
    /// `WEBSITE_CATEGORIZATION_BASE_URL`. A `.env` file is read if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| CategorizationError::Config(format!("{} not set", API_KEY_ENV)))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            config = config.with_base_url_str(&base_url)?;
        }

        Ok(config)
    }

    /// Set a custom base URL (proxies, test servers).
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = url;
        self
    }

    /// Parse and set a custom base URL.
    pub fn with_base_url_str(self, url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| {
            CategorizationError::Config(format!("invalid base URL {:?}: {}", url, e))
        })?;
        Ok(self.with_base_url(parsed))
    }

    /// Replace the `User-Agent` header. Fails if the value is not a valid
    /// header value.
    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self> {
        self.user_agent = HeaderValue::from_str(user_agent).map_err(|e| {
            CategorizationError::Config(format!("invalid user agent {:?}: {}", user_agent, e))
        })?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the taxonomy listing.
    pub fn categories_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/categories", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
