//! Pure Website Categorization REST API client.
//!
//! Looks up the predicted topical categories of a domain and lists the
//! service's category taxonomy. Every call is one GET whose body is drained
//! and then resolved once; there is no caching, batching or retrying.
//!
//! # Example
//!
//! ```rust,ignore
//! use website_categorization::{QueryOptions, WebsiteCategorizationClient};
//!
//! let client = WebsiteCategorizationClient::from_env()?;
//!
//! let options = QueryOptions::new().min_confidence(0.7);
//! let (result, _raw) = client.get("whoisxmlapi.com", &options).await?;
//! for category in &result.categories {
//!     println!("{} ({:.2})", category.name, category.confidence);
//! }
//!
//! let taxonomy = client.taxonomy(&QueryOptions::new().order("ABC")).await?;
//! println!("{} categories", taxonomy.len());
//! ```
//!
//! # Raw responses
//!
//! [`get_raw`](WebsiteCategorizationClient::get_raw) and
//! [`get_all_categories_raw`](WebsiteCategorizationClient::get_all_categories_raw)
//! return the body untouched and only check the status code. They honour the
//! caller's `outputFormat`.

pub mod config;
pub mod credentials;
pub mod error;
pub mod options;
mod resolve;
pub mod testing;
pub mod transport;
pub mod types;

pub use config::ClientConfig;
pub use credentials::ApiKey;
pub use error::{CategorizationError, Result};
pub use options::{CategoryOrder, OutputFormat, QueryOptions, QueryParams};
pub use transport::{ApiRequest, HttpTransport, ReqwestTransport};
pub use types::{
    AutonomousSystem, Category, CategoryId, CategoryItem, DomainCategories, RawResponse, Taxonomy,
};

use std::sync::Arc;

use tracing::debug;

const API_KEY: &str = "apiKey";
const DOMAIN_NAME: &str = "domainName";

/// Website Categorization API client.
///
/// Immutable once built; clone it freely and share it across tasks.
#[derive(Debug, Clone)]
pub struct WebsiteCategorizationClient<T = ReqwestTransport> {
    transport: T,
    config: Arc<ClientConfig>,
}

impl WebsiteCategorizationClient<ReqwestTransport> {
    /// Create a client for the default endpoint with the given API key.
    pub fn new(api_key: impl Into<ApiKey>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key))
    }

    /// Create from `WEBSITE_CATEGORIZATION_API_KEY` (and optionally
    /// `WEBSITE_CATEGORIZATION_BASE_URL`).
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            CategorizationError::Config(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self::with_transport(config, ReqwestTransport::new(client)))
    }
}

impl<T: HttpTransport> WebsiteCategorizationClient<T> {
    /// Create a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Categorize a domain.
    ///
    /// The output format is forced to JSON. A failure reported inside the
    /// response body yields [`CategorizationError::Api`] without the raw
    /// response; a body that does not decode yields
    /// [`CategorizationError::Parse`] with it.
    pub async fn get(
        &self,
        domain_name: &str,
        options: &QueryOptions,
    ) -> Result<(DomainCategories, RawResponse)> {
        let options = options.clone().output_format(OutputFormat::Json);
        let request = self.lookup_request(domain_name, &options)?;

        let response = self.transport.execute(request).await?;
        let (result, response) = resolve::resolve_lookup(response)?;

        debug!(
            domain = %result.domain_name,
            categories = result.categories.len(),
            "Domain categorized"
        );

        Ok((result, response))
    }

    /// Categorize a domain and return the response body untouched.
    ///
    /// Only the status code is checked. The caller's output format is sent
    /// as is.
    pub async fn get_raw(&self, domain_name: &str, options: &QueryOptions) -> Result<RawResponse> {
        let request = self.lookup_request(domain_name, options)?;

        let response = self.transport.execute(request).await?;
        resolve::check_status(response)
    }

    /// List every category the service knows about.
    pub async fn get_all_categories(
        &self,
        options: &QueryOptions,
    ) -> Result<(Vec<CategoryItem>, RawResponse)> {
        let options = options.clone().output_format(OutputFormat::Json);
        let request = self.categories_request(&options);

        let response = self.transport.execute(request).await?;
        let (items, response) = resolve::resolve_categories(response)?;

        debug!(count = items.len(), "Fetched category taxonomy");

        Ok((items, response))
    }

    /// List every category and return the response body untouched.
    pub async fn get_all_categories_raw(&self, options: &QueryOptions) -> Result<RawResponse> {
        let request = self.categories_request(options);

        let response = self.transport.execute(request).await?;
        resolve::check_status(response)
    }

    /// Fetch the taxonomy as an indexed [`Taxonomy`].
    pub async fn taxonomy(&self, options: &QueryOptions) -> Result<Taxonomy> {
        let (items, _) = self.get_all_categories(options).await?;
        Ok(Taxonomy::new(items))
    }

    fn lookup_request(&self, domain_name: &str, options: &QueryOptions) -> Result<ApiRequest> {
        if domain_name.is_empty() {
            return Err(CategorizationError::InvalidArgument {
                name: DOMAIN_NAME,
                message: "can not be empty",
            });
        }

        let mut params = self.base_params();
        params.set(DOMAIN_NAME, domain_name);
        options.apply(&mut params);

        let mut url = self.config.base_url.clone();
        url.set_query(Some(&params.encode()));

        Ok(ApiRequest::new(url, self.config.user_agent.clone()))
    }

    fn categories_request(&self, options: &QueryOptions) -> ApiRequest {
        let mut params = self.base_params();
        options.apply(&mut params);

        let mut url = self.config.categories_url();
        url.set_query(Some(&params.encode()));

        ApiRequest::new(url, self.config.user_agent.clone())
    }

    fn base_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set(API_KEY, self.config.api_key.expose());
        params
    }
}
