//! HTTP transport.
//!
//! A transport issues exactly one GET and drains the whole body before
//! returning. Send failures and body read failures are reported as distinct
//! errors; a partially read body is never returned as a success.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::error::{CategorizationError, Result};
use crate::types::RawResponse;

const MEDIA_TYPE: &str = "application/json";

/// A single GET request ready to be sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Full URL, query included. Contains the API key; do not log it.
    pub url: Url,
    pub headers: HeaderMap,
}

impl ApiRequest {
    /// Build a request with the JSON `Content-Type`/`Accept` headers and the
    /// given `User-Agent`.
    pub fn new(url: Url, user_agent: HeaderValue) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(header::ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(header::USER_AGENT, user_agent);
        Self { url, headers }
    }

    /// Request path without the query, safe to log.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Value of a query parameter.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Sends requests to the API.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue the request once and return the fully drained response.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Transport backed by `reqwest`.
///
/// `reqwest` errors quote the request URL, whose query holds the API key, so
/// the URL is stripped from every error before it is logged or returned.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let start = std::time::Instant::now();
        let path = request.path().to_string();

        debug!(path = %path, "Website Categorization request");

        let response = self
            .client
            .get(request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                debug!(path = %path, error = %e, "Website Categorization request failed");
                CategorizationError::Transport(Box::new(e))
            })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();

        let body = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            debug!(
                path = %path,
                status,
                error = %e,
                "Website Categorization response read failed"
            );
            CategorizationError::Read {
                status,
                source: Box::new(e),
            }
        })?;

        debug!(
            path = %path,
            status,
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "Website Categorization response"
        );

        Ok(RawResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers() {
        let url = Url::parse("https://example.com/api/v3?apiKey=k&domainName=a.com").unwrap();
        let request = ApiRequest::new(
            url,
            HeaderValue::from_static("website-categorization-rust/test"),
        );

        assert_eq!(request.headers[header::CONTENT_TYPE], MEDIA_TYPE);
        assert_eq!(request.headers[header::ACCEPT], MEDIA_TYPE);
        assert_eq!(
            request.headers[header::USER_AGENT],
            "website-categorization-rust/test"
        );
        assert_eq!(request.path(), "/api/v3");
        assert_eq!(request.query_param("domainName").as_deref(), Some("a.com"));
        assert_eq!(request.query_param("outputFormat"), None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!(
            "http://{}/v3?apiKey=at_SuperSecretKey123&domainName=a.com",
            addr
        ))
        .unwrap();
        let err = ReqwestTransport::default()
            .execute(ApiRequest::new(url, HeaderValue::from_static("test")))
            .await
            .unwrap_err();

        assert!(matches!(err, CategorizationError::Transport(_)));
        assert!(err.to_string().starts_with("cannot execute request: "));
        assert!(!format!("{} {:?}", err, err).contains("at_SuperSecretKey123"));
    }
}
