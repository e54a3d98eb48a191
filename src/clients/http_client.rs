//! HTTP client for Mollie API communication.
//!
//! This module provides the [`HttpClient`] type, the base [`Transport`] that
//! puts requests on the wire. It performs exactly one HTTP exchange per call;
//! retries and idempotency keys are layered on top by the decorators in
//! [`crate::clients`].

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::Transport;
use crate::config::{ApiEndpoint, MollieConfig};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product token this library identifies itself with in `User-Agent`.
pub const SDK_NAME: &str = "mollie-api-rust";

/// Rust version reported in the `Rust/<version>` `User-Agent` token.
///
/// This is the crate's minimum supported Rust version (`rust-version` in
/// Cargo.toml), not the version of the compiler that built it.
pub const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");

/// Media type requested from the API.
pub const HAL_JSON: &str = "application/hal+json";

/// HTTP client for making requests to the Mollie API.
///
/// The client handles:
/// - URL construction against the configured [`ApiEndpoint`]
/// - Default headers: `User-Agent`, bearer `Authorization`, HAL `Accept`
/// - Transparent gzip decompression
/// - Response parsing (empty bodies become `null`)
///
/// It does not judge status codes; every response the server produced is
/// returned as `Ok`.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use mollie_api::{ApiKey, MollieConfig};
/// use mollie_api::clients::{HttpClient, HttpMethod, HttpRequest, Transport};
///
/// let config = MollieConfig::builder()
///     .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "methods").build().unwrap();
/// let response = client.send(&request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL resource paths are resolved against.
    api_endpoint: ApiEndpoint,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &MollieConfig) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(config, client)
    }

    /// Creates a client that shares an existing reqwest connection pool.
    #[must_use]
    pub fn with_client(config: &MollieConfig, client: reqwest::Client) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), Self::user_agent(config));
        default_headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", config.credentials().bearer()),
        );
        default_headers.insert("Accept".to_string(), HAL_JSON.to_string());

        Self {
            client,
            api_endpoint: config.api_endpoint().clone(),
            default_headers,
        }
    }

    /// Builds the `User-Agent` value: supported Rust version, library, caller
    /// tokens and, for access-token credentials, the OAuth marker.
    fn user_agent(config: &MollieConfig) -> String {
        let mut tokens = vec![
            format!("Rust/{RUST_VERSION}"),
            format!("{SDK_NAME}/{SDK_VERSION}"),
        ];
        tokens.extend(config.version_strings().iter().cloned());
        if config.credentials().is_oauth() {
            tokens.push("OAuth/2.0".to_string());
        }
        tokens.join(" ")
    }

    /// Returns the API endpoint for this client.
    #[must_use]
    pub const fn api_endpoint(&self) -> &ApiEndpoint {
        &self.api_endpoint
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Merges default, content-type and per-request headers, validating each.
    fn headers_for(
        &self,
        request: &HttpRequest,
    ) -> Result<reqwest::header::HeaderMap, InvalidHttpRequestError> {
        let mut merged = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            merged.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                merged.insert(key.clone(), value.clone());
            }
        }

        let mut headers = reqwest::header::HeaderMap::with_capacity(merged.len());
        for (key, value) in merged {
            let invalid = || InvalidHttpRequestError::InvalidHeader { name: key.clone() };
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(&value).map_err(|_| invalid())?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a response body. Empty bodies are `null`; bodies that are not
    /// JSON are kept verbatim under `raw_body`.
    fn parse_body(body_text: String) -> serde_json::Value {
        if body_text.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&body_text)
            .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let path = request.path.trim_start_matches('/');
        let url = self
            .api_endpoint
            .join(path)
            .map_err(|_| InvalidHttpRequestError::InvalidUrl {
                path: request.path.clone(),
            })?;
        let headers = self.headers_for(request)?;

        let method = match request.http_method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut req_builder = self.client.request(method, url).headers(headers);

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(
            method = request.http_method.as_str(),
            path = %request.path,
            attempt = request.attempt,
            "Sending request to Mollie API"
        );

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let response = HttpResponse::new(code, res_headers, Self::parse_body(body_text));

        tracing::debug!(
            method = request.http_method.as_str(),
            path = %request.path,
            status = code,
            request_id = response.request_id().unwrap_or_default(),
            "Received response"
        );

        Ok(response)
    }
}
