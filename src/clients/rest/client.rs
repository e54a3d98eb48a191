//! REST client implementation for the Mollie API.
//!
//! This module provides the [`RestClient`] type for making REST API requests
//! with path normalization, typed decoding, and lazy pagination.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clients::idempotency::IdempotentTransport;
use crate::clients::rest::RestError;
use crate::clients::retry::RetryingTransport;
use crate::clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResponseError,
    Transport,
};
use crate::config::MollieConfig;
use crate::pagination::{PageLimits, PageQuery, PageRequest, ResourcePage, RestPagedSource, Sequence};

/// A successful API response.
///
/// `204 No Content` carries no body and resolves to [`ApiResponse::NoContent`],
/// the success sentinel for cancel/delete style calls. Failures never reach
/// this type; they are reported as [`RestError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiResponse<T> {
    /// A decoded response body.
    Body(T),
    /// The request succeeded without a body.
    NoContent,
}

impl<T> ApiResponse<T> {
    /// Returns `true` for the `204 No Content` sentinel.
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// Returns the body, if there is one.
    #[must_use]
    pub fn into_body(self) -> Option<T> {
        match self {
            Self::Body(body) => Some(body),
            Self::NoContent => None,
        }
    }
}

/// REST API client for the Mollie API.
///
/// Provides typed methods (`get`, `post`, `patch`, `delete`) for single
/// resources, [`page`](Self::page) for explicit page-by-page listing, and
/// [`list`](Self::list) for lazy sequences over whole collections.
///
/// Cloning is cheap: clones share the transport stack and its connection pool.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use mollie_api::{ApiKey, MollieConfig, RestClient};
/// use serde_json::json;
///
/// let config = MollieConfig::builder()
///     .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
///     .build()?;
/// let client = RestClient::new(&config);
///
/// let body = json!({
///     "amount": {"currency": "EUR", "value": "10.00"},
///     "description": "Order #12345",
///     "redirectUrl": "https://webshop.example.org/order/12345/"
/// });
/// let payment = client.post::<serde_json::Value>("payments", body, None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    /// The transport stack requests are sent through.
    transport: Arc<dyn Transport>,
    /// Page sizing used by `page` and `list`.
    page_limits: PageLimits,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a REST client talking HTTP to the configured endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created (see
    /// [`HttpClient::new`]).
    #[must_use]
    pub fn new(config: &MollieConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpClient::new(config)))
    }

    /// Creates a REST client over a custom base transport.
    ///
    /// The transport is still wrapped in the retry and idempotency layers
    /// configured by `config`.
    #[must_use]
    pub fn with_transport(config: &MollieConfig, transport: Arc<dyn Transport>) -> Self {
        let stack = IdempotentTransport::new(RetryingTransport::new(
            transport,
            *config.retry_policy(),
        ));
        Self::from_parts(Arc::new(stack), *config.page_limits())
    }

    /// Creates a REST client over a fully assembled transport stack.
    #[must_use]
    pub fn from_parts(transport: Arc<dyn Transport>, page_limits: PageLimits) -> Self {
        Self {
            transport,
            page_limits,
        }
    }

    /// Returns the page sizing limits used by `page` and `list`.
    #[must_use]
    pub const fn page_limits(&self) -> &PageLimits {
        &self.page_limits
    }

    /// Sends a GET request and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid (e.g., empty).
    /// Returns [`RestError::Http`] for HTTP-level errors.
    /// Returns [`RestError::Deserialize`] if the body does not decode into `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut query = HashMap::new();
    /// query.insert("include".to_string(), "details.qrCode".to_string());
    /// let payment = client.get::<Payment>("payments/tr_WDqYK6vllg", Some(query)).await?;
    /// ```
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse<T>, RestError> {
        self.make_request(HttpMethod::Get, path, None, query).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// The request carries an `Idempotency-Key`, so a retried create cannot
    /// produce a second resource.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    /// Returns [`RestError::Deserialize`] if the body does not decode into `T`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        query: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse<T>, RestError> {
        self.make_request(HttpMethod::Post, path, Some(body), query)
            .await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    /// Returns [`RestError::Deserialize`] if the body does not decode into `T`.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        query: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse<T>, RestError> {
        self.make_request(HttpMethod::Patch, path, Some(body), query)
            .await
    }

    /// Sends a DELETE request, optionally with a JSON body.
    ///
    /// Cancellations usually answer `204 No Content`, which resolves to
    /// [`ApiResponse::NoContent`].
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    /// Returns [`RestError::Deserialize`] if the body does not decode into `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cancelled = client
    ///     .delete::<serde_json::Value>("customers/cst_8wmqcHMN4U/mandates/mdt_pWUnw6pkBN", None, None)
    ///     .await?;
    /// assert!(cancelled.is_no_content());
    /// ```
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
        query: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse<T>, RestError> {
        self.make_request(HttpMethod::Delete, path, body, query)
            .await
    }

    /// Sends a prepared request and returns the raw response.
    ///
    /// Useful for passing extra headers, such as a caller-chosen
    /// `Idempotency-Key`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] for invalid requests, network failures and
    /// non-2xx responses (after retries).
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        let response = self.transport.send(&request).await?;
        if response.is_ok() {
            return Ok(response);
        }
        Err(HttpError::Response(HttpResponseError::from_response(&response)).into())
    }

    /// Fetches one page of a collection.
    ///
    /// The page size is `query.limit`, or the configured default, capped at the
    /// maximum page size.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid,
    /// [`RestError::Envelope`] if the body is not a list envelope containing
    /// `resource_key`, and [`RestError::Http`] for HTTP-level errors.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let first = client
    ///     .page::<serde_json::Value>("payments", "payments", PageQuery::new().limit(50))
    ///     .await?;
    /// if let Some(second) = first.next_page().await {
    ///     println!("{} more", second?.len());
    /// }
    /// ```
    pub async fn page<T: DeserializeOwned>(
        &self,
        path: &str,
        resource_key: &str,
        query: PageQuery,
    ) -> Result<ResourcePage<T>, RestError> {
        let limit = query
            .limit_value()
            .unwrap_or_else(|| self.page_limits.default_page_size())
            .min(self.page_limits.max_page_size());
        let source = self.paged_source(path, resource_key, query)?;
        ResourcePage::fetch(Arc::new(source), PageRequest::First { limit }, resource_key).await
    }

    /// Returns a lazy sequence over a whole collection.
    ///
    /// Nothing is fetched until the sequence is consumed. The size of the
    /// first page is planned from the combinators applied to the sequence, so
    /// `list(..)?.take(5)` asks the API for exactly five items. `query.limit`
    /// is therefore not used; its other parameters are sent with the first
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is invalid.
    pub fn list<T>(
        &self,
        path: &str,
        resource_key: &str,
        query: PageQuery,
    ) -> Result<Sequence<T>, RestError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let source = self.paged_source(path, resource_key, query)?;
        Ok(Sequence::new(Arc::new(source), self.page_limits).decode(resource_key))
    }

    fn paged_source(
        &self,
        path: &str,
        resource_key: &str,
        query: PageQuery,
    ) -> Result<RestPagedSource, RestError> {
        let path = normalize_path(path)?;
        Ok(RestPagedSource::new(
            self.clone(),
            path,
            resource_key,
            query.into_params(),
        ))
    }

    /// Internal helper to build, send and decode requests.
    async fn make_request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        query: Option<HashMap<String, String>>,
    ) -> Result<ApiResponse<T>, RestError> {
        let normalized_path = normalize_path(path)?;

        let mut builder = HttpRequest::builder(method, &normalized_path);
        if let Some(body_value) = body {
            builder = builder.body(body_value).body_type(DataType::Json);
        }
        if let Some(query_params) = query {
            builder = builder.query(query_params);
        }

        let response = self.send(builder.build()?).await?;
        decode_response(&normalized_path, response)
    }
}

/// Maps a successful response onto [`ApiResponse`].
fn decode_response<T: DeserializeOwned>(
    resource: &str,
    response: HttpResponse,
) -> Result<ApiResponse<T>, RestError> {
    if response.is_no_content() || response.body.is_null() {
        return Ok(ApiResponse::NoContent);
    }
    serde_json::from_value(response.body)
        .map(ApiResponse::Body)
        .map_err(|source| RestError::Deserialize {
            resource: resource.to_string(),
            source,
        })
}

/// Normalizes a REST API path.
///
/// Leading `/` characters are stripped so the path resolves underneath the
/// API endpoint; a path that is empty afterwards is rejected.
fn normalize_path(path: &str) -> Result<String, RestError> {
    let normalized = path.trim().trim_start_matches('/');

    if normalized.is_empty() {
        return Err(RestError::InvalidPath {
            path: path.to_string(),
        });
    }

    Ok(normalized.to_string())
}
