//! HTTP-specific error types for the Mollie API client.
//!
//! This module contains error types for HTTP operations: API errors carried
//! by a response, request validation failures, and network failures.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: A non-2xx response from the API (after retries)
//! - [`InvalidHttpRequestError`]: A request that failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use mollie_api::clients::HttpError;
//!
//! match transport.send(&request).await {
//!     Ok(response) => println!("Status {}", response.code),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::clients::HttpResponse;

/// Error returned when a request resolves to a non-successful response.
///
/// The Mollie API answers errors with a problem-JSON body such as
/// `{"status":422,"title":"Unprocessable Entity","detail":"...","field":"amount"}`.
/// Its fields are lifted out when present; `message` always carries the raw
/// body so nothing the server said is lost.
///
/// # Example
///
/// ```rust
/// use mollie_api::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     title: Some("Not Found".to_string()),
///     detail: Some("No payment exists with token tr_1.".to_string()),
///     field: None,
///     message: String::new(),
///     request_id: None,
/// };
///
/// assert_eq!(error.to_string(), "404 Not Found: No payment exists with token tr_1.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The problem title, e.g. `Unprocessable Entity`.
    pub title: Option<String>,
    /// The human readable problem detail.
    pub detail: Option<String>,
    /// The request field the problem relates to, if any.
    pub field: Option<String>,
    /// The raw response body.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub request_id: Option<String>,
}

#[derive(Deserialize)]
struct ProblemBody {
    title: Option<String>,
    detail: Option<String>,
    field: Option<String>,
}

impl HttpResponseError {
    /// Builds the error from a resolved response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let problem = serde_json::from_value::<ProblemBody>(response.body.clone()).ok();
        let message = match &response.body {
            serde_json::Value::Null => String::new(),
            serde_json::Value::Object(map) if map.contains_key("raw_body") => map["raw_body"]
                .as_str()
                .map_or_else(|| response.body.to_string(), ToString::to_string),
            body => body.to_string(),
        };

        Self {
            code: response.code,
            title: problem.as_ref().and_then(|p| p.title.clone()),
            detail: problem.as_ref().and_then(|p| p.detail.clone()),
            field: problem.and_then(|p| p.field),
            message,
            request_id: response.request_id().map(String::from),
        }
    }

    /// Returns `true` for 5xx responses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500 && self.code <= 599
    }
}

impl fmt::Display for HttpResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        } else if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpResponseError {}

/// Error returned when an HTTP request fails validation.
///
/// Raised before anything is sent; these requests are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path is empty.
    #[error("Cannot send a request without a path.")]
    EmptyPath,

    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request URL could not be assembled.
    #[error("Cannot build a URL for path '{path}'.")]
    InvalidUrl {
        /// The path that failed to resolve.
        path: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API answered with a non-2xx status (after any retries).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// No response was obtained (DNS, connection reset, timeout, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, if a response was obtained.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}
