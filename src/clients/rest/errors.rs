//! REST-specific error types for the Mollie API client.
//!
//! [`RestError`] is the error of every [`RestClient`](super::RestClient)
//! operation and of every item pulled from a lazy
//! [`Sequence`](crate::pagination::Sequence).
//!
//! # Example
//!
//! ```rust,ignore
//! use mollie_api::clients::rest::RestError;
//!
//! match client.get::<Payment>("payments/tr_1", None).await {
//!     Ok(response) => println!("{response:?}"),
//!     Err(RestError::Http(e)) if e.status() == Some(404) => println!("No such payment"),
//!     Err(RestError::Envelope(e)) => println!("Unexpected list shape: {e}"),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use crate::clients::{HttpError, InvalidHttpRequestError};
use crate::pagination::EnvelopeError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// # Example
///
/// ```rust
/// use mollie_api::clients::rest::RestError;
///
/// let error = RestError::InvalidPath { path: "".to_string() };
/// assert!(error.to_string().contains("Invalid"));
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The REST API path is invalid.
    ///
    /// This error is returned when a path is empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// An HTTP-level error occurred.
    ///
    /// This variant wraps [`HttpError`] for unified error handling.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A successful list response was not shaped like a paginated envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// A response body or list item did not decode into the requested type.
    #[error("Failed to decode {resource}: {source}")]
    Deserialize {
        /// The resource path or key being decoded.
        resource: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The background task fetching a page ended without producing a result.
    #[error("Page fetch task failed: {message}")]
    PageTask {
        /// Description of the task failure.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status code, if the error carries a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

impl From<InvalidHttpRequestError> for RestError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}
