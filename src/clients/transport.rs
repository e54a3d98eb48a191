//! The "send one request" capability the client stack is composed from.
//!
//! [`HttpClient`](crate::clients::HttpClient) is the base implementation.
//! [`RetryingTransport`](crate::clients::RetryingTransport) and
//! [`IdempotentTransport`](crate::clients::IdempotentTransport) wrap any
//! `Transport` and add behaviour without touching the wrapped instance.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::clients::{HttpError, HttpRequest, HttpResponse};

/// Sends a single HTTP request.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; judging the status is left to the caller. `Err` is
/// reserved for requests that were invalid or never got a response.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends `request` and returns the server's response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] for requests that fail validation
    /// and [`HttpError::Network`] when no response was obtained.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).send(request).await
    }
}
