//! HTTP client types for Mollie API communication.
//!
//! This module provides the transport layer for making authenticated
//! requests to the Mollie API. It is built from small pieces that each do
//! one thing and compose as decorators around a plain "send one request"
//! capability, the [`Transport`] trait.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Transport`]: The "send one request" capability every layer implements
//! - [`HttpClient`]: The base transport that talks HTTP via reqwest
//! - [`RetryingTransport`]: Re-sends requests answered with a 5xx status
//! - [`IdempotentTransport`]: Attaches `Idempotency-Key` to POST and DELETE
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`DataType`]: Content types for request bodies
//! - [`rest::RestClient`]: Higher-level REST API client
//! - [`rest::RestError`]: REST-specific error types
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mollie_api::clients::{
//!     HttpClient, HttpMethod, HttpRequest, IdempotentTransport, RetryPolicy,
//!     RetryingTransport, Transport,
//! };
//!
//! let stack = IdempotentTransport::new(RetryingTransport::new(
//!     HttpClient::new(&config),
//!     RetryPolicy::default(),
//! ));
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "methods").build().unwrap();
//! let response = stack.send(&request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **5xx (Server Error)**: Retried using the `Retry-After` header value in
//!   seconds, or 2 seconds if absent or not an integer
//! - **Other statuses**: Returned immediately without retry
//! - **Network errors**: Returned immediately without retry
//!
//! A logical request is attempted at most three times by default. Configure
//! via [`RetryPolicy`].

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod idempotency;
pub mod rest;
mod retry;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, HAL_JSON, RUST_VERSION, SDK_NAME, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use idempotency::{IdempotencyKey, IdempotentTransport, IDEMPOTENCY_KEY_HEADER};
pub use retry::{RetryPolicy, RetryingTransport, DEFAULT_RETRY_DELAY, MAX_ATTEMPTS};
pub use transport::Transport;

// Re-export REST client types at the clients module level
pub use rest::{ApiResponse, RestClient, RestError};
