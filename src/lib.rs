//! # Mollie API Rust Client
//!
//! A Rust client for the Mollie REST API, providing type-safe configuration,
//! a resilient transport, and lazy sequences over paginated collections.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`MollieConfig`] and [`MollieConfigBuilder`]
//! - Validated newtypes for credentials and the API endpoint
//! - An async transport that retries server errors, honouring `Retry-After`
//! - Idempotency keys on POST and DELETE, shared by every retry of a request
//! - Lazy [`Sequence`]s over list endpoints with `take`, `drop`, `filter` and
//!   `map`, whose first page is sized from the combinator chain
//! - Read-ahead of the next page while the current one is consumed
//!
//! ## Quick Start
//!
//! ```rust
//! use mollie_api::{ApiKey, MollieConfig, RestClient};
//!
//! let config = MollieConfig::builder()
//!     .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
//!     .version_strings(["MyShop/1.2.0"])
//!     .build()
//!     .unwrap();
//!
//! let client = RestClient::new(&config);
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let payment = client
//!     .post::<serde_json::Value>(
//!         "payments",
//!         json!({
//!             "amount": {"currency": "EUR", "value": "10.00"},
//!             "description": "Order #12345",
//!             "redirectUrl": "https://webshop.example.org/order/12345/"
//!         }),
//!         None,
//!     )
//!     .await?;
//! ```
//!
//! ## Iterating Collections
//!
//! ```rust,ignore
//! use mollie_api::pagination::PageQuery;
//!
//! // One request for exactly 80 payments
//! let recent = client
//!     .list::<serde_json::Value>("payments", "payments", PageQuery::new())?
//!     .take(80)
//!     .collect()
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] and installs no subscriber. Requests
//! are logged at `debug`, retries at `warn`, and envelope parsing at `trace`.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Lazy**: Nothing is fetched until a sequence is consumed

pub mod clients;
pub mod config;
pub mod error;
pub mod pagination;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiEndpoint, ApiKey, Credentials, MollieConfig, MollieConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiResponse, DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, IdempotencyKey, InvalidHttpRequestError, RestClient,
    RestError, RetryPolicy, Transport,
};

// Re-export pagination types
pub use pagination::{Demand, EnvelopeError, PageLimits, PageQuery, ResourcePage, Sequence};
