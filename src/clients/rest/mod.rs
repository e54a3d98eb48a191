//! REST API client for the Mollie API.
//!
//! This module provides a higher-level REST API client built on top of the
//! [`Transport`](crate::clients::Transport) stack that offers typed request
//! methods and lazy pagination.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`RestClient`]: The REST API client with `get()`, `post()`, `patch()`, `delete()`,
//!   `page()` and `list()` methods
//! - [`ApiResponse`]: A decoded body, or the `204 No Content` success sentinel
//! - [`RestError`]: Error type for REST API operations
//!
//! # Example
//!
//! ```rust,ignore
//! use mollie_api::{ApiKey, MollieConfig, RestClient};
//! use mollie_api::pagination::PageQuery;
//! use futures::TryStreamExt;
//!
//! let config = MollieConfig::builder()
//!     .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
//!     .build()?;
//! let client = RestClient::new(&config);
//!
//! // Single resource
//! let payment = client.get::<serde_json::Value>("payments/tr_WDqYK6vllg", None).await?;
//!
//! // The first 80 paid payments, fetched lazily
//! let paid: Vec<serde_json::Value> = client
//!     .list::<serde_json::Value>("payments", "payments", PageQuery::new())?
//!     .filter(|p| p["status"] == "paid")
//!     .take(80)
//!     .collect()
//!     .await?;
//! ```
//!
//! # Path Normalization
//!
//! Leading slashes are stripped (`/payments` -> `payments`) so paths always
//! resolve underneath the configured API endpoint. Empty paths are rejected.
//!
//! # Retry Behavior
//!
//! Every request goes through the retry and idempotency decorators: 5xx
//! responses are re-sent up to three attempts in total, and POST/DELETE
//! requests carry one `Idempotency-Key` across all of their attempts.

mod client;
mod errors;

pub use client::{ApiResponse, RestClient};
pub use errors::RestError;
