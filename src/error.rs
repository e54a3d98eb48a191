//! Error types for the Mollie API client.
//!
//! This module contains the configuration error type. Transport, envelope and
//! REST errors live next to the code that raises them (see
//! [`crate::clients`] and [`crate::pagination`]).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! mistakes surface before the first network round-trip.
//!
//! # Example
//!
//! ```rust
//! use mollie_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building the client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Mollie API key.")]
    EmptyApiKey,

    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid OAuth access token.")]
    EmptyAccessToken,

    /// Neither an API key nor an access token was configured.
    #[error("Missing credentials. Set either an API key or an access token.")]
    MissingCredentials,

    /// Both an API key and an access token were configured.
    #[error("Conflicting credentials. Set either an API key or an access token, not both.")]
    ConflictingCredentials,

    /// API endpoint URL is invalid.
    #[error("Invalid API endpoint '{url}'. Please provide an absolute http(s) URL (e.g., 'https://api.mollie.com/v2/').")]
    InvalidApiEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Page limits are inconsistent.
    #[error("Invalid page limits: {reason}")]
    InvalidPageLimits {
        /// The reason the limits were rejected.
        reason: String,
    },

    /// Retry policy is unusable.
    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// The reason the policy was rejected.
        reason: String,
    },
}
