//! Configuration types for the Mollie API client.
//!
//! This module provides the configuration types used to initialize the
//! client and tune its transport and pagination behaviour.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`MollieConfig`]: The main configuration struct holding all client settings
//! - [`MollieConfigBuilder`]: A builder for constructing [`MollieConfig`] instances
//! - [`Credentials`]: Either an API key or an OAuth access token
//! - [`ApiKey`] / [`AccessToken`]: Validated secrets with masked debug output
//! - [`ApiEndpoint`]: The validated base URL resource paths are resolved against
//!
//! # Example
//!
//! ```rust
//! use mollie_api::{ApiKey, MollieConfig};
//!
//! let config = MollieConfig::builder()
//!     .api_key(ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap())
//!     .version_strings(["MyShop/1.2.0"])
//!     .build()
//!     .unwrap();
//!
//! assert!(!config.credentials().is_oauth());
//! ```

mod newtypes;

pub use newtypes::{AccessToken, ApiEndpoint, ApiKey};

use crate::clients::RetryPolicy;
use crate::error::ConfigError;
use crate::pagination::PageLimits;

/// The secret used to authenticate requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// An organization or profile API key.
    ApiKey(ApiKey),
    /// An OAuth access token.
    AccessToken(AccessToken),
}

impl Credentials {
    /// Returns the bearer token value.
    #[must_use]
    pub fn bearer(&self) -> &str {
        match self {
            Self::ApiKey(key) => key.as_ref(),
            Self::AccessToken(token) => token.as_ref(),
        }
    }

    /// Returns `true` when authenticating with an OAuth access token.
    #[must_use]
    pub const fn is_oauth(&self) -> bool {
        matches!(self, Self::AccessToken(_))
    }
}

/// Configuration for the Mollie API client.
///
/// # Thread Safety
///
/// `MollieConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct MollieConfig {
    credentials: Credentials,
    api_endpoint: ApiEndpoint,
    version_strings: Vec<String>,
    page_limits: PageLimits,
    retry_policy: RetryPolicy,
}

impl MollieConfig {
    /// Creates a new builder for constructing a `MollieConfig`.
    #[must_use]
    pub fn builder() -> MollieConfigBuilder {
        MollieConfigBuilder::new()
    }

    /// Returns the configured credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API endpoint.
    #[must_use]
    pub const fn api_endpoint(&self) -> &ApiEndpoint {
        &self.api_endpoint
    }

    /// Returns the extra `User-Agent` tokens.
    #[must_use]
    pub fn version_strings(&self) -> &[String] {
        &self.version_strings
    }

    /// Returns the page sizing limits used by lazy sequences.
    #[must_use]
    pub const fn page_limits(&self) -> &PageLimits {
        &self.page_limits
    }

    /// Returns the retry policy applied to every logical request.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

// Verify MollieConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MollieConfig>();
};

/// Builder for constructing [`MollieConfig`] instances.
///
/// Exactly one of `api_key` or `access_token` is required.
///
/// # Defaults
///
/// - `api_endpoint`: [`ApiEndpoint::DEFAULT`]
/// - `version_strings`: empty
/// - `page_limits`: [`PageLimits::default`] (128 / 250 / 5)
/// - `retry_policy`: [`RetryPolicy::default`] (3 attempts, 2 second delay)
#[derive(Debug, Default)]
pub struct MollieConfigBuilder {
    api_key: Option<ApiKey>,
    access_token: Option<AccessToken>,
    api_endpoint: Option<ApiEndpoint>,
    version_strings: Vec<String>,
    page_limits: Option<PageLimits>,
    retry_policy: Option<RetryPolicy>,
}

impl MollieConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticates with an API key.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Authenticates with an OAuth access token.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn api_endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.api_endpoint = Some(endpoint);
        self
    }

    /// Adds extra `User-Agent` tokens such as `"MyShop/1.2.0"`.
    ///
    /// Whitespace inside a token is stripped; empty tokens are ignored.
    #[must_use]
    pub fn version_strings<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.version_strings.extend(
            tokens
                .into_iter()
                .map(|token| token.as_ref().split_whitespace().collect::<String>())
                .filter(|token| !token.is_empty()),
        );
        self
    }

    /// Sets the page sizing limits.
    #[must_use]
    pub const fn page_limits(mut self, limits: PageLimits) -> Self {
        self.page_limits = Some(limits);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Builds the [`MollieConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when no credential is set and
    /// [`ConfigError::ConflictingCredentials`] when both are set.
    pub fn build(self) -> Result<MollieConfig, ConfigError> {
        let credentials = match (self.api_key, self.access_token) {
            (Some(key), None) => Credentials::ApiKey(key),
            (None, Some(token)) => Credentials::AccessToken(token),
            (None, None) => return Err(ConfigError::MissingCredentials),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingCredentials),
        };

        Ok(MollieConfig {
            credentials,
            api_endpoint: self.api_endpoint.unwrap_or_default(),
            version_strings: self.version_strings,
            page_limits: self.page_limits.unwrap_or_default(),
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}
