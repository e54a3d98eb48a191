//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// A validated Mollie API key.
///
/// The key is only checked for being non-empty; the server decides whether it
/// is a test or live key. The `Debug` implementation masks the value.
///
/// # Example
///
/// ```rust
/// use mollie_api::ApiKey;
///
/// let key = ApiKey::new("test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM").unwrap();
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated OAuth access token.
///
/// Requests authenticated with an access token advertise `OAuth/2.0` in their
/// `User-Agent`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated base URL that resource paths are joined onto.
///
/// The URL must be absolute with an `http` or `https` scheme. A trailing slash
/// is added when missing so that `payments` resolves underneath `/v2/`.
///
/// # Example
///
/// ```rust
/// use mollie_api::ApiEndpoint;
///
/// let endpoint = ApiEndpoint::new("https://api.mollie.com/v2").unwrap();
/// assert_eq!(endpoint.as_ref(), "https://api.mollie.com/v2/");
/// assert_eq!(endpoint.join("payments").unwrap().as_str(), "https://api.mollie.com/v2/payments");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoint(Url);

impl ApiEndpoint {
    /// The production endpoint.
    pub const DEFAULT: &'static str = "https://api.mollie.com:443/v2/";

    /// Creates a new validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiEndpoint`] if the URL cannot be parsed,
    /// is not `http(s)`, or has no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let parsed = Url::parse(&with_slash)
            .map_err(|_| ConfigError::InvalidApiEndpoint { url: raw.clone() })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidApiEndpoint { url: raw });
        }

        Ok(Self(parsed))
    }

    /// Resolves a relative resource path against this endpoint.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error if `path` cannot be joined.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path)
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }
}

impl Default for ApiEndpoint {
    /// Returns the production endpoint.
    ///
    /// # Panics
    ///
    /// Never in practice: [`ApiEndpoint::DEFAULT`] is a constant absolute URL.
    fn default() -> Self {
        Self(Url::parse(Self::DEFAULT).expect("default endpoint is a valid URL"))
    }
}

impl AsRef<str> for ApiEndpoint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
