//! Retrying of server errors.
//!
//! [`RetryingTransport`] re-sends a logical request when the server answers
//! with a 5xx status, up to [`RetryPolicy::max_attempts`] sends in total. The
//! wait between attempts honours an integer `Retry-After` header and falls
//! back to [`RetryPolicy::default_delay`].
//!
//! Client errors (4xx), successes and transport failures are returned after
//! the first attempt. When the attempts run out the last response is handed
//! back unchanged so the caller can surface it.

use std::time::Duration;

use async_trait::async_trait;

use crate::clients::{HttpError, HttpRequest, HttpResponse, Transport};
use crate::error::ConfigError;

/// Default number of sends per logical request, the first one included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Default wait between attempts when the server gives no `Retry-After`.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// How often and how patiently server errors are retried.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use mollie_api::clients::RetryPolicy;
///
/// let policy = RetryPolicy::new(5, Duration::from_millis(500)).unwrap();
/// assert_eq!(policy.max_attempts(), 5);
///
/// assert!(RetryPolicy::new(0, Duration::ZERO).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    default_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRetryPolicy`] if `max_attempts` is zero.
    pub fn new(max_attempts: u32, default_delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            default_delay,
        })
    }

    /// Total number of sends per logical request.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait used when the response carries no usable `Retry-After`.
    #[must_use]
    pub const fn default_delay(&self) -> Duration {
        self.default_delay
    }

    /// Returns `true` if `response`, received on the 0-based `attempt`,
    /// warrants another send.
    #[must_use]
    pub const fn should_retry(&self, response: &HttpResponse, attempt: u32) -> bool {
        response.is_server_error() && attempt.saturating_add(1) < self.max_attempts
    }

    /// Returns how long to wait before re-sending after `response`.
    #[must_use]
    pub fn delay_for(&self, response: &HttpResponse) -> Duration {
        response.retry_after().unwrap_or(self.default_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            default_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// A [`Transport`] decorator that retries 5xx responses.
///
/// Every attempt sends a copy of the same logical request, headers included,
/// with only [`HttpRequest::attempt`] changed.
#[derive(Debug)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    /// Wraps `inner` with the given policy.
    #[must_use]
    pub const fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut attempt_request = request.clone();
        let mut attempt: u32 = 0;

        loop {
            attempt_request.attempt = attempt;
            let response = self.inner.send(&attempt_request).await?;

            if !self.policy.should_retry(&response, attempt) {
                if response.is_server_error() {
                    tracing::warn!(
                        method = request.http_method.as_str(),
                        path = %request.path,
                        status = response.code,
                        attempts = attempt + 1,
                        "Giving up on request after server errors"
                    );
                }
                return Ok(response);
            }

            let delay = self.policy.delay_for(&response);
            tracing::warn!(
                method = request.http_method.as_str(),
                path = %request.path,
                status = response.code,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Server error, retrying request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
