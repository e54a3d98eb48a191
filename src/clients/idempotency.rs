//! Idempotency keys for write requests.
//!
//! [`IdempotentTransport`] attaches an `Idempotency-Key` header to every POST
//! and DELETE that does not already carry one. It sits outside the retry
//! layer, so all attempts of one logical request share the same key and the
//! server can collapse duplicates.

use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

use crate::clients::{HttpError, HttpRequest, HttpResponse, Transport};

/// Name of the header carrying the key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

const KEY_ENTROPY_BYTES: usize = 18;

/// An opaque token identifying one logical write request.
///
/// # Example
///
/// ```rust
/// use mollie_api::clients::IdempotencyKey;
///
/// let first = IdempotencyKey::generate();
/// let second = IdempotencyKey::generate();
///
/// assert_eq!(first.as_str().len(), 24);
/// assert_ne!(first, second);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Generates a fresh random key: 18 random bytes, base64 encoded.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Returns the key as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdempotencyKey({})", self.0)
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A [`Transport`] decorator that keys POST and DELETE requests.
///
/// A key supplied by the caller is left untouched.
#[derive(Debug)]
pub struct IdempotentTransport<T> {
    inner: T,
}

impl<T: Transport> IdempotentTransport<T> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for IdempotentTransport<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        if !request.http_method.requires_idempotency_key()
            || request.header(IDEMPOTENCY_KEY_HEADER).is_some()
        {
            return self.inner.send(request).await;
        }

        let key = IdempotencyKey::generate();
        tracing::trace!(path = %request.path, key = %key, "Attached idempotency key");

        let mut keyed = request.clone();
        keyed.set_header(IDEMPOTENCY_KEY_HEADER, key.as_str());
        self.inner.send(&keyed).await
    }
}
