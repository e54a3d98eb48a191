//! Paginated list envelopes.
//!
//! List endpoints answer with a HAL envelope:
//!
//! ```json
//! {
//!   "count": 5,
//!   "_embedded": { "payments": [ ... ] },
//!   "_links": { "next": { "href": "https://api.mollie.com/v2/payments?from=tr_8WhJKGmgBy&limit=5" } }
//! }
//! ```
//!
//! [`Page::from_envelope`] turns such a body into items plus an optional
//! [`Continuation`]. Bodies of any other shape are an [`EnvelopeError`].

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Error returned when a successful list response is not a valid envelope.
///
/// Retrying cannot fix a shape mismatch, so these are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The body is not a JSON object.
    #[error("List response body is not a JSON object")]
    NotAnObject,

    /// The body has no `_embedded` object.
    #[error("List response has no '_embedded' object")]
    MissingEmbedded,

    /// `_embedded` has no array under the resource key.
    #[error("List response has no '_embedded.{resource_key}' array")]
    MissingResource {
        /// The resource key that was expected.
        resource_key: String,
    },

    /// `_links.next` is present but carries no usable `href`.
    #[error("List response has an invalid next link: {href}")]
    InvalidNextLink {
        /// The offending link, or the JSON it was found in.
        href: String,
    },
}

/// Where the next page of a collection lives.
///
/// The query string of the server's `next` link is kept verbatim and sent
/// back byte for byte; its meaning (`from`, `limit`, filters) belongs to the
/// server. [`Continuation::query`] offers the same parameters decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Continuation {
    href: String,
    raw_query: Option<String>,
    query: Vec<(String, String)>,
}

impl Continuation {
    /// Parses a `next` link.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidNextLink`] if `href` is not an absolute URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mollie_api::pagination::Continuation;
    ///
    /// let next = Continuation::parse("https://api.mollie.com/v2/payments?from=tr_8WhJKGmgBy&limit=5").unwrap();
    /// assert_eq!(next.query()[0], ("from".to_string(), "tr_8WhJKGmgBy".to_string()));
    /// ```
    pub fn parse(href: &str) -> Result<Self, EnvelopeError> {
        let url = Url::parse(href).map_err(|_| EnvelopeError::InvalidNextLink {
            href: href.to_string(),
        })?;
        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            href: href.to_string(),
            raw_query: url.query().map(str::to_string),
            query,
        })
    }

    /// The link as received.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The link's query string exactly as the server encoded it.
    #[must_use]
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    /// The link's query pairs, percent-decoded, in order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

/// One page of a collection.
///
/// `continuation` is `None` exactly when this is the last page.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// The items, in the order the server sent them.
    pub items: Vec<T>,
    /// Link to the following page.
    pub continuation: Option<Continuation>,
    /// The server's `count`; informational only.
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Returns `true` if no page follows this one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.continuation.is_none()
    }
}

impl Page<Value> {
    /// Parses a list envelope, taking items from `_embedded.<resource_key>`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError`] when the body does not have the envelope shape.
    pub fn from_envelope(body: Value, resource_key: &str) -> Result<Self, EnvelopeError> {
        let Value::Object(mut envelope) = body else {
            return Err(EnvelopeError::NotAnObject);
        };

        let Some(Value::Object(mut embedded)) = envelope.remove("_embedded") else {
            return Err(EnvelopeError::MissingEmbedded);
        };
        let Some(Value::Array(items)) = embedded.remove(resource_key) else {
            return Err(EnvelopeError::MissingResource {
                resource_key: resource_key.to_string(),
            });
        };

        let continuation = next_link(&envelope)?;
        let total_count = envelope
            .get("count")
            .and_then(Value::as_u64)
            .and_then(|count| usize::try_from(count).ok())
            .unwrap_or(items.len());

        tracing::trace!(
            resource_key,
            items = items.len(),
            total_count,
            has_next = continuation.is_some(),
            "Parsed list envelope"
        );

        Ok(Self {
            items,
            continuation,
            total_count,
        })
    }
}

/// Reads `_links.next.href`. A missing or `null` link means there is no next page.
fn next_link(envelope: &Map<String, Value>) -> Result<Option<Continuation>, EnvelopeError> {
    let next = envelope.get("_links").and_then(|links| links.get("next"));
    match next {
        None | Some(Value::Null) => Ok(None),
        Some(link) => match link.get("href") {
            Some(Value::String(href)) => Continuation::parse(href).map(Some),
            _ => Err(EnvelopeError::InvalidNextLink {
                href: link.to_string(),
            }),
        },
    }
}
