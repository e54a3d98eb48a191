//! Page sources.
//!
//! A [`PagedSource`] performs one page request at a time and knows nothing
//! about iteration. [`RestPagedSource`] is the implementation backed by a
//! [`RestClient`]; [`ResourcePage`] is a decoded page that can fetch its
//! successor.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{HttpMethod, HttpRequest, RestClient, RestError};
use crate::pagination::{Continuation, Page};

/// Which page to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageRequest {
    /// The first page, with the planned page size.
    First {
        /// Number of items to ask for.
        limit: usize,
    },
    /// The page behind a `next` link.
    Next(Continuation),
}

/// Fetches single pages of one collection.
///
/// `fetch` is a plain method returning a boxed future: implementations may do
/// bookkeeping synchronously and defer only the I/O. The future is `'static`
/// so it can run as a background task.
pub trait PagedSource: Send + Sync + fmt::Debug {
    /// Starts fetching the requested page.
    fn fetch(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<Value>, RestError>>;
}

/// Extra query parameters for list requests.
///
/// # Example
///
/// ```rust
/// use mollie_api::pagination::PageQuery;
///
/// let query = PageQuery::new().limit(50).param("profileId", "pfl_QkEhN94Ba");
/// assert_eq!(query.limit_value(), Some(50));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    limit: Option<usize>,
    params: Vec<(String, String)>,
}

impl PageQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size for [`RestClient::page`].
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Adds a query parameter, such as `from` or `testmode`.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Returns the page size, if one was set.
    #[must_use]
    pub const fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    pub(crate) fn into_params(self) -> Vec<(String, String)> {
        self.params
    }
}

/// A [`PagedSource`] over a REST list endpoint.
///
/// The first page is `GET <path>?limit=<n>&<params>`; later pages replay the
/// `next` link's raw query string against the same path.
#[derive(Clone, Debug)]
pub struct RestPagedSource {
    client: RestClient,
    path: String,
    resource_key: String,
    params: Vec<(String, String)>,
}

impl RestPagedSource {
    /// Creates a source for the collection at `path`, whose items live under
    /// `_embedded.<resource_key>`.
    #[must_use]
    pub fn new(
        client: RestClient,
        path: impl Into<String>,
        resource_key: impl Into<String>,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            resource_key: resource_key.into(),
            params,
        }
    }

    fn http_request_for(&self, request: PageRequest) -> Result<HttpRequest, RestError> {
        let request = match request {
            PageRequest::First { limit } => {
                let mut query = Vec::with_capacity(self.params.len() + 1);
                query.push(("limit".to_string(), limit.to_string()));
                query.extend(self.params.iter().cloned());
                HttpRequest::builder(HttpMethod::Get, self.path.clone()).query(query)
            }
            PageRequest::Next(continuation) => {
                let path = match continuation.raw_query() {
                    Some(raw) => format!("{}?{raw}", self.path),
                    None => self.path.clone(),
                };
                HttpRequest::builder(HttpMethod::Get, path)
            }
        };
        Ok(request.build()?)
    }
}

impl PagedSource for RestPagedSource {
    fn fetch(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<Value>, RestError>> {
        let client = self.client.clone();
        let resource_key = self.resource_key.clone();
        let request = self.http_request_for(request);

        async move {
            let response = client.send(request?).await?;
            Ok::<_, RestError>(Page::from_envelope(response.body, &resource_key)?)
        }
        .boxed()
    }
}

/// Decodes JSON items into `T`, naming `resource` in errors.
pub(crate) fn decode_item<T: DeserializeOwned>(resource: &str, item: Value) -> Result<T, RestError> {
    serde_json::from_value(item).map_err(|source| RestError::Deserialize {
        resource: resource.to_string(),
        source,
    })
}

/// A decoded page of a collection.
///
/// Dereferences to the slice of items.
///
/// # Example
///
/// ```rust,ignore
/// let mut page = client
///     .page::<serde_json::Value>("payments", "payments", PageQuery::new().limit(50))
///     .await?;
/// loop {
///     for payment in page.iter() {
///         println!("{}", payment["id"]);
///     }
///     match page.next_page().await {
///         Some(next) => page = next?,
///         None => break,
///     }
/// }
/// ```
pub struct ResourcePage<T> {
    items: Vec<T>,
    total_count: usize,
    continuation: Option<Continuation>,
    source: Arc<dyn PagedSource>,
    resource_key: String,
}

impl<T: DeserializeOwned> ResourcePage<T> {
    /// Fetches a page from `source` and decodes its items.
    ///
    /// # Errors
    ///
    /// Returns the source's error, or [`RestError::Deserialize`] when an item
    /// does not decode into `T`.
    pub async fn fetch(
        source: Arc<dyn PagedSource>,
        request: PageRequest,
        resource_key: &str,
    ) -> Result<Self, RestError> {
        let page = source.fetch(request).await?;
        let items = page
            .items
            .into_iter()
            .map(|item| decode_item(resource_key, item))
            .collect::<Result<Vec<T>, _>>()?;

        Ok(Self {
            items,
            total_count: page.total_count,
            continuation: page.continuation,
            source,
            resource_key: resource_key.to_string(),
        })
    }

    /// Fetches the following page, or returns `None` on the last page.
    pub async fn next_page(&self) -> Option<Result<Self, RestError>> {
        let continuation = self.continuation.clone()?;
        Some(
            Self::fetch(
                Arc::clone(&self.source),
                PageRequest::Next(continuation),
                &self.resource_key,
            )
            .await,
        )
    }
}

impl<T> ResourcePage<T> {
    /// Returns `true` if a following page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.continuation.is_some()
    }

    /// The server's `count` for this page.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    /// Link to the following page, if any.
    #[must_use]
    pub const fn continuation(&self) -> Option<&Continuation> {
        self.continuation.as_ref()
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for ResourcePage<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourcePage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePage")
            .field("items", &self.items)
            .field("total_count", &self.total_count)
            .field("continuation", &self.continuation)
            .finish_non_exhaustive()
    }
}
