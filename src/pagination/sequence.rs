//! Lazy, composable sequences over paginated collections.
//!
//! A [`Sequence`] is a description of work: a page source, a chain of
//! combinators, and nothing else. Iterating it (via
//! [`into_stream`](Sequence::into_stream) or [`collect`](Sequence::collect))
//! plans the first page size from the chain, then pulls pages on demand,
//! prefetching the next page while the current one is consumed.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use mollie_api::pagination::PageQuery;
//!
//! // Skip the newest ten payments and look at the next eighty. The first
//! // request asks for exactly ninety items.
//! let mut payments = client
//!     .list::<serde_json::Value>("payments", "payments", PageQuery::new())?
//!     .drop(10)
//!     .take(80)
//!     .into_stream();
//!
//! while let Some(payment) = payments.try_next().await? {
//!     println!("{}", payment["id"]);
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::RestError;
use crate::pagination::cursor::PageCursor;
use crate::pagination::source::decode_item;
use crate::pagination::{ChainExt, ChainNode, Demand, PageLimits, PagedSource};

/// A boxed stream of sequence items.
pub type ItemStream<T> = BoxStream<'static, Result<T, RestError>>;

type Stages<T> = Box<dyn FnOnce(ItemStream<Value>) -> ItemStream<T> + Send>;

/// A lazy sequence of items from a paginated collection.
///
/// Combinators consume the sequence and return a new one; composition order
/// is application order. Nothing is fetched before the sequence is iterated,
/// and a sequence is iterated at most once.
pub struct Sequence<T> {
    source: Arc<dyn PagedSource>,
    limits: PageLimits,
    chain: Arc<ChainNode>,
    stages: Stages<T>,
}

impl Sequence<Value> {
    /// Creates a sequence over every item `source` can produce.
    #[must_use]
    pub fn new(source: Arc<dyn PagedSource>, limits: PageLimits) -> Self {
        Self {
            source,
            limits,
            chain: ChainNode::source(),
            stages: Box::new(|items| items),
        }
    }

    /// Decodes raw items into `U`. Does not change the demand.
    pub(crate) fn decode<U>(self, resource: &str) -> Sequence<U>
    where
        U: DeserializeOwned + Send + 'static,
    {
        let resource = resource.to_string();
        let chain = Arc::clone(&self.chain);
        self.wrap(chain, move |items| {
            items
                .map(move |item| item.and_then(|value| decode_item(&resource, value)))
                .boxed()
        })
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Yields at most `count` items, then ends.
    #[must_use]
    pub fn take(self, count: usize) -> Self {
        let chain = ChainExt::take(&self.chain, count);
        self.wrap(chain, move |items| items.take(count).boxed())
    }

    /// Skips the first `count` items, then yields the rest unchanged.
    ///
    /// Skipped items are still fetched. Errors are never skipped.
    #[must_use]
    pub fn drop(self, count: usize) -> Self {
        let chain = ChainExt::drop(&self.chain, count);
        self.wrap(chain, move |items| {
            let mut to_skip = count;
            items
                .try_filter(move |_| {
                    let keep = to_skip == 0;
                    to_skip = to_skip.saturating_sub(1);
                    future::ready(keep)
                })
                .boxed()
        })
    }

    /// Yields only the items for which `predicate` holds.
    ///
    /// A filter makes the number of items needed from the source unknowable,
    /// so pages are sized by default once one is applied.
    #[must_use]
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let chain = ChainExt::filter(&self.chain);
        self.wrap(chain, move |items| {
            items
                .try_filter(move |item| future::ready(predicate(item)))
                .boxed()
        })
    }

    /// Transforms every item with `transform`.
    #[must_use]
    pub fn map<U, F>(self, transform: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let chain = ChainExt::map(&self.chain);
        self.wrap(chain, move |items| items.map_ok(transform).boxed())
    }

    /// Returns how many items the source must produce to satisfy the chain.
    #[must_use]
    pub fn demand(&self) -> Demand {
        self.chain.demand()
    }

    /// Returns the size of the first page request iteration would make.
    #[must_use]
    pub fn first_page_size(&self) -> usize {
        self.limits.first_page_size(self.demand())
    }

    /// Returns the combinator chain.
    #[must_use]
    pub const fn chain(&self) -> &Arc<ChainNode> {
        &self.chain
    }

    /// Starts iterating.
    ///
    /// The returned stream ends after the first error. Dropping it early
    /// discards any page request still in flight.
    ///
    /// Must be polled inside a tokio runtime: page requests run as tasks.
    #[must_use]
    pub fn into_stream(self) -> ItemStream<T> {
        let demand = self.chain.demand();
        tracing::debug!(
            ?demand,
            first_page_size = self.limits.first_page_size(demand),
            "Planned sequence"
        );

        let raw = PageCursor::new(self.source, self.limits, demand).into_stream();
        (self.stages)(raw)
            .scan(false, |failed, item| {
                if *failed {
                    return future::ready(None);
                }
                *failed = item.is_err();
                future::ready(Some(item))
            })
            .boxed()
    }

    /// Drains the sequence into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first error the sequence produces.
    pub async fn collect(self) -> Result<Vec<T>, RestError> {
        self.into_stream().try_collect().await
    }

    fn wrap<U, F>(self, chain: Arc<ChainNode>, stage: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: FnOnce(ItemStream<T>) -> ItemStream<U> + Send + 'static,
    {
        let stages = self.stages;
        Sequence {
            source: self.source,
            limits: self.limits,
            chain,
            stages: Box::new(move |items| stage(stages(items))),
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("source", &self.source)
            .field("limits", &self.limits)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}
