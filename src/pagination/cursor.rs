//! Per-iteration paging state.
//!
//! A [`PageCursor`] owns everything one pass over a collection needs: the
//! buffer of fetched items, the current continuation and a single slot for
//! the page request in flight. Page requests run as tokio tasks so the next
//! page can download while buffered items are consumed.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::clients::RestError;
use crate::pagination::{Continuation, Demand, Page, PageLimits, PageRequest, PagedSource};

type PageTask = JoinHandle<Result<Page<Value>, RestError>>;

pub(crate) struct PageCursor {
    source: Arc<dyn PagedSource>,
    limits: PageLimits,
    demand: Demand,
    buffer: VecDeque<Value>,
    continuation: Option<Continuation>,
    pending: Option<PageTask>,
    pulled: usize,
    started: bool,
    resumed: bool,
    done: bool,
}

impl PageCursor {
    pub(crate) fn new(source: Arc<dyn PagedSource>, limits: PageLimits, demand: Demand) -> Self {
        Self {
            source,
            limits,
            demand,
            buffer: VecDeque::new(),
            continuation: None,
            pending: None,
            pulled: 0,
            started: false,
            resumed: false,
            done: false,
        }
    }

    /// Turns the cursor into a stream of raw items.
    pub(crate) fn into_stream(self) -> BoxStream<'static, Result<Value, RestError>> {
        stream::unfold(self, |mut cursor| async move {
            cursor.next_item().await.map(|item| (item, cursor))
        })
        .boxed()
    }

    /// Items still owed to the consumer under a bounded demand.
    fn remaining(&self) -> Option<usize> {
        self.demand
            .bound()
            .map(|bound| bound.saturating_sub(self.pulled))
    }

    fn spawn_fetch(&mut self, request: PageRequest) {
        let fetch = self.source.fetch(request);
        self.pending = Some(tokio::spawn(fetch));
    }

    /// Issues the next page request early once the buffer runs low.
    ///
    /// Only called when resuming after a yielded item, so a consumer that
    /// stops after any item never causes a fetch it did not ask for.
    fn maybe_prefetch(&mut self) {
        if self.pending.is_some() || self.buffer.len() > self.limits.low_water_mark() {
            return;
        }
        if self
            .remaining()
            .is_some_and(|remaining| remaining <= self.buffer.len())
        {
            return;
        }
        if let Some(next) = self.continuation.take() {
            tracing::debug!(
                buffered = self.buffer.len(),
                pulled = self.pulled,
                "Prefetching next page"
            );
            self.spawn_fetch(PageRequest::Next(next));
        }
    }

    fn finish(&mut self) {
        self.done = true;
        self.buffer.clear();
        self.continuation = None;
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Pulls the next item, fetching pages as needed.
    ///
    /// Returns `None` once the collection or the demand is exhausted. After an
    /// error the cursor is exhausted too.
    pub(crate) async fn next_item(&mut self) -> Option<Result<Value, RestError>> {
        if self.done {
            return None;
        }
        if self.remaining() == Some(0) {
            self.finish();
            return None;
        }

        if !self.started {
            self.started = true;
            let limit = self.limits.first_page_size(self.demand);
            self.spawn_fetch(PageRequest::First { limit });
        } else if self.resumed {
            self.maybe_prefetch();
        }

        loop {
            if let Some(item) = self.buffer.pop_front() {
                self.pulled += 1;
                self.resumed = true;
                return Some(Ok(item));
            }

            if self.pending.is_none() {
                match self.continuation.take() {
                    Some(next) => self.spawn_fetch(PageRequest::Next(next)),
                    None => {
                        self.finish();
                        return None;
                    }
                }
            }

            let task = self.pending.as_mut()?;
            let outcome = task.await;
            self.pending = None;

            match outcome {
                Ok(Ok(page)) => {
                    self.buffer.extend(page.items);
                    self.continuation = page.continuation;
                }
                Ok(Err(error)) => {
                    self.finish();
                    return Some(Err(error));
                }
                Err(join_error) => {
                    self.finish();
                    return Some(Err(RestError::PageTask {
                        message: join_error.to_string(),
                    }));
                }
            }
        }
    }
}

impl Drop for PageCursor {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            tracing::debug!(pulled = self.pulled, "Discarding in-flight page request");
            task.abort();
        }
    }
}
