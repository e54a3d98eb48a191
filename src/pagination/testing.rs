//! In-memory page source used by the pagination unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde_json::{json, Value};

use crate::clients::RestError;
use crate::pagination::{Continuation, EnvelopeError, Page, PageRequest, PagedSource};

/// Serves a fixed list of pages and records every request.
///
/// Page `i` links to page `i + 1` through `?page=<i + 1>`. Pages at or after
/// `hang_from` never resolve; the page at `fail_at` resolves to an error.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pages: Vec<Vec<Value>>,
    requests: Mutex<Vec<PageRequest>>,
    count: AtomicUsize,
    hang_from: Option<usize>,
    fail_at: Option<usize>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Pages of consecutive integers with the given sizes.
    pub fn numbered(sizes: &[usize]) -> Self {
        let mut next = 0_u64;
        let pages = sizes
            .iter()
            .map(|&size| {
                (0..size)
                    .map(|_| {
                        next += 1;
                        json!(next - 1)
                    })
                    .collect()
            })
            .collect();
        Self::new(pages)
    }

    pub fn hang_from(mut self, page: usize) -> Self {
        self.hang_from = Some(page);
        self
    }

    pub fn fail_at(mut self, page: usize) -> Self {
        self.fail_at = Some(page);
        self
    }

    pub fn request_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn page_index(request: &PageRequest) -> usize {
        match request {
            PageRequest::First { .. } => 0,
            PageRequest::Next(continuation) => continuation
                .query()
                .iter()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse().ok())
                .unwrap_or(usize::MAX),
        }
    }
}

impl PagedSource for ScriptedSource {
    fn fetch(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<Value>, RestError>> {
        self.count.fetch_add(1, Ordering::SeqCst);
        let index = Self::page_index(&request);
        self.requests.lock().unwrap().push(request);

        if self.hang_from.is_some_and(|from| index >= from) {
            return future::pending().boxed();
        }
        if self.fail_at == Some(index) {
            return future::ready(Err(EnvelopeError::MissingEmbedded.into())).boxed();
        }

        let items = self.pages.get(index).cloned().unwrap_or_default();
        let continuation = (index + 1 < self.pages.len()).then(|| {
            Continuation::parse(&format!("https://api.example.test/v2/items?page={}", index + 1))
                .unwrap()
        });
        let page = Page {
            total_count: items.len(),
            items,
            continuation,
        };
        future::ready(Ok(page)).boxed()
    }
}
