//! Pagination for Mollie list endpoints.
//!
//! # Overview
//!
//! - [`Page`], [`Continuation`]: a parsed list envelope
//! - [`PagedSource`]: fetches one page; [`RestPagedSource`] is the HTTP one
//! - [`ResourcePage`]: a decoded page with a [`next_page`](ResourcePage::next_page) capability
//! - [`Demand`], [`ChainNode`], [`PageLimits`]: first-page planning
//! - [`Sequence`]: a lazy, composable sequence over a whole collection
//!
//! # Page sizing
//!
//! | Chain | First page |
//! |---|---|
//! | *(none)* | 128 |
//! | `take(80)` | 80 |
//! | `drop(10).take(80)` | 90 |
//! | `filter(..).take(80)` | 128 |
//! | `take(300)` | 250 |

mod cursor;
mod demand;
mod envelope;
mod sequence;
mod source;
#[cfg(test)]
pub(crate) mod testing;

pub use demand::{
    ChainExt, ChainNode, Demand, PageLimits, DEFAULT_PAGE_SIZE, LOW_WATER_MARK, MAX_PAGE_SIZE,
};
pub use envelope::{Continuation, EnvelopeError, Page};
pub use sequence::{ItemStream, Sequence};
pub use source::{PageQuery, PageRequest, PagedSource, ResourcePage, RestPagedSource};
