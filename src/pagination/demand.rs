//! Demand planning for lazy sequences.
//!
//! Every combinator applied to a [`Sequence`](crate::pagination::Sequence)
//! also records a [`ChainNode`]. Before the first request the chain is folded
//! from the outermost combinator inward to find how many items the source
//! must produce, and that [`Demand`] sizes the first page.
//!
//! # Example
//!
//! ```rust
//! use mollie_api::pagination::{ChainExt, ChainNode, Demand, PageLimits};
//!
//! // drop(10).take(80): skip ten, keep eighty, so ninety must be fetched
//! let chain = ChainNode::source().drop(10).take(80);
//! assert_eq!(chain.demand(), Demand::Bounded(90));
//! assert_eq!(PageLimits::default().first_page_size(chain.demand()), 90);
//! ```

use std::ops::Add;
use std::sync::Arc;

use crate::error::ConfigError;

/// Page size requested when the demand is unbounded.
pub const DEFAULT_PAGE_SIZE: usize = 128;

/// Largest page the API serves.
pub const MAX_PAGE_SIZE: usize = 250;

/// Buffered item count at or below which the next page is prefetched.
pub const LOW_WATER_MARK: usize = 5;

/// How many items must ultimately be pulled from the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Demand {
    /// Exactly this many items at most.
    Bounded(usize),
    /// The consumer may drain the whole collection.
    Unbounded,
}

impl Demand {
    /// The smaller of two demands; `Unbounded` is the identity.
    #[must_use]
    pub const fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Bounded(a), Self::Bounded(b)) => Self::Bounded(if a < b { a } else { b }),
            (Self::Unbounded, other) => other,
            (bounded, Self::Unbounded) => bounded,
        }
    }

    /// Returns the bound, if there is one.
    #[must_use]
    pub const fn bound(self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(n),
            Self::Unbounded => None,
        }
    }
}

impl Add for Demand {
    type Output = Self;

    /// Sums two demands; anything plus `Unbounded` is `Unbounded`.
    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Bounded(a), Self::Bounded(b)) => Self::Bounded(a.saturating_add(b)),
            _ => Self::Unbounded,
        }
    }
}

/// One combinator in a sequence's chain, linked to the node it wraps.
///
/// Nodes carry only what the planner needs: counts for `Take` and `Drop`,
/// nothing for `Filter` and `Map`. Chains are immutable and share their
/// upstream, so deriving two sequences from one base is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainNode {
    /// The paged collection itself.
    Source,
    /// Keep at most `count` items.
    Take {
        /// Number of items kept.
        count: usize,
        /// The wrapped node.
        upstream: Arc<ChainNode>,
    },
    /// Skip the first `count` items.
    Drop {
        /// Number of items skipped.
        count: usize,
        /// The wrapped node.
        upstream: Arc<ChainNode>,
    },
    /// Keep items matching a predicate.
    Filter {
        /// The wrapped node.
        upstream: Arc<ChainNode>,
    },
    /// Transform every item.
    Map {
        /// The wrapped node.
        upstream: Arc<ChainNode>,
    },
}

impl ChainNode {
    /// The root of every chain.
    #[must_use]
    pub fn source() -> Arc<Self> {
        Arc::new(Self::Source)
    }

    /// Returns the node this one wraps, or `None` for the source.
    #[must_use]
    pub const fn upstream(&self) -> Option<&Arc<Self>> {
        match self {
            Self::Source => None,
            Self::Take { upstream, .. }
            | Self::Drop { upstream, .. }
            | Self::Filter { upstream }
            | Self::Map { upstream } => Some(upstream),
        }
    }

    /// Folds the chain from this (outermost) node down to the source and
    /// returns what the source must produce.
    #[must_use]
    pub fn demand(&self) -> Demand {
        let mut required = Demand::Unbounded;
        let mut node = self;
        loop {
            required = match node {
                Self::Source => return required,
                Self::Take { count, .. } => Demand::Bounded(*count).min(required),
                Self::Drop { count, .. } => required + Demand::Bounded(*count),
                Self::Filter { .. } => Demand::Unbounded,
                Self::Map { .. } => required,
            };
            match node.upstream() {
                Some(upstream) => node = upstream.as_ref(),
                None => return required,
            }
        }
    }
}

/// Chain-building helpers on shared nodes.
pub trait ChainExt {
    /// Wraps the chain in a `Take`.
    #[must_use]
    fn take(&self, count: usize) -> Arc<ChainNode>;
    /// Wraps the chain in a `Drop`.
    #[must_use]
    fn drop(&self, count: usize) -> Arc<ChainNode>;
    /// Wraps the chain in a `Filter`.
    #[must_use]
    fn filter(&self) -> Arc<ChainNode>;
    /// Wraps the chain in a `Map`.
    #[must_use]
    fn map(&self) -> Arc<ChainNode>;
}

impl ChainExt for Arc<ChainNode> {
    fn take(&self, count: usize) -> Arc<ChainNode> {
        Arc::new(ChainNode::Take {
            count,
            upstream: Arc::clone(self),
        })
    }

    fn drop(&self, count: usize) -> Arc<ChainNode> {
        Arc::new(ChainNode::Drop {
            count,
            upstream: Arc::clone(self),
        })
    }

    fn filter(&self) -> Arc<ChainNode> {
        Arc::new(ChainNode::Filter {
            upstream: Arc::clone(self),
        })
    }

    fn map(&self) -> Arc<ChainNode> {
        Arc::new(ChainNode::Map {
            upstream: Arc::clone(self),
        })
    }
}

/// Page sizing used by lazy sequences and single-page listing.
///
/// # Example
///
/// ```rust
/// use mollie_api::pagination::{Demand, PageLimits};
///
/// let limits = PageLimits::new(50, 250, 5).unwrap();
/// assert_eq!(limits.first_page_size(Demand::Unbounded), 50);
/// assert_eq!(limits.first_page_size(Demand::Bounded(3218)), 250);
///
/// assert!(PageLimits::new(300, 250, 5).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    default_page_size: usize,
    max_page_size: usize,
    low_water_mark: usize,
}

impl PageLimits {
    /// Creates page limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPageLimits`] if `max_page_size` is zero,
    /// `default_page_size` is zero, or `default_page_size` exceeds
    /// `max_page_size`.
    pub fn new(
        default_page_size: usize,
        max_page_size: usize,
        low_water_mark: usize,
    ) -> Result<Self, ConfigError> {
        if max_page_size == 0 {
            return Err(ConfigError::InvalidPageLimits {
                reason: "max_page_size must be at least 1".to_string(),
            });
        }
        if default_page_size == 0 || default_page_size > max_page_size {
            return Err(ConfigError::InvalidPageLimits {
                reason: format!(
                    "default_page_size must be between 1 and max_page_size ({max_page_size}), got {default_page_size}"
                ),
            });
        }
        Ok(Self {
            default_page_size,
            max_page_size,
            low_water_mark,
        })
    }

    /// Page size used when nothing bounds the demand.
    #[must_use]
    pub const fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// Largest page size ever requested.
    #[must_use]
    pub const fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Buffer level at or below which the next page is prefetched.
    #[must_use]
    pub const fn low_water_mark(&self) -> usize {
        self.low_water_mark
    }

    /// Translates a demand into the size of the first page request.
    #[must_use]
    pub const fn first_page_size(&self, demand: Demand) -> usize {
        match demand {
            Demand::Bounded(n) if n < self.max_page_size => n,
            Demand::Bounded(_) => self.max_page_size,
            Demand::Unbounded => self.default_page_size,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            low_water_mark: LOW_WATER_MARK,
        }
    }
}
