//! Lazy boolean evaluation (AND, OR, AND-NOT) over posting lists.
//!
//! A corpus is indexed once by the [`Indexer`] into a frozen [`Index`], then
//! queries are built from its posting lists and drained through [`Hits`].
//! The storage of a posting list is hidden behind [`Postings`]; the
//! [`Corpus`] harness runs the same queries over every representation and
//! checks they agree.

mod error;
mod harness;
mod index;
mod indexer;
mod postings;
mod query;
mod utils;

/// Document identifier, assigned from 0 in ingestion order.
pub type DocId = u32;

/// Returned by exhausted cursors. Never a valid [`DocId`].
pub const TERMINATED: DocId = DocId::MAX;

pub use error::{BuildError, EquivalenceError};
pub use harness::{Corpus, Engine, Shape, Terms, Throughput};
pub use index::Index;
pub use indexer::{Granularity, Indexer, Sources};
pub use postings::{
    PackedCursor, PackedPostings, PostingCursor, Postings, RoaringCursor, RoaringPostings,
    SortedCursor, SortedPostings,
};
pub use query::{Hits, Query, and, and_not, or, term};
pub use utils::{normalize, tokenize};
