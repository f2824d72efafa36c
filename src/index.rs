use fxhash::FxHashMap;

use crate::{
    postings::Postings,
    query::{self, Query},
    utils::normalize,
};

/// Frozen term -> posting list mapping produced by the [`Indexer`](crate::Indexer).
///
/// Nothing mutates an index after it is built, so it can be shared between
/// threads and queried concurrently, each query with its own
/// [`Hits`](crate::Hits).
#[derive(Debug)]
pub struct Index<P: Postings> {
    terms: FxHashMap<Box<str>, P>,
    num_docs: u32,
    // handed out for lookup misses
    empty: P,
}

impl<P: Postings> Index<P> {
    pub(crate) fn new(terms: FxHashMap<Box<str>, P>, num_docs: u32) -> Self {
        Self {
            terms,
            num_docs,
            empty: P::from_sorted(&[]),
        }
    }

    /// Posting list of `term`, folded the same way documents are.
    ///
    /// A term that never occurred yields an empty list instead of an error,
    /// so queries over it simply match nothing.
    pub fn postings(&self, term: &str) -> &P {
        self.get(term).unwrap_or(&self.empty)
    }

    /// Like [`Index::postings`] but tells misses apart.
    pub fn get(&self, term: &str) -> Option<&P> {
        self.terms.get(normalize(term).as_str())
    }

    /// Shortcut for `term("", index.postings(text))`.
    pub fn term(&self, text: &str) -> Query<'_, P> {
        query::term("", self.postings(text))
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Indexed terms in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(|t| t.as_ref())
    }
}
