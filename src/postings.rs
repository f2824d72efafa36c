use std::fmt::Debug;

use crate::{DocId, TERMINATED};

mod bitmap;
mod roaringish;
mod sorted;

pub use bitmap::{RoaringCursor, RoaringPostings};
pub use roaringish::{PackedCursor, PackedPostings};
pub use sorted::{SortedCursor, SortedPostings};

/// Forward only cursor over the document ids of one posting list.
///
/// A fresh cursor is positioned on the first id. Once [`TERMINATED`] is
/// reached every method keeps returning it.
pub trait PostingCursor {
    /// Current document id, or [`TERMINATED`].
    fn doc(&self) -> DocId;

    /// Moves to the next id and returns it.
    fn advance(&mut self) -> DocId;

    /// Moves to the first id `>= target` and returns it. Never moves
    /// backwards: if the cursor already sits on or past `target` nothing
    /// happens.
    fn seek(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc();
        while doc < target {
            doc = self.advance();
        }
        doc
    }
}

/// A sealed, strictly increasing set of document ids.
///
/// The storage layout is private to each implementation, everything the
/// query engine needs goes through [`PostingCursor`].
pub trait Postings: Debug + Sized {
    type Cursor<'a>: PostingCursor
    where
        Self: 'a;

    /// Builds the list from strictly increasing ids.
    ///
    /// Every id must be below [`TERMINATED`], which cursors return once
    /// exhausted. Both conditions are checked in debug builds only.
    fn from_sorted(doc_ids: &[DocId]) -> Self;

    fn cursor(&self) -> Self::Cursor<'_>;

    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains a fresh cursor into a vector.
    fn to_vec(&self) -> Vec<DocId> {
        let mut doc_ids = Vec::with_capacity(self.len() as usize);
        let mut cursor = self.cursor();
        let mut doc = cursor.doc();
        while doc != TERMINATED {
            doc_ids.push(doc);
            doc = cursor.advance();
        }
        doc_ids
    }
}

// Shared precondition of every `from_sorted`.
#[inline]
pub(crate) fn debug_check_sorted(doc_ids: &[DocId]) {
    debug_assert!(
        doc_ids.windows(2).all(|w| w[0] < w[1]),
        "doc ids must be strictly increasing"
    );
    debug_assert!(
        doc_ids.last().is_none_or(|d| *d != TERMINATED),
        "doc id {TERMINATED} is reserved"
    );
}
