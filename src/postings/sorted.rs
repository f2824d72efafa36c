use crate::{DocId, TERMINATED, utils::gallop};

use super::{PostingCursor, Postings, debug_check_sorted};

/// Plain inverted list: the ids stored as a sorted array.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortedPostings {
    doc_ids: Box<[DocId]>,
}

impl SortedPostings {
    pub fn as_slice(&self) -> &[DocId] {
        &self.doc_ids
    }
}

impl Postings for SortedPostings {
    type Cursor<'a> = SortedCursor<'a>;

    fn from_sorted(doc_ids: &[DocId]) -> Self {
        debug_check_sorted(doc_ids);
        Self {
            doc_ids: doc_ids.into(),
        }
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        SortedCursor {
            doc_ids: &self.doc_ids,
            i: 0,
        }
    }

    fn len(&self) -> u64 {
        self.doc_ids.len() as u64
    }

    fn to_vec(&self) -> Vec<DocId> {
        self.doc_ids.to_vec()
    }
}

pub struct SortedCursor<'a> {
    doc_ids: &'a [DocId],
    i: usize,
}

impl PostingCursor for SortedCursor<'_> {
    #[inline(always)]
    fn doc(&self) -> DocId {
        self.doc_ids.get(self.i).copied().unwrap_or(TERMINATED)
    }

    #[inline(always)]
    fn advance(&mut self) -> DocId {
        if self.i < self.doc_ids.len() {
            self.i += 1;
        }
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        self.i = gallop(self.doc_ids, self.i, target);
        self.doc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postings::tests::{SAMPLES, check_cursor, check_seek};

    #[test]
    fn sorted_cursor() {
        for doc_ids in SAMPLES {
            check_cursor::<SortedPostings>(doc_ids);
        }
    }

    #[test]
    fn sorted_seek() {
        for doc_ids in SAMPLES {
            check_seek::<SortedPostings>(doc_ids);
        }
    }
}
