use roaring::RoaringBitmap;

use crate::{DocId, TERMINATED};

use super::{PostingCursor, Postings, debug_check_sorted};

/// Compressed bitmap postings backed by [`RoaringBitmap`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoaringPostings {
    bitmap: RoaringBitmap,
}

impl RoaringPostings {
    pub fn bitmap(&self) -> &RoaringBitmap {
        &self.bitmap
    }
}

impl From<RoaringBitmap> for RoaringPostings {
    fn from(bitmap: RoaringBitmap) -> Self {
        Self { bitmap }
    }
}

impl Postings for RoaringPostings {
    type Cursor<'a> = RoaringCursor<'a>;

    fn from_sorted(doc_ids: &[DocId]) -> Self {
        debug_check_sorted(doc_ids);
        Self {
            bitmap: doc_ids.iter().copied().collect(),
        }
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let mut it = self.bitmap.iter();
        let doc = it.next().unwrap_or(TERMINATED);
        RoaringCursor { it, doc }
    }

    fn len(&self) -> u64 {
        self.bitmap.len()
    }
}

pub struct RoaringCursor<'a> {
    it: roaring::bitmap::Iter<'a>,
    doc: DocId,
}

impl PostingCursor for RoaringCursor<'_> {
    #[inline(always)]
    fn doc(&self) -> DocId {
        self.doc
    }

    #[inline(always)]
    fn advance(&mut self) -> DocId {
        // the bitmap iterator is not guaranteed to be fused
        if self.doc != TERMINATED {
            self.doc = self.it.next().unwrap_or(TERMINATED);
        }
        self.doc
    }
}
