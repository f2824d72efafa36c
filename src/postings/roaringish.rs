use std::fmt::{Binary, Debug, Display};

use crate::{DocId, TERMINATED};

use super::{PostingCursor, Postings, debug_check_sorted};

// Every packed u64 is a group of 16 consecutive document ids:
//
//   | group (48 bits) | values (16 bits) |
//
// bit `i` of values is set when `group * 16 + i` is in the list. Groups are
// strictly increasing and values is never zero.

const MASK_VALUES: u64 = 0xFFFF;

const fn group(doc_id: DocId) -> u64 {
    (doc_id / 16) as u64
}

const fn value(doc_id: DocId) -> u32 {
    doc_id % 16
}

const fn make_group(group: u64) -> u64 {
    group << 16
}

const fn get_group(packed: u64) -> u64 {
    packed >> 16
}

const fn make_value(value: u32) -> u64 {
    1 << value
}

const fn get_values(packed: u64) -> u16 {
    (packed & MASK_VALUES) as u16
}

const fn make_doc_id(group: u64, value: u32) -> DocId {
    (group * 16) as DocId + value
}

/// Posting list packed in groups of 16 ids with a bitmask per group.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct PackedPostings {
    packed: Box<[u64]>,
    len: u64,
}

impl PackedPostings {
    /// Number of packed groups (not documents).
    pub fn num_groups(&self) -> usize {
        self.packed.len()
    }
}

impl Postings for PackedPostings {
    type Cursor<'a> = PackedCursor<'a>;

    fn from_sorted(doc_ids: &[DocId]) -> Self {
        debug_check_sorted(doc_ids);

        let packed: Box<[u64]> = doc_ids
            .chunk_by(|d0, d1| group(*d0) == group(*d1))
            .map(|doc_ids| {
                let mut packed = make_group(group(doc_ids[0]));
                for doc_id in doc_ids {
                    packed |= make_value(value(*doc_id));
                }
                packed
            })
            .collect();

        Self {
            packed,
            len: doc_ids.len() as u64,
        }
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let mut cursor = PackedCursor {
            packed: &self.packed,
            i: 0,
            values: 0,
            doc: TERMINATED,
        };
        cursor.load();
        cursor
    }

    fn len(&self) -> u64 {
        self.len
    }
}

pub struct PackedCursor<'a> {
    packed: &'a [u64],
    i: usize,
    // bits of the current group that were not consumed yet
    values: u16,
    doc: DocId,
}

impl PackedCursor<'_> {
    #[inline(always)]
    fn load(&mut self) {
        match self.packed.get(self.i) {
            Some(packed) => {
                self.values = get_values(*packed);
                self.emit();
            }
            None => {
                self.values = 0;
                self.doc = TERMINATED;
            }
        }
    }

    // values must not be zero
    #[inline(always)]
    fn emit(&mut self) {
        let group = get_group(self.packed[self.i]);
        self.doc = make_doc_id(group, self.values.trailing_zeros());
    }
}

impl PostingCursor for PackedCursor<'_> {
    #[inline(always)]
    fn doc(&self) -> DocId {
        self.doc
    }

    #[inline(always)]
    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }

        // clear the lowest set bit
        self.values &= self.values - 1;
        if self.values == 0 {
            self.i += 1;
            self.load();
        } else {
            self.emit();
        }
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }

        let target_group = group(target);
        if get_group(self.packed[self.i]) < target_group {
            let rest = &self.packed[(self.i + 1)..];
            self.i += 1 + rest.partition_point(|p| get_group(*p) < target_group);
            if self.i >= self.packed.len() {
                self.values = 0;
                self.doc = TERMINATED;
                return self.doc;
            }
            self.values = get_values(self.packed[self.i]);
        }

        if get_group(self.packed[self.i]) == target_group {
            self.values &= u16::MAX << value(target);
            if self.values == 0 {
                self.i += 1;
                self.load();
                return self.doc;
            }
        }

        self.emit();
        self.doc
    }
}

impl Debug for PackedPostings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        struct Group(u64);
        impl Debug for Group {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let values = get_values(self.0);
                f.debug_tuple("")
                    .field(&get_group(self.0))
                    .field(&(0..16u32).filter(|i| (values >> i) & 1 == 1).collect::<Vec<_>>())
                    .finish()
            }
        }

        f.debug_list()
            .entries(self.packed.iter().map(|packed| Group(*packed)))
            .finish()
    }
}

impl Binary for PackedPostings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        struct Group(u64);
        impl Debug for Group {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:048b} {:016b}", get_group(self.0), get_values(self.0))
            }
        }

        f.debug_list()
            .entries(self.packed.iter().map(|packed| Group(*packed)))
            .finish()
    }
}

impl Display for PackedPostings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let it = self.packed.iter().flat_map(|packed| {
            let group = get_group(*packed);
            let values = get_values(*packed);
            (0..16u32)
                .filter(move |i| (values >> i) & 1 == 1)
                .map(move |i| make_doc_id(group, i))
        });
        f.debug_list().entries(it).finish()
    }
}
