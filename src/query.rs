use std::fmt::Debug;

use crate::postings::Postings;

mod hits;

pub use hits::Hits;

/// Boolean query tree over posting lists borrowed from an index.
///
/// Building a tree does no work; evaluation starts with [`Query::hits`].
pub enum Query<'a, P: Postings> {
    /// Leaf. `field` is carried for callers that think in fields, evaluation
    /// ignores it.
    Term { field: &'a str, postings: &'a P },

    /// Documents present in every child. No children matches nothing.
    And(Vec<Query<'a, P>>),

    /// Documents present in at least one child. No children matches nothing.
    Or(Vec<Query<'a, P>>),

    /// Documents of the first child that no other child has. No children
    /// matches nothing, a single child is passed through.
    AndNot(Vec<Query<'a, P>>),
}

pub fn term<'a, P: Postings>(field: &'a str, postings: &'a P) -> Query<'a, P> {
    Query::Term { field, postings }
}

pub fn and<'a, P: Postings>(children: impl IntoIterator<Item = Query<'a, P>>) -> Query<'a, P> {
    Query::And(children.into_iter().collect())
}

pub fn or<'a, P: Postings>(children: impl IntoIterator<Item = Query<'a, P>>) -> Query<'a, P> {
    Query::Or(children.into_iter().collect())
}

pub fn and_not<'a, P: Postings>(
    children: impl IntoIterator<Item = Query<'a, P>>,
) -> Query<'a, P> {
    Query::AndNot(children.into_iter().collect())
}

impl<'a, P: Postings + 'a> Query<'a, P> {
    /// Lazy iterator over the matching ids, in increasing order.
    pub fn hits(&self) -> Hits<'a, P> {
        Hits::new(self)
    }

    /// Drains a fresh iterator and returns how many ids it produced.
    pub fn count(&self) -> u64 {
        let mut hits = self.hits();
        let mut count = 0;
        while hits.next_doc().is_some() {
            count += 1;
        }
        count
    }

    /// Drains a fresh iterator summing the ids, the usual benchmark loop.
    pub fn sum(&self) -> u64 {
        let mut hits = self.hits();
        let mut sum = 0;
        while let Some(doc_id) = hits.next_doc() {
            sum += doc_id as u64;
        }
        sum
    }

    /// Number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        let mut num_nodes = 0;
        let mut pending = vec![self];
        while let Some(query) = pending.pop() {
            num_nodes += 1;
            if let Query::And(children) | Query::Or(children) | Query::AndNot(children) = query {
                pending.extend(children);
            }
        }
        num_nodes
    }
}

// Iterative, left folds build trees of any depth.
impl<P: Postings> Drop for Query<'_, P> {
    fn drop(&mut self) {
        let mut pending = match self {
            Query::Term { .. } => return,
            Query::And(children) | Query::Or(children) | Query::AndNot(children) => {
                std::mem::take(children)
            }
        };
        while let Some(mut query) = pending.pop() {
            if let Query::And(children) | Query::Or(children) | Query::AndNot(children) =
                &mut query
            {
                pending.append(children);
            }
        }
    }
}

impl<P: Postings> Debug for Query<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Term { field, postings } => {
                write!(f, "Term({field:?}, {} docs)", postings.len())
            }
            Query::And(children) => f.debug_tuple("And").field(children).finish(),
            Query::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Query::AndNot(children) => f.debug_tuple("AndNot").field(children).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocId, PackedPostings, RoaringPostings, SortedPostings};

    fn scenario<P: Postings>() {
        let lorem = P::from_sorted(&[0, 1, 2, 5, 7]);
        let corpora = P::from_sorted(&[1, 2, 7, 9]);

        let q = and([term("", &lorem), term("", &corpora)]);
        assert_eq!(q.hits().collect::<Vec<_>>(), [1, 2, 7]);
        assert_eq!(q.count(), 3);
        assert_eq!(q.sum(), 10);

        let q = or([term("", &lorem), term("", &corpora)]);
        assert_eq!(q.hits().collect::<Vec<_>>(), [0, 1, 2, 5, 7, 9]);
        assert_eq!(q.count(), 6);

        let q = and_not([term("", &lorem), term("", &corpora)]);
        assert_eq!(q.hits().collect::<Vec<_>>(), [0, 5]);
        assert_eq!(q.count(), 2);
    }

    #[test]
    fn scenario_sorted() {
        scenario::<SortedPostings>();
    }

    #[test]
    fn scenario_roaring() {
        scenario::<RoaringPostings>();
    }

    #[test]
    fn scenario_packed() {
        scenario::<PackedPostings>();
    }

    #[test]
    fn degenerate() {
        let a = SortedPostings::from_sorted(&[1, 4, 9]);
        let expected: &[DocId] = &[1, 4, 9];

        assert_eq!(term("body", &a).hits().collect::<Vec<_>>(), expected);
        assert_eq!(and([term("", &a)]).hits().collect::<Vec<_>>(), expected);
        assert_eq!(or([term("", &a)]).hits().collect::<Vec<_>>(), expected);
        assert_eq!(and_not([term("", &a)]).hits().collect::<Vec<_>>(), expected);
        assert_eq!(or([term("", &a), term("", &a)]).hits().collect::<Vec<_>>(), expected);
        assert_eq!(and([term("", &a), term("", &a)]).hits().collect::<Vec<_>>(), expected);
        assert_eq!(and_not([term("", &a), term("", &a)]).count(), 0);

        let none: [Query<'_, SortedPostings>; 0] = [];
        assert_eq!(and(none).count(), 0);
        let none: [Query<'_, SortedPostings>; 0] = [];
        assert_eq!(or(none).count(), 0);
        let none: [Query<'_, SortedPostings>; 0] = [];
        assert_eq!(and_not(none).count(), 0);
    }

    #[test]
    fn nested() {
        let x = SortedPostings::from_sorted(&[0, 1, 2, 5, 7]);
        let y = SortedPostings::from_sorted(&[1, 2, 7, 9]);
        let z = SortedPostings::from_sorted(&[0, 1, 3, 6, 7]);

        let q = and([
            term("", &z),
            or([and([term("", &y), term("", &x)]), term("", &y), term("", &x)]),
        ]);
        assert_eq!(q.num_nodes(), 8);
        assert_eq!(q.hits().collect::<Vec<_>>(), [0, 1, 7]);

        let q = and_not([term("", &z), term("", &y), term("", &x)]);
        assert_eq!(q.hits().collect::<Vec<_>>(), [3, 6]);

        let q = and_not([or([term("", &x), term("", &z)]), and([term("", &y), term("", &z)])]);
        assert_eq!(q.hits().collect::<Vec<_>>(), [0, 2, 3, 5, 6]);

        let q = or([
            and_not([term("", &x), term("", &y)]),
            and_not([term("", &y), term("", &x)]),
        ]);
        assert_eq!(q.hits().collect::<Vec<_>>(), [0, 5, 9]);
    }

    #[test]
    fn debug() {
        let a = SortedPostings::from_sorted(&[1, 4, 9]);
        let q = and_not([term("body", &a), or([term("", &a)])]);
        assert_eq!(
            format!("{q:?}"),
            r#"AndNot([Term("body", 3 docs), Or([Term("", 3 docs)])])"#
        );
    }
}
