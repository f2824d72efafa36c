use std::iter::FusedIterator;

use crate::{
    DocId, TERMINATED,
    postings::{PostingCursor, Postings},
};

use super::Query;

enum Kind<C> {
    Term(C),
    And,
    Or,
    AndNot,
}

struct Node<C> {
    kind: Kind<C>,
    // children of this node are `links[begin..end]`
    begin: u32,
    end: u32,
    doc: DocId,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
}

/// Single child And, Or and AndNot nodes evaluate to their child.
fn passthrough<'q, 'a, P: Postings>(mut query: &'q Query<'a, P>) -> &'q Query<'a, P> {
    loop {
        match query {
            Query::And(children) | Query::Or(children) | Query::AndNot(children)
                if children.len() == 1 =>
            {
                query = &children[0];
            }
            _ => return query,
        }
    }
}

fn nested<'q, 'a, P: Postings>(query: &'q Query<'a, P>, op: Op) -> Option<&'q [Query<'a, P>]> {
    match (query, op) {
        (Query::And(children), Op::And) | (Query::Or(children), Op::Or)
            if !children.is_empty() =>
        {
            Some(children.as_slice())
        }
        _ => None,
    }
}

// Appends `children` to `flat`, splicing in the children of nested `op`
// nodes at any depth.
fn splice<'q, 'a, P: Postings>(
    children: impl DoubleEndedIterator<Item = &'q Query<'a, P>>,
    op: Op,
    flat: &mut Vec<&'q Query<'a, P>>,
) where
    'a: 'q,
{
    let mut pending: Vec<_> = children.rev().collect();
    while let Some(child) = pending.pop() {
        let child = passthrough(child);
        match nested(child, op) {
            Some(grandchildren) => pending.extend(grandchildren.iter().rev()),
            None => flat.push(child),
        }
    }
}

// Base first, then the excluded lists. A nested AndNot base contributes
// its own exclusions, excluded Or nodes contribute their children.
fn splice_and_not<'q, 'a, P: Postings>(children: &'q [Query<'a, P>]) -> Vec<&'q Query<'a, P>>
where
    'a: 'q,
{
    let Some((base, excluded)) = children.split_first() else {
        return Vec::new();
    };

    let mut base = passthrough(base);
    let mut exclusions: Vec<&'q [Query<'a, P>]> = vec![excluded];
    while let Query::AndNot(inner) = base {
        let Some((inner_base, inner_excluded)) = inner.split_first() else {
            break;
        };
        exclusions.push(inner_excluded);
        base = passthrough(inner_base);
    }

    let mut flat = vec![base];
    splice(exclusions.into_iter().flatten(), Op::Or, &mut flat);
    flat
}

// A node waiting for its children to be compiled.
struct Frame<'q, 'a, P: Postings + 'a> {
    kind: Kind<P::Cursor<'a>>,
    children: Vec<&'q Query<'a, P>>,
    next: usize,
    ids: Vec<u32>,
}

impl<'q, 'a, P: Postings + 'a> Frame<'q, 'a, P> {
    fn new(query: &'q Query<'a, P>) -> Self {
        let (kind, children) = match passthrough(query) {
            Query::Term { postings, .. } => {
                let postings: &'a P = *postings;
                (Kind::Term(postings.cursor()), Vec::new())
            }
            Query::And(children) => {
                let mut flat = Vec::with_capacity(children.len());
                splice(children.iter(), Op::And, &mut flat);
                (Kind::And, flat)
            }
            Query::Or(children) => {
                let mut flat = Vec::with_capacity(children.len());
                splice(children.iter(), Op::Or, &mut flat);
                (Kind::Or, flat)
            }
            Query::AndNot(children) => (Kind::AndNot, splice_and_not(children)),
        };
        Self {
            kind,
            ids: Vec::with_capacity(children.len()),
            children,
            next: 0,
        }
    }
}

/// Pull based evaluation of a [`Query`].
///
/// The tree is flattened once into an arena of cursors, one per node,
/// indexed by node id, children always having smaller ids than their
/// parent. Nested nodes of the same operator are merged and single child
/// nodes are replaced by their child, so `and([and([a, b]), c])` costs the
/// same as `and([a, b, c])` and the arena only gets deeper where operators
/// alternate. Every node is kept positioned on its current match, so
/// [`Hits::has_next`] is a peek and [`Hits::next_doc`] consumes. Stepping
/// never allocates.
///
/// A `Hits` is private traversal state: build one per query evaluation
/// (and per thread), the underlying postings are only read.
pub struct Hits<'a, P: Postings + 'a> {
    nodes: Vec<Node<P::Cursor<'a>>>,
    links: Vec<u32>,
    root: usize,
}

impl<'a, P: Postings + 'a> Hits<'a, P> {
    pub(crate) fn new(query: &Query<'a, P>) -> Self {
        let mut hits = Self {
            nodes: Vec::with_capacity(query.num_nodes()),
            links: Vec::new(),
            root: 0,
        };
        hits.root = hits.compile(query);
        hits
    }

    // Post order walk with an explicit stack, trees of any depth are fine.
    fn compile(&mut self, query: &Query<'a, P>) -> usize {
        let mut root = 0;
        let mut stack = vec![Frame::new(query)];
        while let Some(mut frame) = stack.pop() {
            if let Some(child) = frame.children.get(frame.next).copied() {
                frame.next += 1;
                stack.push(frame);
                stack.push(Frame::new(child));
                continue;
            }

            let id = self.push_node(frame.kind, &frame.ids);
            match stack.last_mut() {
                Some(parent) => parent.ids.push(id as u32),
                None => root = id,
            }
        }
        root
    }

    fn push_node(&mut self, kind: Kind<P::Cursor<'a>>, ids: &[u32]) -> usize {
        let begin = self.links.len() as u32;
        self.links.extend_from_slice(ids);
        let end = self.links.len() as u32;

        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            begin,
            end,
            doc: TERMINATED,
        });

        // children are already positioned on their first match
        let doc = match &self.nodes[id].kind {
            Kind::Term(cursor) => cursor.doc(),
            Kind::And => match ids.first() {
                Some(lead) => {
                    let candidate = self.nodes[*lead as usize].doc;
                    self.align_and(id, candidate)
                }
                None => TERMINATED,
            },
            Kind::Or => self.min_child(id),
            Kind::AndNot => match ids.first() {
                Some(base) => {
                    let candidate = self.nodes[*base as usize].doc;
                    self.skip_excluded(id, candidate)
                }
                None => TERMINATED,
            },
        };
        self.nodes[id].doc = doc;
        id
    }

    #[inline(always)]
    fn child(&self, id: usize, i: u32) -> usize {
        self.links[(self.nodes[id].begin + i) as usize] as usize
    }

    #[inline(always)]
    fn num_children(&self, id: usize) -> u32 {
        self.nodes[id].end - self.nodes[id].begin
    }

    fn advance(&mut self, id: usize) -> DocId {
        let current = self.nodes[id].doc;
        if current == TERMINATED {
            return TERMINATED;
        }

        let doc = match &mut self.nodes[id].kind {
            Kind::Term(cursor) => cursor.advance(),
            Kind::And => {
                let lead = self.child(id, 0);
                let candidate = self.advance(lead);
                self.align_and(id, candidate)
            }
            Kind::Or => {
                for i in 0..self.num_children(id) {
                    let child = self.child(id, i);
                    if self.nodes[child].doc == current {
                        self.advance(child);
                    }
                }
                self.min_child(id)
            }
            Kind::AndNot => {
                let base = self.child(id, 0);
                let candidate = self.advance(base);
                self.skip_excluded(id, candidate)
            }
        };
        self.nodes[id].doc = doc;
        doc
    }

    fn seek(&mut self, id: usize, target: DocId) -> DocId {
        let current = self.nodes[id].doc;
        if current >= target {
            return current;
        }

        let doc = match &mut self.nodes[id].kind {
            Kind::Term(cursor) => cursor.seek(target),
            Kind::And => {
                let lead = self.child(id, 0);
                let candidate = self.seek(lead, target);
                self.align_and(id, candidate)
            }
            Kind::Or => {
                for i in 0..self.num_children(id) {
                    let child = self.child(id, i);
                    self.seek(child, target);
                }
                self.min_child(id)
            }
            Kind::AndNot => {
                let base = self.child(id, 0);
                let candidate = self.seek(base, target);
                self.skip_excluded(id, candidate)
            }
        };
        self.nodes[id].doc = doc;
        doc
    }

    /// Leapfrogs the children of an And node until all of them agree on
    /// one id, starting from `candidate`.
    fn align_and(&mut self, id: usize, mut candidate: DocId) -> DocId {
        let n = self.num_children(id);
        'outer: while candidate != TERMINATED {
            for i in 0..n {
                let child = self.child(id, i);
                let doc = self.seek(child, candidate);
                if doc > candidate {
                    candidate = doc;
                    continue 'outer;
                }
            }
            return candidate;
        }
        TERMINATED
    }

    /// Moves the base of an AndNot node forward, starting from `candidate`,
    /// until no excluding child contains the id.
    fn skip_excluded(&mut self, id: usize, mut candidate: DocId) -> DocId {
        let n = self.num_children(id);
        let base = self.child(id, 0);
        'outer: while candidate != TERMINATED {
            for i in 1..n {
                let child = self.child(id, i);
                if self.seek(child, candidate) == candidate {
                    candidate = self.advance(base);
                    continue 'outer;
                }
            }
            return candidate;
        }
        TERMINATED
    }

    fn min_child(&self, id: usize) -> DocId {
        (0..self.num_children(id))
            .map(|i| self.nodes[self.child(id, i)].doc)
            .min()
            .unwrap_or(TERMINATED)
    }

    /// Whether another id is available, without consuming it.
    #[inline(always)]
    pub fn has_next(&self) -> bool {
        self.doc() != TERMINATED
    }

    /// The id the next call to [`Hits::next_doc`] returns, or
    /// [`TERMINATED`].
    #[inline(always)]
    pub fn doc(&self) -> DocId {
        self.nodes[self.root].doc
    }

    /// Consumes and returns the next matching id.
    #[inline(always)]
    pub fn next_doc(&mut self) -> Option<DocId> {
        let doc = self.doc();
        if doc == TERMINATED {
            return None;
        }
        self.advance(self.root);
        Some(doc)
    }
}

impl<'a, P: Postings + 'a> Iterator for Hits<'a, P> {
    type Item = DocId;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_doc()
    }
}

impl<'a, P: Postings + 'a> FusedIterator for Hits<'a, P> {}
