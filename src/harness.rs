use std::{
    fmt::Display,
    path::Path,
    time::{Duration, Instant},
};

use log::{debug, info};

use crate::{
    DocId,
    error::{BuildError, EquivalenceError},
    index::Index,
    indexer::Indexer,
    postings::{PackedPostings, Postings, RoaringPostings, SortedPostings},
    query::{Query, and, and_not, or},
};

/// Postings representations compared by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Engine {
    Sorted,
    Roaring,
    Packed,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::Sorted, Engine::Roaring, Engine::Packed];
}

impl Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Engine::Sorted => "sorted",
            Engine::Roaring => "roaring",
            Engine::Packed => "packed",
        };
        f.write_str(name)
    }
}

/// The three terms the battery of shapes is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terms<'t> {
    pub x: &'t str,
    pub y: &'t str,
    pub z: &'t str,
}

impl Default for Terms<'static> {
    fn default() -> Self {
        Self {
            x: "lorem",
            y: "corpora",
            z: "qui",
        }
    }
}

/// Fixed query shapes, every one of them evaluated by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Shape {
    /// `x`
    Term,
    /// `And(x)`
    AndOne,
    /// `And(x, y)`
    AndTwo,
    /// `And(x, y, z)`
    And,
    /// `Or(x, y, z)`
    Or,
    /// `AndNot(z, y, x)`: `z` without `y` or `x`
    AndNot,
    /// `AndNot(x)`
    AndNotOne,
    /// `And(z, Or(And(y, x), y, x))`
    Complex,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Term,
        Shape::AndOne,
        Shape::AndTwo,
        Shape::And,
        Shape::Or,
        Shape::AndNot,
        Shape::AndNotOne,
        Shape::Complex,
    ];

    pub fn build<'a, P: Postings>(self, index: &'a Index<P>, terms: &Terms) -> Query<'a, P> {
        let x = || index.term(terms.x);
        let y = || index.term(terms.y);
        let z = || index.term(terms.z);
        match self {
            Shape::Term => x(),
            Shape::AndOne => and([x()]),
            Shape::AndTwo => and([x(), y()]),
            Shape::And => and([x(), y(), z()]),
            Shape::Or => or([x(), y(), z()]),
            Shape::AndNot => and_not([z(), y(), x()]),
            Shape::AndNotOne => and_not([x()]),
            Shape::Complex => and([z(), or([and([y(), x()]), y(), x()])]),
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Shape::Term => "term",
            Shape::AndOne => "and-one",
            Shape::AndTwo => "and-two",
            Shape::And => "and",
            Shape::Or => "or",
            Shape::AndNot => "and-not",
            Shape::AndNotOne => "and-not-one",
            Shape::Complex => "complex",
        };
        f.write_str(name)
    }
}

/// Result of repeatedly draining one query.
#[derive(Debug, Clone, Copy)]
pub struct Throughput {
    pub runs: u32,
    pub elapsed: Duration,
    /// Documents produced by one drain.
    pub count: u64,
    /// Sum of the ids produced by one drain.
    pub sum: u64,
}

impl Throughput {
    pub fn per_run(&self) -> Duration {
        self.elapsed / self.runs.max(1)
    }
}

impl Display for Throughput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ns/iter ({} results, sum {})",
            self.per_run().as_nanos(),
            self.count,
            self.sum
        )
    }
}

/// One corpus indexed through every [`Engine`].
#[derive(Debug)]
pub struct Corpus {
    sorted: Index<SortedPostings>,
    roaring: Index<RoaringPostings>,
    packed: Index<PackedPostings>,
}

impl Corpus {
    pub fn build(indexer: &Indexer, path: &Path) -> Result<Self, BuildError> {
        let sources = indexer.open(path)?;
        let docs = indexer.documents(&sources)?;
        if docs.is_empty() {
            return Err(BuildError::EmptyCorpus(path.to_path_buf()));
        }
        Self::from_documents(indexer, &docs)
    }

    pub fn from_documents<S: AsRef<str>>(indexer: &Indexer, docs: &[S]) -> Result<Self, BuildError> {
        Ok(Self {
            sorted: indexer.index(docs.iter().map(|d| d.as_ref()))?,
            roaring: indexer.index(docs.iter().map(|d| d.as_ref()))?,
            packed: indexer.index(docs.iter().map(|d| d.as_ref()))?,
        })
    }

    pub fn sorted(&self) -> &Index<SortedPostings> {
        &self.sorted
    }

    pub fn roaring(&self) -> &Index<RoaringPostings> {
        &self.roaring
    }

    pub fn packed(&self) -> &Index<PackedPostings> {
        &self.packed
    }

    pub fn num_docs(&self) -> u32 {
        self.sorted.num_docs()
    }

    pub fn evaluate(&self, engine: Engine, shape: Shape, terms: &Terms) -> Vec<DocId> {
        match engine {
            Engine::Sorted => shape.build(&self.sorted, terms).hits().collect(),
            Engine::Roaring => shape.build(&self.roaring, terms).hits().collect(),
            Engine::Packed => shape.build(&self.packed, terms).hits().collect(),
        }
    }

    pub fn count(&self, engine: Engine, shape: Shape, terms: &Terms) -> u64 {
        match engine {
            Engine::Sorted => shape.build(&self.sorted, terms).count(),
            Engine::Roaring => shape.build(&self.roaring, terms).count(),
            Engine::Packed => shape.build(&self.packed, terms).count(),
        }
    }

    /// Evaluates `shape` with every engine and checks they produce the same
    /// ids. Returns the agreed number of matches.
    pub fn check(&self, shape: Shape, terms: &Terms) -> Result<u64, EquivalenceError> {
        let expected = self.evaluate(Engine::Sorted, shape, terms);
        for engine in Engine::ALL.into_iter().skip(1) {
            let got = self.evaluate(engine, shape, terms);
            if got != expected {
                let position = expected
                    .iter()
                    .zip(got.iter())
                    .take_while(|(e, g)| e == g)
                    .count();
                return Err(EquivalenceError::Shape {
                    shape,
                    engine,
                    expected: expected.len() as u64,
                    got: got.len() as u64,
                    position,
                });
            }
        }

        debug!("{shape} over {terms:?}: {} matches", expected.len());
        Ok(expected.len() as u64)
    }

    /// [`Corpus::check`] for every shape.
    pub fn check_battery(&self, terms: &Terms) -> Result<Vec<(Shape, u64)>, EquivalenceError> {
        let counts = Shape::ALL
            .into_iter()
            .map(|shape| Ok((shape, self.check(shape, terms)?)))
            .collect::<Result<Vec<_>, EquivalenceError>>()?;
        info!("{} shapes agree across {} engines", counts.len(), Engine::ALL.len());
        Ok(counts)
    }

    /// Checks that every indexed term has the same postings in every engine.
    pub fn check_vocabulary(&self) -> Result<usize, EquivalenceError> {
        let mut checked = 0;
        for term in self.sorted.terms() {
            let expected = self.sorted.postings(term).to_vec();
            let others = [
                (Engine::Roaring, self.roaring.postings(term).to_vec()),
                (Engine::Packed, self.packed.postings(term).to_vec()),
            ];
            for (engine, got) in others {
                if got != expected {
                    return Err(EquivalenceError::Term {
                        term: term.to_owned(),
                        engine,
                        expected: expected.len() as u64,
                        got: got.len() as u64,
                    });
                }
            }
            checked += 1;
        }

        let extra = [
            (Engine::Roaring, self.roaring.num_terms()),
            (Engine::Packed, self.packed.num_terms()),
        ];
        for (engine, num_terms) in extra {
            if num_terms != checked {
                return Err(EquivalenceError::Term {
                    term: String::from("*"),
                    engine,
                    expected: checked as u64,
                    got: num_terms as u64,
                });
            }
        }

        info!("{checked} terms agree across {} engines", Engine::ALL.len());
        Ok(checked)
    }

    /// Times `runs` full drains of `shape`, building the query every run as
    /// a caller would.
    pub fn throughput(&self, engine: Engine, shape: Shape, terms: &Terms, runs: u32) -> Throughput {
        match engine {
            Engine::Sorted => throughput(&self.sorted, shape, terms, runs),
            Engine::Roaring => throughput(&self.roaring, shape, terms, runs),
            Engine::Packed => throughput(&self.packed, shape, terms, runs),
        }
    }
}

fn throughput<P: Postings>(index: &Index<P>, shape: Shape, terms: &Terms, runs: u32) -> Throughput {
    let q = shape.build(index, terms);
    let count = q.count();
    let sum = q.sum();

    let b = Instant::now();
    let mut check = 0;
    for _ in 0..runs {
        let q = shape.build(index, terms);
        check += std::hint::black_box(q.sum());
    }
    let elapsed = b.elapsed();
    debug_assert_eq!(check, sum * runs as u64);

    Throughput {
        runs,
        elapsed,
        count,
        sum,
    }
}
