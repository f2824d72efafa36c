use std::path::PathBuf;

use thiserror::Error;

use crate::{DocId, harness::{Engine, Shape}};

/// Possible errors that can occur while building an index.
///
/// Any of them aborts the whole build, no partially filled index is ever
/// handed out.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Io error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File `{}` is not valid utf-8: {source}", .path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Corpus `{}` has no documents", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("No documents to index, every record is blank")]
    NoDocuments,

    #[error("Corpus exceeds the maximum of {} documents", DocId::MAX)]
    TooManyDocuments,
}

/// Disagreement between two postings representations over the same corpus.
#[derive(Error, Debug)]
pub enum EquivalenceError {
    #[error(
        "Shape `{shape}`: `{engine}` produced {got} documents, expected {expected} (first difference at position {position})"
    )]
    Shape {
        shape: Shape,
        engine: Engine,
        expected: u64,
        got: u64,
        position: usize,
    },

    #[error("Term `{term}`: `{engine}` has {got} postings, expected {expected}")]
    Term {
        term: String,
        engine: Engine,
        expected: u64,
        got: u64,
    },
}
