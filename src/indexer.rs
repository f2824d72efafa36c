use std::{
    fs::File,
    path::{Path, PathBuf},
};

use fxhash::FxHashMap;
use log::{debug, info, warn};
use memmap2::Mmap;

use crate::{
    DocId, TERMINATED,
    error::BuildError,
    index::Index,
    postings::Postings,
    utils::{normalize, tokenize},
};

/// How a corpus is cut into documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Granularity {
    /// Every non blank line is a document.
    #[default]
    Line,
    /// Every non empty file is a document.
    File,
}

// Term -> doc ids while the corpus is being ingested.
#[derive(Debug, Default)]
struct Batch {
    next_doc_id: DocId,
    term_to_doc_ids: FxHashMap<Box<str>, Vec<DocId>>,
}

impl Batch {
    fn push(&mut self, content: &str, max_token_len: Option<usize>) -> Result<(), BuildError> {
        if self.next_doc_id == TERMINATED {
            return Err(BuildError::TooManyDocuments);
        }
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;

        let content = normalize(content);
        for token in tokenize(&content) {
            if max_token_len.is_some_and(|max| token.len() > max) {
                continue;
            }

            match self.term_to_doc_ids.get_mut(token) {
                Some(doc_ids) => {
                    // a term repeated inside the same document
                    if doc_ids.last() != Some(&doc_id) {
                        doc_ids.push(doc_id);
                    }
                }
                None => {
                    self.term_to_doc_ids.insert(token.into(), vec![doc_id]);
                }
            }
        }

        Ok(())
    }

    fn seal<P: Postings>(self) -> Index<P> {
        let b = std::time::Instant::now();
        let terms: FxHashMap<_, _> = self
            .term_to_doc_ids
            .into_iter()
            .map(|(term, doc_ids)| {
                let postings = P::from_sorted(&doc_ids);
                (term, postings)
            })
            .collect();
        debug!(
            "sealed {} terms over {} documents in {:?}",
            terms.len(),
            self.next_doc_id,
            b.elapsed()
        );
        Index::new(terms, self.next_doc_id)
    }
}

/// Files of a corpus mapped in memory, in path order.
///
/// Documents handed out by [`Indexer::documents`] borrow from it.
#[derive(Debug)]
pub struct Sources {
    files: Vec<(PathBuf, Mmap)>,
}

impl Sources {
    pub fn num_files(&self) -> usize {
        self.files.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(path, _)| path.as_path())
    }
}

/// Builds an [`Index`] from a corpus in a single pass.
///
/// Document ids are assigned in reading order starting at 0. The build is
/// all or nothing: every source is read before any document is indexed.
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    granularity: Granularity,
    recursive: bool,
    max_token_len: Option<usize>,
}

impl Indexer {
    pub fn new(granularity: Granularity, recursive: bool, max_token_len: Option<usize>) -> Self {
        Self {
            granularity,
            recursive,
            max_token_len,
        }
    }

    /// Reads the corpus at `path` and indexes it.
    pub fn build<P: Postings>(&self, path: &Path) -> Result<Index<P>, BuildError> {
        let sources = self.open(path)?;
        let docs = self.documents(&sources)?;
        if docs.is_empty() {
            return Err(BuildError::EmptyCorpus(path.to_path_buf()));
        }
        self.index(docs)
    }

    /// Indexes in memory records, one document each. Blank records are
    /// skipped and do not consume an id.
    pub fn index<P, S, I>(&self, docs: I) -> Result<Index<P>, BuildError>
    where
        P: Postings,
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let b = std::time::Instant::now();
        let mut batch = Batch::default();
        for doc in docs {
            let doc = doc.as_ref();
            if doc.trim().is_empty() {
                continue;
            }
            batch.push(doc, self.max_token_len)?;
        }

        if batch.next_doc_id == 0 {
            return Err(BuildError::NoDocuments);
        }

        info!(
            "indexed {} documents ({} terms) in {:?}",
            batch.next_doc_id,
            batch.term_to_doc_ids.len(),
            b.elapsed()
        );
        Ok(batch.seal())
    }

    /// Maps the files of the corpus at `path` in memory.
    ///
    /// `path` is either a file or a directory whose files are kept in path
    /// order. Empty files are skipped.
    pub fn open(&self, path: &Path) -> Result<Sources, BuildError> {
        let mut paths = Vec::new();
        self.collect_files(path, &mut paths)?;
        paths.sort_unstable();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::map_file(&path)? {
                Some(mmap) => files.push((path, mmap)),
                None => warn!("skipping empty file {path:?}"),
            }
        }
        Ok(Sources { files })
    }

    /// Cuts mapped files into documents without copying them, so the same
    /// corpus can be indexed into several representations.
    pub fn documents<'s>(&self, sources: &'s Sources) -> Result<Vec<&'s str>, BuildError> {
        let mut docs = Vec::new();
        for (path, mmap) in sources.files.iter() {
            let content = std::str::from_utf8(mmap).map_err(|source| BuildError::Utf8 {
                path: path.clone(),
                source,
            })?;

            match self.granularity {
                Granularity::Line => {
                    let before = docs.len();
                    docs.extend(content.lines().filter(|line| !line.trim().is_empty()));
                    debug!("read {} documents from {path:?}", docs.len() - before);
                }
                Granularity::File => {
                    if !content.trim().is_empty() {
                        docs.push(content);
                    }
                }
            }
        }

        info!(
            "read {} documents from {} files",
            docs.len(),
            sources.num_files()
        );
        Ok(docs)
    }

    /// [`Indexer::open`] followed by [`Indexer::documents`], copying the
    /// documents out.
    pub fn read(&self, path: &Path) -> Result<Vec<String>, BuildError> {
        let sources = self.open(path)?;
        let docs = self.documents(&sources)?;
        Ok(docs.into_iter().map(str::to_owned).collect())
    }

    fn collect_files(&self, path: &Path, files: &mut Vec<PathBuf>) -> Result<(), BuildError> {
        let io = |source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(io)?;
        if metadata.is_file() {
            files.push(path.to_path_buf());
            return Ok(());
        }

        for entry in std::fs::read_dir(path).map_err(io)? {
            let entry = entry.map_err(io)?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(io)?;
            if file_type.is_dir() {
                if self.recursive {
                    self.collect_files(&path, files)?;
                }
            } else {
                files.push(path);
            }
        }

        Ok(())
    }

    fn map_file(path: &Path) -> Result<Option<Mmap>, BuildError> {
        let io = |source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io)?;
        if file.metadata().map_err(io)?.len() == 0 {
            return Ok(None);
        }

        // the corpus must not be truncated while it is mapped
        let mmap = unsafe { Mmap::map(&file) }.map_err(io)?;
        Ok(Some(mmap))
    }
}
