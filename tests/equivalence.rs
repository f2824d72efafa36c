use std::{fs, path::Path};

use boolscan::{
    BuildError, Corpus, Engine, Granularity, Index, Indexer, Postings, Shape, SortedPostings,
    Terms, and, and_not, or,
};

fn list() -> Corpus {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/list.txt");
    Corpus::build(&Indexer::default(), &path).unwrap()
}

#[test]
fn scenario() {
    let corpus = list();
    assert_eq!(corpus.num_docs(), 13);

    let expected = [
        (Shape::AndTwo, vec![1, 2, 7]),
        (Shape::And, vec![1, 7]),
        (Shape::Or, vec![0, 1, 2, 3, 5, 6, 7, 9]),
        (Shape::AndNot, vec![3, 6]),
        (Shape::Complex, vec![0, 1, 7]),
    ];
    let terms = Terms::default();
    for (shape, doc_ids) in expected {
        for engine in Engine::ALL {
            assert_eq!(corpus.evaluate(engine, shape, &terms), doc_ids, "{engine} {shape}");
        }
    }
}

#[test]
fn hand_built_queries() {
    let corpus = list();
    let index = corpus.packed();

    let q = and_not([index.term("qui"), or([index.term("corpora"), index.term("lorem")])]);
    assert_eq!(q.hits().collect::<Vec<_>>(), [3, 6]);

    let q = and([index.term("Lorem"), index.term("  CORPORA ")]);
    assert_eq!(q.count(), 3);
    assert_eq!(q.sum(), 10);

    let q = or([index.term("dolor"), index.term("missing")]);
    assert_eq!(q.hits().collect::<Vec<_>>(), [0, 4]);
}

#[test]
fn word_boundaries() {
    let corpus = list();
    let index = corpus.sorted();
    assert_eq!(index.postings("don't").as_slice(), [10]);
    assert_eq!(index.postings("isn't").as_slice(), [10]);
    assert_eq!(index.postings("v3.14").as_slice(), [10]);
    assert_eq!(index.postings("don").as_slice(), [11]);
    assert_eq!(index.postings("14").as_slice(), [11]);
    assert_eq!(
        index
            .postings("pneumonoultramicroscopicsilicovolcanoconiosis")
            .as_slice(),
        [12]
    );
    assert!(index.get("v3").is_none());
}

#[test]
fn battery_and_vocabulary() {
    let corpus = list();
    let counts = corpus.check_battery(&Terms::default()).unwrap();
    assert_eq!(counts.len(), Shape::ALL.len());
    assert!(counts.contains(&(Shape::Term, 5)));
    assert!(counts.contains(&(Shape::AndNotOne, 5)));

    let num_terms = corpus.check_vocabulary().unwrap();
    assert_eq!(num_terms, corpus.sorted().num_terms());
}

#[test]
fn other_terms() {
    let corpus = list();
    let terms = Terms {
        x: "enim",
        y: "ut",
        z: "dolor",
    };
    for (shape, count) in corpus.check_battery(&terms).unwrap() {
        match shape {
            Shape::AndTwo => assert_eq!(count, 1),
            Shape::Or => assert_eq!(count, 5),
            Shape::AndNot => assert_eq!(count, 2),
            _ => {}
        }
    }
}

#[test]
fn directory_corpus() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "lorem qui\n\ncorpora\n").unwrap();
    fs::write(dir.path().join("c.txt"), "").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/b.txt"), "Lorem corpora").unwrap();

    let flat: Index<SortedPostings> = Indexer::default().build(dir.path()).unwrap();
    assert_eq!(flat.num_docs(), 2);
    assert_eq!(flat.postings("lorem").as_slice(), [0]);

    let lines: Index<SortedPostings> = Indexer::new(Granularity::Line, true, None)
        .build(dir.path())
        .unwrap();
    assert_eq!(lines.num_docs(), 3);
    assert_eq!(lines.postings("lorem").as_slice(), [0, 2]);
    assert_eq!(lines.postings("corpora").as_slice(), [1, 2]);

    let indexer = Indexer::new(Granularity::File, true, None);
    let files: Index<SortedPostings> = indexer.build(dir.path()).unwrap();
    assert_eq!(files.num_docs(), 2);
    assert_eq!(files.postings("lorem").as_slice(), [0, 1]);
    assert_eq!(files.postings("qui").as_slice(), [0]);

    let corpus = Corpus::build(&indexer, dir.path()).unwrap();
    assert_eq!(corpus.check(Shape::And, &Terms::default()).unwrap(), 1);
    assert_eq!(corpus.roaring().postings("corpora").to_vec(), [0, 1]);
}

#[test]
fn missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::build(&Indexer::default(), &dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));
}

#[test]
fn invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    fs::write(&path, [b'o', b'k', 0xff, 0xfe]).unwrap();
    let err = Corpus::build(&Indexer::default(), &path).unwrap_err();
    assert!(matches!(err, BuildError::Utf8 { .. }));
}

#[test]
fn empty_corpus() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    fs::write(dir.path().join("blank.txt"), "\n   \n\t\n").unwrap();

    let err = Corpus::build(&Indexer::default(), dir.path()).unwrap_err();
    assert!(matches!(err, BuildError::EmptyCorpus(_)));
    assert!(err.to_string().contains(&*dir.path().to_string_lossy()));

    let err = Indexer::new(Granularity::File, false, None)
        .build::<SortedPostings>(dir.path())
        .unwrap_err();
    assert!(matches!(err, BuildError::EmptyCorpus(_)));
}
