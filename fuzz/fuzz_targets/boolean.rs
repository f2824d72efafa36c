#![no_main]

use boolscan::{Corpus, Engine, Indexer, Shape, Terms};
use libfuzzer_sys::fuzz_target;

const WORDS: [&str; 4] = ["lorem", "corpora", "qui", "nemo"];

// Every byte is a document, its low bits pick the words it contains.
fuzz_target!(|data: &[u8]| {
    let docs: Vec<String> = data
        .iter()
        .map(|b| {
            let mut doc = String::from("x");
            for (i, word) in WORDS.iter().enumerate() {
                if b & (1 << i) != 0 {
                    doc.push(' ');
                    doc.push_str(word);
                }
            }
            doc
        })
        .collect();
    let Ok(corpus) = Corpus::from_documents(&Indexer::default(), &docs) else {
        return;
    };

    let terms = Terms::default();
    corpus.check_vocabulary().unwrap();
    for shape in Shape::ALL {
        corpus.check(shape, &terms).unwrap();

        let got = corpus.evaluate(Engine::Sorted, shape, &terms);
        assert!(got.windows(2).all(|w| w[0] < w[1]));
        assert!(got.iter().all(|&d| (d as usize) < docs.len()));
    }
});
