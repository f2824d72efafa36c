use std::{path::PathBuf, process::ExitCode};

use boolscan::{
    BuildError, Corpus, Engine, EquivalenceError, Granularity, Indexer, Postings, Shape, Terms,
};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use thiserror::Error;

#[derive(Parser, Debug)]
struct CommandArgs {
    #[command(subcommand)]
    ty: Ty,
}

#[derive(Subcommand, Debug)]
enum Ty {
    /// Count the matches of one query shape.
    Count(Count),
    /// Check that every engine agrees on every shape and every term.
    Check(Check),
    /// Time repeated drains of every shape with every engine.
    Bench(Bench),
}

#[derive(Args, Debug)]
struct CorpusArgs {
    /// File or directory holding the corpus.
    corpus: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Granularity::Line)]
    granularity: Granularity,

    #[arg(short, long)]
    recursive: bool,

    /// Drop tokens longer than this many bytes.
    #[arg(long)]
    max_token_len: Option<usize>,
}

#[derive(Args, Debug)]
struct TermArgs {
    #[arg(default_value = "lorem")]
    x: String,
    #[arg(default_value = "corpora")]
    y: String,
    #[arg(default_value = "qui")]
    z: String,
}

#[derive(Args, Debug)]
struct Count {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    terms: TermArgs,

    #[arg(short, long, value_enum, default_value_t = Shape::AndTwo)]
    shape: Shape,

    /// Engine to evaluate with, all of them when absent.
    #[arg(short, long, value_enum)]
    engine: Option<Engine>,
}

#[derive(Args, Debug)]
struct Check {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    terms: TermArgs,
}

#[derive(Args, Debug)]
struct Bench {
    #[command(flatten)]
    corpus: CorpusArgs,

    runs: u32,

    #[command(flatten)]
    terms: TermArgs,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Equivalence(#[from] EquivalenceError),
}

impl CorpusArgs {
    fn load(&self) -> Result<Corpus, BuildError> {
        let indexer = Indexer::new(self.granularity, self.recursive, self.max_token_len);
        let b = std::time::Instant::now();
        let corpus = Corpus::build(&indexer, &self.corpus)?;
        info!(
            "indexed {:?} ({} documents) into every engine in {:?}",
            self.corpus,
            corpus.num_docs(),
            b.elapsed()
        );
        Ok(corpus)
    }
}

impl TermArgs {
    fn terms(&self) -> Terms<'_> {
        Terms {
            x: &self.x,
            y: &self.y,
            z: &self.z,
        }
    }
}

fn count(args: Count) -> Result<(), CliError> {
    let corpus = args.corpus.load()?;
    let terms = args.terms.terms();

    match args.engine {
        Some(engine) => {
            let count = corpus.count(engine, args.shape, &terms);
            println!("{engine}: {} {count}", args.shape);
        }
        None => {
            let count = corpus.check(args.shape, &terms)?;
            println!("{}: {count}", args.shape);
        }
    }

    Ok(())
}

fn check(args: Check) -> Result<(), CliError> {
    let corpus = args.corpus.load()?;
    let terms = args.terms.terms();

    println!("terms: {}", corpus.check_vocabulary()?);
    for (shape, count) in corpus.check_battery(&terms)? {
        println!("{shape}: {count}");
    }
    for (name, len) in [
        ("x", corpus.sorted().postings(terms.x).len()),
        ("y", corpus.sorted().postings(terms.y).len()),
        ("z", corpus.sorted().postings(terms.z).len()),
    ] {
        println!("{name}: {len} postings");
    }

    Ok(())
}

fn bench(args: Bench) -> Result<(), CliError> {
    let corpus = args.corpus.load()?;
    let terms = args.terms.terms();

    for shape in Shape::ALL {
        // no point timing engines that disagree
        corpus.check(shape, &terms)?;
        for engine in Engine::ALL {
            let t = corpus.throughput(engine, shape, &terms, args.runs);
            println!("{shape}/{engine} took {t}");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("boolscan=info")),
        )
        .init();

    let args = CommandArgs::parse();

    let r = match args.ty {
        Ty::Count(arg) => count(arg),
        Ty::Check(arg) => check(arg),
        Ty::Bench(arg) => bench(arg),
    };

    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
