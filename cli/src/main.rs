use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sift_core::{Config, ScoredDocument, SearchEngine, TermStatistics};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Disk-backed boolean and TF-IDF search over a text corpus", long_about = None)]
struct Cli {
    /// Configuration directory holding dataset_txt/, resources/lemmas.txt,
    /// and the index files
    #[arg(default_value = ".")]
    config_dir: PathBuf,

    /// Corpus directory (overrides the config-dir layout)
    #[arg(long, requires = "dict", requires = "index_dir")]
    data_dir: Option<PathBuf>,

    /// Lemma dictionary file
    #[arg(long, requires = "data_dir")]
    dict: Option<PathBuf>,

    /// Directory for the index and metadata files
    #[arg(long, requires = "data_dir")]
    index_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = match (cli.data_dir, cli.dict, cli.index_dir) {
        (Some(data_dir), Some(dict), Some(index_dir)) => {
            Config::from_parts(data_dir, dict, index_dir)
        }
        _ => Config::from_config_dir(&cli.config_dir),
    };

    let mut engine = SearchEngine::new(config);
    engine
        .initialize()
        .context("failed to initialize search engine")?;
    println!("Dictionary loaded: {} lemmas", engine.lemma_count());

    run_menu(&mut engine)
}

fn run_menu(engine: &mut SearchEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("=== SIFT ===");
        println!("1. Rebuild index");
        println!("2. Boolean search");
        println!("3. TF-IDF search");
        println!("4. Exit");
        print!("Choice: ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };

        match line.trim() {
            "1" => rebuild(engine),
            "2" => {
                if ensure_index(engine) {
                    boolean_mode(engine, &mut lines)?;
                }
            }
            "3" => {
                if ensure_index(engine) {
                    tfidf_mode(engine, &mut lines)?;
                }
            }
            "4" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }

    Ok(())
}

/// Queries need an index; try the persisted one before asking for a rebuild.
fn ensure_index(engine: &mut SearchEngine) -> bool {
    if engine.term_count() > 0 {
        return true;
    }
    if engine.load_index().is_err() {
        println!("No index found. Please rebuild (option 1).");
        return false;
    }
    true
}

fn rebuild(engine: &mut SearchEngine) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("indexing corpus...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = engine.index_documents();
    spinner.finish_and_clear();

    if let Err(err) = result {
        eprintln!("Indexing failed: {err}");
        return;
    }

    println!(
        "Indexed {} documents, {} unique terms.",
        engine.total_docs(),
        engine.term_count()
    );

    match engine.save_index() {
        Ok(()) => println!("Index saved."),
        Err(err) => eprintln!("Cannot save index: {err}"),
    }

    display_zipf(&engine.term_statistics(), engine.config().zipf_top_terms);
}

fn boolean_mode(
    engine: &SearchEngine,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    println!();
    println!("=== BOOLEAN SEARCH ===");
    println!("Syntax: +required -excluded optional");
    println!("Type 'exit' to return to main menu");

    loop {
        print!("Bool Query: ");
        io::stdout().flush()?;

        let Some(query) = lines.next().transpose()? else {
            break;
        };
        if query.trim() == "exit" {
            break;
        }

        let results = engine.boolean_search(&query);
        if results.is_empty() {
            println!("Results: No documents match.");
        } else {
            println!("Results: {} document(s) found", results.len());
            for doc_id in results {
                println!("  {}", engine.document_label(doc_id));
            }
        }
        println!();
    }

    Ok(())
}

fn tfidf_mode(
    engine: &SearchEngine,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    println!();
    println!("=== TF-IDF SEARCH ===");
    println!("Type 'exit' to return to main menu");

    loop {
        print!("TF-IDF Query: ");
        io::stdout().flush()?;

        let Some(query) = lines.next().transpose()? else {
            break;
        };
        if query.trim() == "exit" {
            break;
        }

        let results = engine.tfidf_search(&query);
        if results.is_empty() {
            println!("No matching documents found.");
        } else {
            display_ranked(engine, &results);
        }
        println!();
    }

    Ok(())
}

fn display_ranked(engine: &SearchEngine, results: &[ScoredDocument]) {
    let limit = results.len().min(engine.config().top_k_results);
    println!("Top {limit} results:");
    for (rank, result) in results.iter().take(limit).enumerate() {
        println!(
            "{}. {} | Score: {:.6}",
            rank + 1,
            engine.document_label(result.doc_id),
            result.score
        );
    }
}

fn display_zipf(stats: &[TermStatistics], top_terms: usize) {
    println!();
    println!("=== ZIPF'S LAW ANALYSIS ===");
    println!("{:<20}{:<15}{:<10}F x R", "Term", "Frequency", "Rank");
    println!("{}", "-".repeat(55));

    for (i, stat) in stats.iter().take(top_terms).enumerate() {
        let rank = (i + 1) as u64;
        println!(
            "{:<20}{:<15}{:<10}{}",
            stat.term,
            stat.total_frequency,
            rank,
            stat.total_frequency * rank
        );
    }

    println!();
    println!("Zipf's law suggests F x R should be approximately constant.");
}
