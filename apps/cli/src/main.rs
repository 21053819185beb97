//! cardsmith: build Anki-importable study decks from loosely structured
//! notes, transcripts, and source listings.
//!
//! Each input file runs the classification pipeline independently and is
//! tagged with its file stem; the merge engine then combines the per-file
//! card sequences in argument order.

mod export;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardsmith_core::{
    merge, run_pipeline, Arbiter, Card, ClassifierRegistry, MergeOptions, PipelineOptions,
    PipelineReport, SortOrder,
};
use export::{write_deck, ExportOptions};

#[derive(Parser, Debug)]
#[command(
    name = "cardsmith",
    version,
    about = "Generate a deduplicated, prioritized study deck from loosely structured text"
)]
struct Cli {
    /// Input files ("-" reads stdin)
    #[arg(value_name = "FILE", default_value = "-")]
    inputs: Vec<PathBuf>,

    /// Output deck file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Analyze content without generating a deck
    #[arg(long)]
    analyze: bool,

    /// Print deck statistics after merging
    #[arg(long)]
    stats: bool,

    /// Drop cards whose fingerprint was already seen
    #[arg(long)]
    dedupe: bool,

    /// Extra tags added to every card
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Only keep cards carrying at least one of these tags
    #[arg(long, value_delimiter = ',')]
    filter_tags: Vec<String>,

    /// Move cards carrying these tags to the front of the deck
    #[arg(long, value_delimiter = ',')]
    priority_tags: Vec<String>,

    /// Secondary card ordering, applied within priority tiers
    #[arg(long, value_enum, default_value = "none")]
    sort: SortArg,

    /// Seed for --sort random (defaults to 0 for reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Keep at most this many cards
    #[arg(long)]
    max_cards: Option<usize>,

    /// Classification confidence threshold
    #[arg(long, default_value_t = Arbiter::DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f64,

    /// Deck name written into the output header
    #[arg(long)]
    deck_name: Option<String>,

    /// Skip the header rows in the output
    #[arg(long)]
    no_header: bool,

    /// Disable HTML escaping in card fields
    #[arg(long)]
    no_escape: bool,

    /// Disable $...$ to \(...\) LaTeX conversion
    #[arg(long)]
    no_latex: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    None,
    Random,
    Length,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => SortOrder::None,
            SortArg::Random => SortOrder::Random,
            SortArg::Length => SortOrder::Length,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = ClassifierRegistry::with_builtins();

    let mut reports: Vec<(String, PipelineReport)> = Vec::new();
    for input in &cli.inputs {
        let (label, text) = read_input(input)?;
        let mut source_tags: BTreeSet<String> = cli.tags.iter().cloned().collect();
        source_tags.insert(label.clone());

        let options = PipelineOptions {
            min_confidence: cli.min_confidence,
            source_tags,
        };
        let report = run_pipeline(&text, &registry, &options)
            .with_context(|| format!("failed to process '{}'", label))?;
        tracing::info!(
            source = %label,
            blocks = report.blocks_total,
            unclassified = report.unclassified,
            cards = report.cards.len(),
            "classified source"
        );
        reports.push((label, report));
    }

    if cli.analyze {
        print_analysis(&reports)?;
        return Ok(());
    }

    let processed: usize = reports.iter().map(|(_, r)| r.cards.len()).sum();
    let sequences: Vec<Vec<Card>> = reports.into_iter().map(|(_, r)| r.cards).collect();

    let merge_options = MergeOptions {
        dedupe: cli.dedupe,
        filter_tags: none_if_empty(&cli.filter_tags),
        priority_tags: none_if_empty(&cli.priority_tags),
        sort: cli.sort.into(),
        random_seed: cli.seed,
        max_cards: cli.max_cards,
    };
    let deck = merge(sequences, &merge_options)?;

    if processed > deck.len() {
        tracing::info!(
            dropped = processed - deck.len(),
            "dropped cards during merge (duplicates, filters, cap)"
        );
    }
    if cli.stats {
        print_stats(&deck, processed)?;
    }

    let export_options = ExportOptions {
        deck_name: cli.deck_name.clone(),
        include_header: !cli.no_header,
        escape_html: !cli.no_escape,
        convert_latex: !cli.no_latex,
    };
    match &cli.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_deck(file, &deck, &export_options)?;
            tracing::info!(cards = deck.len(), path = %path.display(), "wrote deck");
        }
        None => {
            let stdout = io::stdout();
            write_deck(stdout.lock(), &deck, &export_options)?;
        }
    }
    tracing::info!(
        created = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "deck created"
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Read one input, returning its tag label and contents.
fn read_input(path: &PathBuf) -> Result<(String, String)> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(("stdin".to_string(), text));
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let label = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input")
        .to_string();
    Ok((label, text))
}

fn none_if_empty(tags: &[String]) -> Option<BTreeSet<String>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.iter().cloned().collect())
    }
}

/// `--analyze`: per-source classification summary, no deck.
fn print_analysis(reports: &[(String, PipelineReport)]) -> Result<()> {
    let summary: Vec<_> = reports
        .iter()
        .map(|(label, report)| {
            let by_pattern: BTreeMap<&str, usize> = report
                .blocks_by_pattern
                .iter()
                .map(|(pattern, count)| (pattern.as_str(), *count))
                .collect();
            json!({
                "source": label,
                "blocks_total": report.blocks_total,
                "unclassified": report.unclassified,
                "blocks_by_pattern": by_pattern,
                "cards": report.cards.len(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// `--stats`: deck composition summary on stderr, keeping stdout for the deck.
fn print_stats(deck: &cardsmith_core::Deck, processed: usize) -> Result<()> {
    let mut card_types: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unique_tags: BTreeSet<&str> = BTreeSet::new();
    for card in deck.cards() {
        *card_types.entry(card.card_type.as_str()).or_insert(0) += 1;
        unique_tags.extend(card.tags.iter().map(String::as_str));
    }
    let stats = json!({
        "total_cards": deck.len(),
        "cards_processed": processed,
        "cards_dropped": processed - deck.len(),
        "card_types": card_types,
        "unique_tags": unique_tags,
    });
    eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
