mod display;
mod load;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use earnguide_core::Source;
use earnguide_merge::{
    Resolution, conflict_groups, finalize, group_by_key, merge_items_with, preselect_choices,
};
use earnguide_mine::{HeuristicStructurer, SourceDocument, extract_document, filing_date_iso, mine_candidates};
use earnguide_store::{JsonResolutionStore, ResolutionStore};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "earnguide", version, about = "Mine and reconcile forward-looking earnings guidance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print guidance candidates mined from a text document.
    Mine {
        file: PathBuf,
        /// Tag every candidate with this source.
        #[arg(long)]
        source: Option<Source>,
    },
    /// Mine and structure documents offline; print structured documents as JSON.
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        source: Source,
        /// Document URL recorded as provenance. Defaults to the file path.
        #[arg(long)]
        url: Option<String>,
    },
    /// Merge structured guidance and show conflicts.
    Merge {
        /// Items-by-source map or list of structured documents.
        input: PathBuf,
        #[arg(long, env = "EARNGUIDE_POLICY")]
        policy: Option<PathBuf>,
        #[arg(long, value_name = "CSV")]
        csv: Option<PathBuf>,
    },
    /// Record the chosen value for one conflicting key.
    Resolve {
        input: PathBuf,
        #[arg(long)]
        ticker: String,
        /// Resolution key, e.g. "eps|quarter|2024|Q1".
        #[arg(long)]
        key: String,
        /// Index of the chosen option, as shown by `merge`.
        #[arg(long)]
        choice: usize,
        #[arg(long, env = "EARNGUIDE_STORE", default_value = "resolutions.json")]
        store: PathBuf,
        #[arg(long, env = "EARNGUIDE_POLICY")]
        policy: Option<PathBuf>,
    },
    /// Apply stored choices and print one row per canonical key.
    Finalize {
        input: PathBuf,
        #[arg(long)]
        ticker: String,
        #[arg(long, env = "EARNGUIDE_STORE", default_value = "resolutions.json")]
        store: PathBuf,
        #[arg(long, env = "EARNGUIDE_POLICY")]
        policy: Option<PathBuf>,
        #[arg(long, value_name = "CSV")]
        csv: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    info!("earnguide v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Mine { file, source } => cmd_mine(&file, source),
        Command::Extract { files, source, url } => cmd_extract(&files, source, url),
        Command::Merge { input, policy, csv } => cmd_merge(&input, policy, csv),
        Command::Resolve {
            input,
            ticker,
            key,
            choice,
            store,
            policy,
        } => cmd_resolve(&input, &ticker, &key, choice, &store, policy),
        Command::Finalize {
            input,
            ticker,
            store,
            policy,
            csv,
        } => cmd_finalize(&input, &ticker, &store, policy, csv),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_mine(file: &Path, source: Option<Source>) -> anyhow::Result<()> {
    let text = read_text(file)?;
    let candidates: Vec<_> = mine_candidates(&text)
        .map(|mut c| {
            c.source = source;
            c
        })
        .collect();
    info!(count = candidates.len(), "mined candidates");

    let out = json!({
        "filing_date": filing_date_iso(&text),
        "candidates": candidates,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_extract(files: &[PathBuf], source: Source, url: Option<String>) -> anyhow::Result<()> {
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        let doc = SourceDocument {
            source,
            source_url: url.clone().or_else(|| Some(file.display().to_string())),
            text: read_text(file)?,
        };
        let structured = extract_document(&doc, &HeuristicStructurer)
            .with_context(|| format!("failed to structure {}", file.display()))?;
        documents.push(structured);
    }
    println!("{}", serde_json::to_string_pretty(&documents)?);
    Ok(())
}

fn cmd_merge(input: &Path, policy: Option<PathBuf>, csv: Option<PathBuf>) -> anyhow::Result<()> {
    let items = load::load_items(input)?;
    let tolerance = load::load_policy(policy.as_deref())?;
    let merged = merge_items_with(&items, &tolerance);

    display::print_merged_table(&merged)?;
    let groups = group_by_key(&merged);
    let conflicts = display::print_conflict_cards(conflict_groups(&groups))?;
    if conflicts > 0 {
        println!("{conflicts} conflict group(s). Record a choice with `earnguide resolve`.");
    }

    if let Some(path) = csv {
        display::write_csv(&merged, &path)?;
        info!(path = %path.display(), rows = merged.len(), "wrote csv");
    }
    Ok(())
}

fn cmd_resolve(
    input: &Path,
    ticker: &str,
    key: &str,
    choice: usize,
    store: &Path,
    policy: Option<PathBuf>,
) -> anyhow::Result<()> {
    let items = load::load_items(input)?;
    let tolerance = load::load_policy(policy.as_deref())?;
    let groups = group_by_key(&merge_items_with(&items, &tolerance));

    let Some((_, options)) = groups.iter().find(|(k, _)| k.resolution_key() == key) else {
        bail!("no guidance with key {key:?}");
    };
    let Some(chosen) = options.get(choice) else {
        bail!("choice {choice} out of range: {key:?} has {} option(s)", options.len());
    };

    let mut store = JsonResolutionStore::open(store)
        .with_context(|| format!("failed to open store {}", store.display()))?;
    store.save(Resolution::new(ticker, chosen.clone()))?;
    println!("Saved [{choice}] {}", display::option_label(chosen));
    Ok(())
}

fn cmd_finalize(
    input: &Path,
    ticker: &str,
    store: &Path,
    policy: Option<PathBuf>,
    csv: Option<PathBuf>,
) -> anyhow::Result<()> {
    let items = load::load_items(input)?;
    let tolerance = load::load_policy(policy.as_deref())?;
    let groups = group_by_key(&merge_items_with(&items, &tolerance));

    let store = JsonResolutionStore::open(store)
        .with_context(|| format!("failed to open store {}", store.display()))?;
    let stored = store.fetch(ticker)?;
    let choices: HashMap<String, usize> = preselect_choices(&groups, &stored);
    let kept = finalize(&groups, &choices);
    info!(ticker, keys = groups.len(), resolutions = stored.len(), "finalized guidance");

    display::print_merged_table(&kept)?;
    if let Some(path) = csv {
        display::write_csv(&kept, &path)?;
        info!(path = %path.display(), rows = kept.len(), "wrote csv");
    }
    Ok(())
}
