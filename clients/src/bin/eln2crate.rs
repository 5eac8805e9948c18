//! `eln2crate` converts one notebook experiment export into a provenance graph
//! and writes it as RO-Crate metadata.
//!
//! **Outputs** (by `--format`):
//! - `<out>/ro-crate-metadata.json`: JSON-LD 1.1 (default)
//! - `<out>/ro-crate-metadata.ttl`: Turtle 1.1
//! - `<out>/ro-crate-metadata.nt`: N-Triples
//!
//! **Usage:**
//! ```text
//! eln2crate --experiment <export.json> --items <dir> --config <config.toml>
//!           [--package <dir>] [--identification <report.json>]
//!           [--out <path>] [--format jsonld|turtle|ntriples]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`). Exits non-zero if the
//! conversion fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use eln_engine::input::{ExperimentRecord, FileInventory, IdentificationReport, ItemRecord};
use eln_engine::{Engine, EngineConfig, Severity};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Output serialization.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// RO-Crate JSON-LD.
    Jsonld,
    /// Turtle.
    Turtle,
    /// N-Triples.
    Ntriples,
}

impl Format {
    fn file_name(self) -> &'static str {
        match self {
            Self::Jsonld => "ro-crate-metadata.json",
            Self::Turtle => "ro-crate-metadata.ttl",
            Self::Ntriples => "ro-crate-metadata.nt",
        }
    }
}

/// Convert a notebook experiment into RO-Crate provenance metadata.
#[derive(Parser)]
#[command(
    name = "eln2crate",
    about = "Convert a notebook experiment export into RO-Crate provenance metadata"
)]
struct Args {
    /// Experiment export (JSON).
    #[arg(long)]
    experiment: PathBuf,

    /// Directory of catalog item exports, one JSON file per item.
    #[arg(long)]
    items: PathBuf,

    /// Engine configuration (TOML).
    #[arg(long)]
    config: PathBuf,

    /// Package directory whose files are described in the metadata.
    #[arg(long)]
    package: Option<PathBuf>,

    /// File-identification report (JSON).
    #[arg(long)]
    identification: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Output serialization.
    #[arg(long, value_enum, default_value = "jsonld")]
    format: Format,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_text = fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read {}", args.config.display()))?;
    let config = EngineConfig::from_toml_str(&config_text)
        .with_context(|| format!("Invalid configuration {}", args.config.display()))?;
    let directories = config
        .directories()
        .with_context(|| format!("Invalid configuration {}", args.config.display()))?;
    let engine = Engine::new(directories).context("Failed to initialise the engine")?;

    let experiment: ExperimentRecord = read_json(&args.experiment)?;
    let items = read_items(&args.items)?;
    let inventory = FileInventory {
        files: match &args.package {
            Some(dir) => package_files(dir)?,
            None => Vec::new(),
        },
        identification: match &args.identification {
            Some(path) => Some(read_json::<IdentificationReport>(path)?),
            None => None,
        },
    };

    let input = engine
        .prepare(experiment, items, inventory)
        .context("Failed to read the experiment export")?;
    let conversion = engine.convert(&input).context("Conversion failed")?;

    println!(
        "Converted experiment {}: {} triples, {} errors, {} warnings",
        input.experiment.id,
        conversion.graph.len(),
        conversion.diagnostics.error_count(),
        conversion.diagnostics.warning_count()
    );
    for diagnostic in &conversion.diagnostics.entries {
        if diagnostic.severity != Severity::Info {
            println!("  {diagnostic}");
        }
    }

    let rendered = match args.format {
        Format::Jsonld => serde_json::to_string_pretty(&conversion.to_json_ld())
            .context("Failed to serialize graph to JSON-LD")?,
        Format::Turtle => conversion.to_turtle(),
        Format::Ntriples => conversion.to_ntriples(),
    };
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory: {}", args.out.display()))?;
    let path = args.out.join(args.format.file_name());
    fs::write(&path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  Written: {}", path.display());

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Reads every `*.json` file directly under `dir` as an item record.
fn read_items(dir: &Path) -> Result<Vec<ItemRecord>> {
    let mut items = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "json") {
            items.push(read_json(path)?);
        }
    }
    tracing::info!(count = items.len(), "read item exports");
    Ok(items)
}

/// Lists the files under `dir` as package-relative `/`-separated paths.
fn package_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("{} is outside the package", entry.path().display()))?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        files.push(parts.join("/"));
    }
    Ok(files)
}
