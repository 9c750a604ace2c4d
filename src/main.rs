//! mdiff CLI - Command line interface for merkle_diff
//!
//! Builds merkle trees over line-oriented files (one item per line) and
//! reports which lines of one file are missing from or differ in another.

use anyhow::Context;
use clap::{Parser, Subcommand};
use merkle_diff::{Blake3, Config, Hash, HexPrinter, MerkleTree, OutputFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdiff")]
#[command(about = "Build merkle trees over line-oriented files and diff them")]
#[command(version)]
struct Cli {
    /// Path to a config file (default: <config dir>/merkle_diff/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (json or text); overrides the config file
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Sort lines before building trees
    #[arg(long)]
    sort: bool,

    /// Log build and diff details to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a tree and show its root hash and depth
    Build {
        /// Input file, one item per line
        file: PathBuf,
    },

    /// Show node hashes, level by level from the root down
    Levels {
        /// Input file, one item per line
        file: PathBuf,
        /// Only show nodes at this level (0 = leaves)
        #[arg(short, long)]
        level: Option<u32>,
    },

    /// Show lines of REFERENCE that are missing from or differ in OTHER
    Diff {
        /// The authoritative file
        reference: PathBuf,
        /// The file to compare against
        other: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if cli.sort {
        config.sort = true;
    }
    let format = cli.format.unwrap_or(config.format);

    match cli.command {
        Commands::Build { file } => {
            let tree = build_tree(&config, &file)?;
            output(
                format,
                &serde_json::json!({
                    "file": file.display().to_string(),
                    "leaves": tree.len(),
                    "depth": tree.depth(),
                    "root": tree.root_hash().map(Hash::to_hex)
                }),
            )?;
        }

        Commands::Levels { file, level } => {
            let tree = build_tree(&config, &file)?;
            match level {
                Some(level) => {
                    let hashes: Vec<String> = tree
                        .nodes_at_level(level)?
                        .iter()
                        .map(|node| node.hash().to_hex())
                        .collect();
                    output(
                        format,
                        &serde_json::json!({
                            "level": level,
                            "count": hashes.len(),
                            "hashes": hashes
                        }),
                    )?;
                }
                None => {
                    let mut printer = HexPrinter::new();
                    tree.print_to(&mut printer);
                    output(
                        format,
                        &serde_json::json!({
                            "depth": tree.depth(),
                            "levels": printer.into_rows()
                        }),
                    )?;
                }
            }
        }

        Commands::Diff { reference, other } => {
            let ours = build_tree(&config, &reference)?;
            let theirs = build_tree(&config, &other)?;

            let entries: Vec<_> = ours
                .diff(&theirs)
                .iter()
                .map(|leaf| {
                    serde_json::json!({
                        "index": leaf.index(),
                        "item": leaf.data(),
                        "hash": leaf.hash().to_hex()
                    })
                })
                .collect();
            output(
                format,
                &serde_json::json!({
                    "reference": ours.root_hash().map(Hash::to_hex),
                    "other": theirs.root_hash().map(Hash::to_hex),
                    "count": entries.len(),
                    "entries": entries
                }),
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("merkle_diff=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("merkle_diff=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_tree(config: &Config, path: &Path) -> anyhow::Result<MerkleTree<String, Hash>> {
    let items = config
        .read_items(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(MerkleTree::build(items, &Blake3))
}

fn output(format: OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
