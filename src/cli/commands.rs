//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "faqrag")]
#[command(about = "FAQ retrieval over PostgreSQL + pgvector")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: $FAQRAG_CONFIG, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the pgvector extension, the faqs table and its indexes
    Init {
        /// Skip creating the HNSW vector index
        #[arg(long)]
        skip_index: bool,
    },
    /// Compute question embeddings for a JSON file of scraped records
    Embed {
        /// Input JSON array of records
        input: PathBuf,
        /// Output file (default: <input>.embedded.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Embed missing vectors, validate and load records into the store
    Ingest {
        /// Input JSON array of records
        input: PathBuf,
        /// Skip records whose question and url are already stored
        #[arg(long)]
        dedup: bool,
        /// Run against an in-memory store; PostgreSQL is not touched
        #[arg(long)]
        dry_run: bool,
    },
    /// Answer a question, or start the interactive shell without one
    Ask {
        /// Question to answer once
        question: Option<String>,
        /// Print the match as JSON (one-shot mode only)
        #[arg(long)]
        json: bool,
    },
    /// Show the number of stored records
    Stats,
    /// Show current configuration
    Config,
}
