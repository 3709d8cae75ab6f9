//! Command line argument parsing for the Sanad CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Sanad - hybrid Quranic verse retrieval for hadith texts
#[derive(Parser, Debug, Clone)]
#[command(name = "sanad")]
#[command(about = "Find Quranic verses related to a hadith passage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SanadArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SanadArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a hadith passage through the full retrieval pipeline
    Search(SearchArgs),

    /// Lexical-only search over the corpus, no external services
    #[command(name = "keyword-search")]
    KeywordSearch(KeywordSearchArgs),

    /// Show corpus and index statistics
    Stats(StatsArgs),
}

/// Arguments shared by every command that loads the stores.
#[derive(Parser, Debug, Clone)]
pub struct StoreArgs {
    /// Path to the verse corpus (one normalized verse per line)
    #[arg(long, value_name = "CORPUS_FILE", env = "SANAD_CORPUS")]
    pub corpus: PathBuf,

    /// Path to the verse metadata JSON array
    #[arg(long, value_name = "METADATA_FILE", env = "SANAD_METADATA")]
    pub metadata: PathBuf,
}

/// Arguments for the full pipeline search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub stores: StoreArgs,

    /// The hadith passage to search with
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// OpenAI API key for embeddings and grading
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Embedding model identifier
    #[arg(long, default_value = "text-embedding-ada-002")]
    pub embedding_model: String,

    /// Chat model used for relevance grading
    #[arg(long, default_value = "gpt-3.5-turbo")]
    pub chat_model: String,

    /// Qdrant instance URL
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6333")]
    pub qdrant_url: String,

    /// Qdrant API key
    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    pub qdrant_api_key: Option<String>,

    /// Qdrant collection holding the verse embeddings
    #[arg(long, default_value = "quran_embeddings")]
    pub collection: String,

    /// Candidates fetched per retrieval branch
    #[arg(long, default_value = "15")]
    pub depth: usize,

    /// Minimum relevance grade (on the 1-10 gate scale) to keep a hit
    #[arg(long, default_value = "7")]
    pub threshold: u32,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "5")]
    pub limit: usize,

    /// Concurrent grading calls (1 = sequential)
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    /// Request timeout in seconds for all external services
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Strip the narrator chain from the query before searching
    #[arg(long)]
    pub extract_content: bool,
}

/// Arguments for lexical-only search
#[derive(Parser, Debug, Clone)]
pub struct KeywordSearchArgs {
    #[command(flatten)]
    pub stores: StoreArgs,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Use substring variation matching instead of exact-term BM25
    #[arg(long)]
    pub variations: bool,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub stores: StoreArgs,
}

/// Output formats supported by the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
