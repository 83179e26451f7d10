use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};
use crate::engine::scoring::FieldWeights;
use crate::engine::search::{EngineConfig, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};
use crate::extractor::DEFAULT_TFIDF_TOP_N;

pub const DEFAULT_DB_PATH: &str = "data-scout.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "data-scout", version, about = "Natural-language product search")]
pub struct Cli {
    /// SQLite database holding the product catalogue
    #[arg(long, global = true, env = "DATA_SCOUT_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Newline-separated stop word list replacing the bundled English one
    #[arg(long, global = true, env = "DATA_SCOUT_STOP_WORDS")]
    pub stop_words: Option<PathBuf>,

    /// Results returned when a request gives no limit
    #[arg(
        long,
        global = true,
        env = "DATA_SCOUT_DEFAULT_LIMIT",
        default_value_t = DEFAULT_LIMIT,
        value_parser = parse_positive
    )]
    pub default_limit: usize,

    /// Upper bound on any requested limit
    #[arg(
        long,
        global = true,
        env = "DATA_SCOUT_MAX_LIMIT",
        default_value_t = DEFAULT_MAX_LIMIT,
        value_parser = parse_positive
    )]
    pub max_limit: usize,

    /// Keywords kept by the tfidf extractor
    #[arg(
        long,
        global = true,
        env = "DATA_SCOUT_TFIDF_TOP_N",
        default_value_t = DEFAULT_TFIDF_TOP_N,
        value_parser = parse_positive
    )]
    pub tfidf_top_n: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP search API
    Serve(ServeArgs),
    /// Load a JSON product catalogue into the store
    Seed(SeedArgs),
    /// Print the keywords extracted from a query
    Extract(ExtractArgs),
    /// Run a search from the command line
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "DATA_SCOUT_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// JSON array of products
    #[arg(long)]
    pub file: PathBuf,

    /// Remove every stored product first
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Query text; read from stdin when omitted
    pub query: Option<String>,

    #[arg(long, default_value = "basic")]
    pub extractor: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,

    #[arg(long, default_value = "auto")]
    pub mode: String,

    #[arg(long, default_value = "basic")]
    pub extractor: String,

    #[arg(long, default_value = "relevance")]
    pub sort: String,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value = "text")]
    pub format: String,
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            tfidf_top_n: self.tfidf_top_n,
            weights: FieldWeights::default(),
        }
    }
}
