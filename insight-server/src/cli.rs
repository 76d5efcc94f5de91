//! CLI argument parsing using Clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use insight_market::config::{DEFAULT_BASE_URL, DEFAULT_DATE_WINDOW_DAYS, DEFAULT_PERFORMANCE_CONCURRENCY};

/// Product Ads insight reports for a marketplace seller
#[derive(Parser, Debug)]
#[command(name = "insight-server")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  insight-server report --token-file token.txt            Live report for the token's seller
  insight-server report --fixtures dumps/ --json          Offline report from JSON dumps
  insight-server rank --input items.csv --output out.csv  Rank listings by sales potential
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score campaigns and listings and write the recommendation tables
    Report(ReportArgs),
    /// Rank listings by sales potential and assign recommendation groups
    Rank(RankArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    // === Data source ===
    /// File holding the marketplace access token
    #[arg(long, env = "INSIGHT_TOKEN_FILE", required_unless_present = "fixtures")]
    pub token_file: Option<PathBuf>,

    /// Marketplace API base URL
    #[arg(long, env = "INSIGHT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Read JSON dumps from this directory instead of calling the API
    #[arg(long, conflicts_with = "token_file")]
    pub fixtures: Option<PathBuf>,

    /// Seller id to label an offline report with
    #[arg(long, default_value = "offline")]
    pub seller_id: String,

    // === Window & limits ===
    /// Metrics window in days, ending today
    #[arg(long, env = "INSIGHT_DAYS", default_value_t = DEFAULT_DATE_WINDOW_DAYS)]
    pub days: u32,

    /// Maximum concurrent performance lookups
    #[arg(long, env = "INSIGHT_CONCURRENCY", default_value_t = DEFAULT_PERFORMANCE_CONCURRENCY)]
    pub concurrency: usize,

    // === Output ===
    /// Directory for the report tables
    #[arg(long, env = "INSIGHT_OUT_DIR", default_value = "reports")]
    pub out_dir: PathBuf,

    /// File name prefix for the report tables
    #[arg(long, default_value = "product_ads")]
    pub prefix: String,

    /// Rows per table in the console summary
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Print the full report as JSON instead of the console summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    /// CSV with item_id, title, price, visits, sales, stock, quality_score
    #[arg(long)]
    pub input: PathBuf,

    /// Write the ranked table here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}
