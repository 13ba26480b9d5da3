//! Clap derive structures for the `meshscout` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// meshscout -- discover MeshCore mesh nodes by region
#[derive(Debug, Parser)]
#[command(
    name = "meshscout",
    version,
    about = "Discover MeshCore nodes (repeaters, companions, rooms) by region",
    long_about = "Reconstructs the set of MeshCore devices active in a geographic region\n\
        over a trailing time window, from the letsmesh.net analyzer API.\n\n\
        The analyzer has no native region/recency query, so discovery merges\n\
        its nodes index with the advert packet stream and filters locally.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Analyzer API base URL
    #[arg(long, env = "MESHSCOUT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "MESHSCOUT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Config file path (default: platform config dir)
    #[arg(long, env = "MESHSCOUT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one public key per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover nodes in a region
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// List known region codes and groups
    #[command(alias = "r")]
    Regions,
}

#[derive(Debug, Args)]
pub struct NodesArgs {
    /// Region code or group (e.g. SEA, PDX, BC, PNW)
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// Number of days to look back
    #[arg(long, short = 'd')]
    pub days: Option<u32>,

    /// Write the snapshot as pretty JSON to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Skip per-node advert fetches (faster, but less detail)
    #[arg(long)]
    pub no_adverts: bool,

    /// Fetch these specific public keys instead of discovering
    #[arg(long, short = 'k', num_args = 1.., value_name = "KEY")]
    pub public_keys: Vec<String>,
}
