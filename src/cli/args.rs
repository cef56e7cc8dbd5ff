//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::Id;

/// Gazette news publishing CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: gazette.toml)
    #[arg(short = 'C', long, default_value = "gazette.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate feed files (the daily cron entry point)
    #[command(visible_alias = "g")]
    Generate {
        /// Only regenerate feeds that include this archive
        #[arg(short, long, conflicts_with = "feed")]
        archive: Option<Id>,

        /// Only regenerate this feed (id or alias)
        #[arg(short, long)]
        feed: Option<String>,
    },

    /// Remove a feed's output file
    Remove {
        /// Feed id or alias
        feed: String,
    },

    /// Generate the news sitemap
    Sitemap,

    /// Print the canonical URL of a news item
    #[command(visible_alias = "r")]
    Resolve {
        /// Item id or alias
        item: String,

        /// Produce an absolute URL
        #[arg(short, long)]
        absolute: bool,

        /// Archive month context appended as query parameter (YYYYMM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Expand news insert tags in a text file (`-` reads stdin)
    Expand {
        /// Input file
        #[arg(default_value = "-", value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Render a news list module to JSON
    List {
        #[command(flatten)]
        args: ListArgs,
    },

    /// Render a news archive module to JSON
    Archive {
        #[command(flatten)]
        args: ArchiveArgs,
    },
}

/// List command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Archive ids to list
    #[arg(short, long, required = true, num_args = 1..)]
    pub archives: Vec<Id>,

    /// Featured filter: all | featured | unfeatured
    #[arg(long, default_value = "all")]
    pub featured: String,

    /// Sort order: date_desc | date_asc | headline_asc | headline_desc | random
    #[arg(short, long, default_value = "date_desc")]
    pub order: String,

    /// Overall item cap (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Items skipped from the top
    #[arg(short, long, default_value_t = 0)]
    pub skip: usize,

    /// Page size (0 disables pagination)
    #[arg(short, long, default_value_t = 0)]
    pub per_page: usize,

    /// Page number (with --per-page)
    #[arg(long)]
    pub page: Option<usize>,
}

/// Archive command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ArchiveArgs {
    /// Archive ids to render
    #[arg(short, long, required = true, num_args = 1..)]
    pub archives: Vec<Id>,

    /// Month selector (YYYYMM)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Year selector (YYYY)
    #[arg(short, long)]
    pub year: Option<String>,

    /// Day selector (YYYYMMDD)
    #[arg(short, long)]
    pub day: Option<String>,

    /// Show everything published so far instead of the current period
    #[arg(long)]
    pub all: bool,

    /// Page size (0 disables pagination)
    #[arg(short, long, default_value_t = 0)]
    pub per_page: usize,

    /// Page number (with --per-page)
    #[arg(long)]
    pub page: Option<usize>,
}
