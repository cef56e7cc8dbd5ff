//! Gazette - a news archive publishing engine.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod feed;
mod logger;
mod model;
mod modules;
mod resolver;
mod tags;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(SiteConfig::load(&cli)?);
    let store = model::load_content(&config.paths.content)?;

    match &cli.command {
        Commands::Generate { archive, feed } => {
            cli::generate::run_generate(&store, &config, *archive, feed.as_deref())
        }
        Commands::Remove { feed } => cli::generate::run_remove(&store, &config, feed),
        Commands::Sitemap => cli::generate::run_sitemap(&store, &config),
        Commands::Resolve {
            item,
            absolute,
            month,
        } => cli::query::run_resolve(&store, &config, item, *absolute, month.as_deref()),
        Commands::Expand { input } => cli::query::run_expand(&store, &config, input),
        Commands::List { args } => cli::query::run_list(&store, &config, args),
        Commands::Archive { args } => cli::query::run_archive(&store, &config, args),
    }
}
