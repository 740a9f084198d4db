//! Main entry point for the cog_classifier application.
//!
//! Assigns COG functional categories to protein search hits:
//! 1. Reads RPS-BLAST tabular output and keeps one top hit per query.
//! 2. Resolves each hit's CDD identifier to a COG accession via `cddid.tbl`.
//! 3. Joins the hits with the COG definitions (`cog-20.def.tab`).
//! 4. Expands multi-letter classes into single functional categories.
//! 5. Counts hits per COG and per category (`fun-20.tab`).
//! 6. Writes the result tables and prints coverage statistics.

// Modules defined within the project
mod bio;
mod cli;
mod database;
mod io;
mod pipeline;
mod stats;

use cli::{run_cli, Cli};

// External Crate Imports
use anyhow::Result;
use clap::Parser;

/// Main function: parses arguments and runs the classification.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_cli(cli)?;

    Ok(())
}
