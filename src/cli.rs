use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::pipeline::{generate_summary, CogClassifier, InputPaths, ProcessingError, ReportWriter};

/// Assign COG functional categories to RPS-BLAST top hits.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the rpsblast result file (tabular, 12 columns, no header)
    #[arg(short = 'r', long = "blast_output_filepath", required = true)]
    pub blast_output: PathBuf,

    /// Path to the cddid.tbl file (may be gzipped)
    #[arg(short = 'c', long = "cddid_filepath", required = true)]
    pub cddid: PathBuf,

    /// Path to the fun-20.tab file
    #[arg(short = 'f', long = "fun_filepath", required = true)]
    pub fun: PathBuf,

    /// Path to the cog-20.def.tab file
    #[arg(short = 'd', long = "cog_def_filepath", required = true)]
    pub cog_def: PathBuf,

    /// Directory to write result files into (created if absent)
    #[arg(short = 'o', long = "results_directory", required = true)]
    pub results_dir: PathBuf,
}

impl Cli {
    pub fn input_paths(&self) -> InputPaths {
        InputPaths {
            blast_output: self.blast_output.clone(),
            cddid: self.cddid.clone(),
            fun: self.fun.clone(),
            cog_def: self.cog_def.clone(),
        }
    }
}

/// Main entry point for CLI
pub fn run_cli(cli: Cli) -> Result<(), ProcessingError> {
    info!("Starting COG classification with arguments: {:?}", cli);

    let classifier = CogClassifier::new(cli.input_paths());
    let outputs = classifier.run()?;

    ReportWriter::new(&cli.results_dir).write(
        &outputs.classified,
        &outputs.cog_stats,
        &outputs.func_stats,
    )?;

    println!("{}", generate_summary(&outputs.summary, &cli.results_dir));
    Ok(())
}
