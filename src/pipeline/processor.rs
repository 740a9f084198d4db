//! Classification driver.
//!
//! Checks and loads the input tables, then runs the classification stages
//! in order and collects the tables and counters a report needs.

use crate::bio::cog::ClassifiedHit;
use crate::database::{CategoryTable, CddIndex, CogDefinitions};
use crate::io::{ensure_readable, parse_rps_blast_output, TableError, TopHits};
use crate::pipeline::assign::{assign_cogs, join_definitions};
use crate::pipeline::expand::expand_classes;
use crate::pipeline::report::ClassificationSummary;
use crate::stats::{
    category_frequencies, cog_frequencies, group_totals, CategoryFrequency, CogFrequency,
};
use log::{info, warn};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Output rendering error: {0}")]
    Render(#[from] csv::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },
}

/// Locations of the four input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    /// Tabular RPS-BLAST output (12 columns, no header).
    pub blast_output: PathBuf,
    /// `cddid.tbl`, optionally gzipped.
    pub cddid: PathBuf,
    /// `fun-20.tab`.
    pub fun: PathBuf,
    /// `cog-20.def.tab`.
    pub cog_def: PathBuf,
}

impl InputPaths {
    fn all(&self) -> [&PathBuf; 4] {
        [&self.blast_output, &self.cddid, &self.fun, &self.cog_def]
    }
}

/// The three reference tables a run classifies against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub index: CddIndex,
    pub definitions: CogDefinitions,
    pub categories: CategoryTable,
}

/// Everything a run produces, before anything is written.
#[derive(Debug, Clone, Default)]
pub struct ClassificationOutputs {
    pub classified: Vec<ClassifiedHit>,
    pub cog_stats: Vec<CogFrequency>,
    pub func_stats: Vec<CategoryFrequency>,
    pub summary: ClassificationSummary,
}

/// Runs the classification stages over one set of input tables.
pub struct CogClassifier {
    pub paths: InputPaths,
}

impl CogClassifier {
    pub fn new(paths: InputPaths) -> Self {
        CogClassifier { paths }
    }

    /// Checks the inputs, loads every table, and classifies the top hits.
    ///
    /// All four inputs are checked before any of them is parsed.
    pub fn run(&self) -> Result<ClassificationOutputs, ProcessingError> {
        let start = Instant::now();
        for path in self.paths.all() {
            ensure_readable(path)?;
        }

        info!("Reading search output {}", self.paths.blast_output.display());
        let top_hits = parse_rps_blast_output(&self.paths.blast_output)?;
        let tables = self.load_reference_tables()?;

        let outputs = classify_hits(top_hits, &tables);
        info!(
            "Classification finished in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );
        Ok(outputs)
    }

    pub fn load_reference_tables(&self) -> Result<ReferenceTables, ProcessingError> {
        Ok(ReferenceTables {
            index: CddIndex::from_path(&self.paths.cddid)?,
            definitions: CogDefinitions::from_path(&self.paths.cog_def)?,
            categories: CategoryTable::from_path(&self.paths.fun)?,
        })
    }
}

/// Classifies top hits against loaded reference tables.
///
/// Stages run strictly in order: COG assignment, definition join, class
/// expansion, then both frequency aggregations.
pub fn classify_hits(top_hits: TopHits, tables: &ReferenceTables) -> ClassificationOutputs {
    let TopHits {
        hits,
        total_records,
        unsorted_queries,
    } = top_hits;
    let top_hit_count = hits.len();

    let annotated = assign_cogs(hits, &tables.index);
    let joined = join_definitions(annotated, &tables.definitions);

    let tokens = expand_classes(joined.classified.iter().map(|h| h.class_codes.as_str()));
    let cog_stats = cog_frequencies(&joined.classified);
    let func_stats = category_frequencies(&tokens, &tables.categories);

    let undefined_indexed_cogs = tables.index.missing_definitions(&tables.definitions).len();
    if undefined_indexed_cogs > 0 {
        warn!(
            "{} indexed COGs have no definition; hits to them cannot be categorized",
            undefined_indexed_cogs
        );
    }

    let summary = ClassificationSummary {
        total_records,
        top_hits: top_hit_count,
        hits_categorized: joined.rows_after(),
        distinct_cogs: joined
            .classified
            .iter()
            .map(|h| h.cog_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        indexed_cogs: tables.index.len(),
        category_assignments: func_stats.iter().map(|r| r.frequency).sum(),
        distinct_categories_observed: func_stats
            .iter()
            .filter(|r| r.letter.is_some() && r.frequency > 0)
            .count(),
        categories_available: tables.categories.len(),
        unresolved_ids: joined.unresolved_ids(),
        missing_definitions: joined.missing_definitions(),
        undefined_indexed_cogs,
        unsorted_queries,
        group_totals: group_totals(&func_stats),
    };

    ClassificationOutputs {
        classified: joined.classified,
        cog_stats,
        func_stats,
        summary,
    }
}
