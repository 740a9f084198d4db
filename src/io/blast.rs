//! Tabular RPS-BLAST output reader.
//!
//! Reads 12-column outfmt 6 records and keeps one top hit per query.

use crate::bio::cog::{AlignmentHit, ALIGNMENT_COLUMNS};
use crate::io::{open_table, record_line, TableError};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use std::path::Path;

/// One top hit per query, plus what was learned while selecting them.
#[derive(Debug, Clone, Default)]
pub struct TopHits {
    /// Kept hits, in order of first appearance of each query.
    pub hits: Vec<AlignmentHit>,
    /// Number of alignment records read.
    pub total_records: usize,
    /// Queries for which a later record scored strictly higher than the
    /// kept first record, i.e. the input was not sorted by bit score.
    pub unsorted_queries: usize,
}

/// Reads search output and keeps the first record of every query.
///
/// Callers must supply records grouped so that the first occurrence of a
/// query is its best-scoring hit (the order BLAST writes them in). The
/// order is not changed here; violations are only counted.
pub fn parse_rps_blast_output(path: &Path) -> Result<TopHits, TableError> {
    let mut reader = open_table(path)?;
    let mut record = csv::StringRecord::new();

    let mut kept: IndexMap<String, AlignmentHit> = IndexMap::new();
    let mut unsorted: IndexSet<String> = IndexSet::new();
    let mut total_records = 0usize;

    while reader.read_record(&mut record)? {
        let line = record_line(record.position());
        if record.len() != ALIGNMENT_COLUMNS {
            return Err(TableError::format(
                path,
                line,
                format!(
                    "expected {} alignment fields, found {}",
                    ALIGNMENT_COLUMNS,
                    record.len()
                ),
            ));
        }

        let hit: AlignmentHit = record
            .deserialize(None)
            .map_err(|e| TableError::format(path, line, deserialize_message(&e)))?;
        total_records += 1;

        match kept.entry(hit.query_id.clone()) {
            Entry::Occupied(first) => {
                if hit.bit_score > first.get().bit_score {
                    unsorted.insert(hit.query_id);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(hit);
            }
        }
    }

    let top_hits = TopHits {
        hits: kept.into_values().collect(),
        total_records,
        unsorted_queries: unsorted.len(),
    };

    info!(
        "Read {} alignment records, kept {} top hits",
        top_hits.total_records,
        top_hits.hits.len()
    );
    if top_hits.unsorted_queries > 0 {
        warn!(
            "{} queries have a later hit with a higher bit score than their first hit; \
             input does not appear to be sorted by score",
            top_hits.unsorted_queries
        );
        for query in unsorted.iter().take(10) {
            debug!("Unsorted hits for query {}", query);
        }
    }

    Ok(top_hits)
}

fn deserialize_message(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("invalid value in column {}: {}", field + 1, err.kind()),
            None => err.to_string(),
        },
        _ => err.to_string(),
    }
}
