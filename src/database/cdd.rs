//! CDD identifier index.
//!
//! `cddid.tbl` maps every numeric CDD identifier to an accession from one
//! of several source collections (COG, Pfam, SMART, CD, ...). Only the COG
//! rows are useful for functional classification, so the index keeps those
//! and discards the rest.

use crate::bio::cog::CddEntry;
use crate::database::definitions::CogDefinitions;
use crate::io::{decode_field, open_table, record_line, TableError};
use indexmap::IndexMap;
use log::{debug, info};
use std::path::Path;

/// Lookup from numeric CDD identifier to COG accession.
#[derive(Debug, Clone, Default)]
pub struct CddIndex {
    entries: IndexMap<String, String>,
    /// Rows read from the table, COG or not.
    pub rows_read: usize,
}

impl CddIndex {
    /// Reads `cddid.tbl` (optionally gzipped).
    ///
    /// Every row must carry at least the numeric identifier and the
    /// accession; trailing columns (short name, description, length) are
    /// ignored.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let mut reader = open_table(path)?;
        let mut record = csv::ByteRecord::new();
        let mut entries = Vec::new();

        while reader.read_byte_record(&mut record)? {
            if record.len() < 2 {
                return Err(TableError::format(
                    path,
                    record_line(record.position()),
                    format!("expected at least 2 CDD fields, found {}", record.len()),
                ));
            }
            entries.push(CddEntry::new(
                &decode_field(&record[0]),
                &decode_field(&record[1]),
            ));
        }

        let index = Self::from_entries(entries);
        info!(
            "Indexed {} COG entries from {} CDD rows in {}",
            index.len(),
            index.rows_read,
            path.display()
        );
        Ok(index)
    }

    /// Builds the index, keeping only entries tagged as COG.
    ///
    /// A repeated identifier keeps its last accession.
    pub fn from_entries<I: IntoIterator<Item = CddEntry>>(entries: I) -> Self {
        let mut index = CddIndex::default();
        for entry in entries {
            index.rows_read += 1;
            if entry.is_cog() {
                index.entries.insert(entry.numeric_id, entry.accession);
            }
        }
        index
    }

    /// Resolves a numeric CDD identifier to its COG accession.
    pub fn resolve(&self, numeric_id: &str) -> Option<&str> {
        self.entries.get(numeric_id).map(String::as_str)
    }

    /// Number of indexed COG entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates `(numeric_id, accession)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Indexed entries whose COG accession has no definition row.
    ///
    /// Hits resolving to one of these are dropped by the definition join.
    pub fn missing_definitions<'a>(
        &'a self,
        definitions: &CogDefinitions,
    ) -> Vec<(&'a str, &'a str)> {
        let missing: Vec<(&str, &str)> = self
            .iter()
            .filter(|(_, accession)| !definitions.contains(accession))
            .collect();
        for (numeric_id, accession) in &missing {
            debug!("CDD {} ({}) has no COG definition", numeric_id, accession);
        }
        missing
    }
}
