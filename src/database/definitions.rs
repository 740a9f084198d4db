//! COG reference tables: `cog-20.def.tab` and `fun-20.tab`.

use crate::bio::cog::{CategoryDescription, CogDefinition};
use crate::io::{decode_field, open_table, record_line, TableError};
use indexmap::IndexMap;
use log::{debug, info};
use std::path::Path;

/// Minimum columns of a definition row: COG id, class codes, gene function.
const MIN_DEFINITION_COLUMNS: usize = 3;

/// COG definitions keyed by COG accession.
#[derive(Debug, Clone, Default)]
pub struct CogDefinitions {
    definitions: IndexMap<String, CogDefinition>,
}

impl CogDefinitions {
    /// Reads `cog-20.def.tab` (7 columns; Latin-1 text is accepted).
    ///
    /// Missing trailing columns (gene name, pathway, ...) are read as empty.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let mut reader = open_table(path)?;
        let mut record = csv::ByteRecord::new();
        let mut rows = Vec::new();

        while reader.read_byte_record(&mut record)? {
            if record.len() < MIN_DEFINITION_COLUMNS {
                return Err(TableError::format(
                    path,
                    record_line(record.position()),
                    format!(
                        "expected at least {} COG definition fields, found {}",
                        MIN_DEFINITION_COLUMNS,
                        record.len()
                    ),
                ));
            }
            let field = |i: usize| record.get(i).map(decode_field).unwrap_or_default();
            rows.push(CogDefinition {
                cog_id: field(0).trim().to_string(),
                class_codes: field(1).trim().to_string(),
                gene_function: field(2),
                gene_name: field(3),
                pathway: field(4),
                unknown_field: field(5),
                type_field: field(6),
            });
        }

        let definitions = Self::from_definitions(rows);
        info!(
            "Loaded {} COG definitions from {}",
            definitions.len(),
            path.display()
        );
        Ok(definitions)
    }

    /// Builds the table; a repeated COG id keeps its first definition so
    /// that joining against it never multiplies hits.
    pub fn from_definitions<I: IntoIterator<Item = CogDefinition>>(rows: I) -> Self {
        let mut definitions = IndexMap::new();
        for row in rows {
            if definitions.contains_key(&row.cog_id) {
                debug!("Ignoring repeated definition of {}", row.cog_id);
                continue;
            }
            definitions.insert(row.cog_id.clone(), row);
        }
        CogDefinitions { definitions }
    }

    pub fn get(&self, cog_id: &str) -> Option<&CogDefinition> {
        self.definitions.get(cog_id)
    }

    pub fn contains(&self, cog_id: &str) -> bool {
        self.definitions.contains_key(cog_id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }
}

/// Functional category descriptions keyed by category letter.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: IndexMap<char, CategoryDescription>,
}

impl CategoryTable {
    /// Reads `fun-20.tab`: letter, color code, description.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let mut reader = open_table(path)?;
        let mut record = csv::ByteRecord::new();
        let mut rows = Vec::new();

        while reader.read_byte_record(&mut record)? {
            let line = record_line(record.position());
            if record.len() < 3 {
                return Err(TableError::format(
                    path,
                    line,
                    format!("expected 3 category fields, found {}", record.len()),
                ));
            }

            let letter_field = decode_field(&record[0]);
            let mut chars = letter_field.trim().chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(TableError::format(
                        path,
                        line,
                        format!("category '{}' is not a single letter", letter_field),
                    ))
                }
            };

            rows.push(CategoryDescription {
                letter,
                code: decode_field(&record[1]),
                description: decode_field(&record[2]),
            });
        }

        let table = Self::from_descriptions(rows);
        info!(
            "Loaded {} functional categories from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_descriptions<I: IntoIterator<Item = CategoryDescription>>(rows: I) -> Self {
        let mut categories = IndexMap::new();
        for row in rows {
            categories.entry(row.letter).or_insert(row);
        }
        CategoryTable { categories }
    }

    pub fn description(&self, letter: char) -> Option<&str> {
        self.categories
            .get(&letter)
            .map(|c| c.description.as_str())
    }

    /// Category letters in table order.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.categories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_definitions_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cog-20.def.tab");
        let mut content = b"COG0001\tH\tGlutamate-1-semialdehyde aminotransferase\tHemL\tHeme biosynthesis\t\t2CFB\n".to_vec();
        // Latin-1 encoded "\u{e9}" in the gene function.
        content.extend_from_slice(b"COG0002\tKL\tProt\xe9ine\tArgC\n");
        content.extend_from_slice(b"COG0001\tJ\tDuplicate\tX\t\t\t\n");
        fs::write(&path, content).unwrap();

        let defs = CogDefinitions::from_path(&path).unwrap();
        assert_eq!(defs.len(), 2);

        let first = defs.get("COG0001").unwrap();
        assert_eq!(first.class_codes, "H");
        assert_eq!(first.gene_name, "HemL");
        assert_eq!(first.type_field, "2CFB");

        let second = defs.get("COG0002").unwrap();
        assert_eq!(second.class_codes, "KL");
        assert_eq!(second.gene_function, "Prot\u{e9}ine");
        assert_eq!(second.pathway, "");
    }

    #[test]
    fn test_definitions_short_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cog-20.def.tab");
        fs::write(&path, "COG0001\tH\n").unwrap();
        assert!(matches!(
            CogDefinitions::from_path(&path),
            Err(TableError::Format { line: 1, .. })
        ));
    }

    #[test]
    fn test_category_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fun-20.tab");
        fs::write(
            &path,
            "J\tFCCCFC\tTranslation, ribosomal structure and biogenesis\n\
             K\tFCDCFC\tTranscription\n\
             L\tFCDCFC\tReplication, recombination and repair\n",
        )
        .unwrap();

        let table = CategoryTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.description('K'), Some("Transcription"));
        assert_eq!(table.description('Z'), None);
        assert_eq!(table.letters().collect::<String>(), "JKL");
    }

    #[test]
    fn test_category_letter_must_be_single_char() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fun-20.tab");
        fs::write(&path, "K\tFCDCFC\tTranscription\nKL\tFCDCFC\tBoth\n").unwrap();
        assert!(matches!(
            CategoryTable::from_path(&path),
            Err(TableError::Format { line: 2, .. })
        ));
    }
}
