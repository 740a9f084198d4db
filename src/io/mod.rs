//! Input/Output operations module.
//!
//! Handles reading the tab-delimited reference and search tables (plain or
//! gzip-compressed) and rendering tab-delimited output tables.

pub mod blast; // Tabular search output (top-hit selection)

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use blast::{parse_rps_blast_output, TopHits};

/// Errors raised while reading an input table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("input file not found or unreadable: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("{}:{line}: {message}", .path.display())]
    Format {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TableError {
    pub fn format(path: &Path, line: u64, message: impl Into<String>) -> Self {
        TableError::Format {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

pub type TableReader = csv::Reader<Box<dyn Read>>;

/// Fails with `MissingFile` unless `path` names a readable regular file.
pub fn ensure_readable(path: &Path) -> Result<(), TableError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(TableError::MissingFile {
            path: path.to_path_buf(),
        }),
    }
}

/// Opens a headerless tab-delimited table, decompressing `.gz` files.
///
/// Quoting is disabled: description columns in the reference tables contain
/// bare `"` characters that must be taken literally.
pub fn open_table(path: &Path) -> Result<TableReader, TableError> {
    let file = File::open(path).map_err(|_| TableError::MissingFile {
        path: path.to_path_buf(),
    })?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn Read> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader))
}

/// 1-based line number of a record, or 0 when unknown.
pub fn record_line(position: Option<&csv::Position>) -> u64 {
    position.map(|p| p.line()).unwrap_or(0)
}

/// Decodes a raw field, falling back to ISO-8859-1 when it is not UTF-8.
pub fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1 maps each byte to the code point of the same value.
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Renders rows as a tab-delimited table with a header line.
pub fn render_table<I, R>(header: &[&str], rows: I) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Formats a percent identity with the shortest round-trip decimal.
pub fn format_identity(value: f64) -> String {
    format!("{}", value)
}

/// Formats an e-value; values below 1e-3 use scientific notation.
pub fn format_evalue(value: f64) -> String {
    if value != 0.0 && value.abs() < 1.0e-3 {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_readable_missing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.tsv");
        match ensure_readable(&missing) {
            Err(TableError::MissingFile { path }) => assert_eq!(path, missing),
            other => panic!("expected MissingFile, got {:?}", other),
        }
        // A directory is not a table.
        assert!(ensure_readable(dir.path()).is_err());
    }

    #[test]
    fn test_open_table_plain_and_gz() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("t.tsv");
        fs::write(&plain, "1\tCOG0001\t\"quoted\"\n2\tpfam1\n").unwrap();

        let gz = dir.path().join("t.tsv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"1\tCOG0001\t\"quoted\"\n2\tpfam1\n").unwrap();
        fs::write(&gz, encoder.finish().unwrap()).unwrap();

        for path in [&plain, &gz] {
            let mut reader = open_table(path).unwrap();
            let records: Vec<csv::StringRecord> =
                reader.records().collect::<Result<_, _>>().unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(&records[0][2], "\"quoted\"");
            assert_eq!(records[1].len(), 2);
        }
    }

    #[test]
    fn test_decode_field_latin1() {
        assert_eq!(decode_field(b"plain"), "plain");
        assert_eq!(decode_field(&[b'c', 0xE9]), "c\u{e9}");
    }

    #[test]
    fn test_render_table() {
        let rows = vec![vec!["a", "b"], vec!["c", "\"d\""]];
        let bytes = render_table(&["x", "y"], rows).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "x\ty\na\tb\nc\t\"d\"\n");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_identity(98.5), "98.5");
        assert_eq!(format_identity(100.0), "100");
        assert_eq!(format_evalue(2.5e-50), "2.5e-50");
        assert_eq!(format_evalue(0.0), "0");
        assert_eq!(format_evalue(0.01), "0.01");
    }
}
