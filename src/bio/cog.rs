//! Record types shared by every stage of the COG classification pipeline.
//!
//! Each type corresponds to one row of an input table (alignment hits,
//! CDD identifiers, COG definitions, functional categories) or to the
//! per-hit record emitted once a hit has been classified.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Composite subject identifier of an alignment, e.g. `CDD:223096`.
///
/// The namespace is everything before the first `:`; the accession is the
/// component that follows it and is the key used against the CDD index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct SubjectId {
    pub namespace: String,
    pub accession: String,
}

impl FromStr for SubjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let namespace = parts.next().unwrap_or_default();
        let accession = parts
            .next()
            .ok_or_else(|| format!("subject id '{}' has no ':' delimiter", s))?;
        if accession.is_empty() {
            return Err(format!("subject id '{}' has an empty accession", s));
        }
        Ok(SubjectId {
            namespace: namespace.to_string(),
            accession: accession.to_string(),
        })
    }
}

impl TryFrom<String> for SubjectId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.accession)
    }
}

/// One row of tabular (outfmt 6) search output.
///
/// Fields are positional; the table carries no header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlignmentHit {
    pub query_id: String,
    pub subject_id: SubjectId,
    pub percent_identity: f64,
    pub alignment_length: u32,
    pub mismatches: u32,
    pub gap_opens: u32,
    pub q_start: u32,
    pub q_end: u32,
    pub s_start: u32,
    pub s_end: u32,
    pub e_value: f64,
    pub bit_score: f64,
}

/// Number of positional columns in an alignment record.
pub const ALIGNMENT_COLUMNS: usize = 12;

/// One row of `cddid.tbl`: a numeric CDD identifier and its accession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CddEntry {
    pub numeric_id: String,
    pub type_tag: String,
    pub accession: String,
}

/// Tag that marks a CDD accession as belonging to the COG collection.
pub const COG_TAG: &str = "COG";

impl CddEntry {
    /// Splits a type-tagged accession into its tag and value.
    ///
    /// Two spellings are accepted: `TAG:VALUE` (the tag is the part before
    /// the colon), and the bare accession form used by `cddid.tbl`
    /// (`COG0001`, `pfam00115`, `cd00002`), where the tag is the leading
    /// alphabetic run and the value is the whole accession.
    pub fn new(numeric_id: &str, tagged_accession: &str) -> Self {
        let tagged_accession = tagged_accession.trim();
        let (type_tag, accession) = match tagged_accession.split_once(':') {
            Some((tag, value)) => (tag.to_string(), value.to_string()),
            None => {
                let tag: String = tagged_accession
                    .chars()
                    .take_while(|c| c.is_ascii_alphabetic())
                    .collect();
                (tag, tagged_accession.to_string())
            }
        };
        CddEntry {
            numeric_id: numeric_id.trim().to_string(),
            type_tag,
            accession,
        }
    }

    /// True when the entry belongs to the COG collection.
    pub fn is_cog(&self) -> bool {
        self.type_tag.starts_with(COG_TAG)
    }
}

/// One row of `cog-20.def.tab`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CogDefinition {
    pub cog_id: String,
    /// One or more single-letter functional categories, e.g. `KL`.
    pub class_codes: String,
    pub gene_function: String,
    pub gene_name: String,
    pub pathway: String,
    pub unknown_field: String,
    pub type_field: String,
}

/// One row of `fun-20.tab`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDescription {
    pub letter: char,
    pub code: String,
    pub description: String,
}

/// An alignment hit joined with the definition of the COG it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedHit {
    pub query_id: String,
    pub subject_id: SubjectId,
    pub percent_identity: f64,
    pub e_value: f64,
    pub cog_id: String,
    pub class_codes: String,
    pub gene_function: String,
    pub gene_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_parse() {
        let id: SubjectId = "CDD:12345".parse().unwrap();
        assert_eq!(id.namespace, "CDD");
        assert_eq!(id.accession, "12345");
        assert_eq!(id.to_string(), "CDD:12345");
    }

    #[test]
    fn test_subject_id_takes_second_component() {
        let id: SubjectId = "gnl:CDD:223096".parse().unwrap();
        assert_eq!(id.namespace, "gnl");
        assert_eq!(id.accession, "CDD");
    }

    #[test]
    fn test_subject_id_malformed() {
        assert!("CDD12345".parse::<SubjectId>().is_err());
        assert!("CDD:".parse::<SubjectId>().is_err());
    }

    #[test]
    fn test_cdd_entry_bare_accession() {
        let cog = CddEntry::new("223096", "COG0001");
        assert!(cog.is_cog());
        assert_eq!(cog.type_tag, "COG");
        assert_eq!(cog.accession, "COG0001");

        let pfam = CddEntry::new("395000", "pfam00001");
        assert!(!pfam.is_cog());
        assert_eq!(pfam.type_tag, "pfam");
    }

    #[test]
    fn test_cdd_entry_tagged_accession() {
        let cog = CddEntry::new(" 42 ", "COG:COG0420");
        assert!(cog.is_cog());
        assert_eq!(cog.numeric_id, "42");
        assert_eq!(cog.accession, "COG0420");

        let other = CddEntry::new("43", "cd:cd00001");
        assert!(!other.is_cog());
    }
}
