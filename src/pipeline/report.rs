//! Output tables and the run summary.
//!
//! Nothing here transforms data: the classified hits and both frequency
//! tables are rendered as tab-delimited text, and the coverage counters are
//! formatted for the terminal.

use crate::bio::category::CategoryGroup;
use crate::bio::cog::ClassifiedHit;
use crate::io::{format_evalue, format_identity, render_table};
use crate::pipeline::processor::ProcessingError;
use crate::stats::{CategoryFrequency, CogFrequency};
use log::{info, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

pub const CLASSIFIER_RESULT_FILE: &str = "classifier_result.tsv";
pub const COG_STATS_FILE: &str = "cog_stats.txt";
pub const FUNC_STATS_FILE: &str = "func_stats.txt";

const CLASSIFIER_RESULT_HEADER: [&str; 8] = [
    "qaccver",
    "saccver",
    "pident",
    "evalue",
    "COG",
    "Class",
    "Gene_function",
    "Gene",
];
const COG_STATS_HEADER: [&str; 3] = ["COG", "Gene_function", "frequency"];
const FUNC_STATS_HEADER: [&str; 3] = ["Class", "Functional_Description", "frequency"];

/// Coverage counters of one classification run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationSummary {
    /// Alignment records in the search output.
    pub total_records: usize,
    /// Distinct queries (one top hit each).
    pub top_hits: usize,
    /// Top hits that survived the definition join.
    pub hits_categorized: usize,
    /// Distinct COGs among the categorized hits.
    pub distinct_cogs: usize,
    /// COG entries available in the CDD index.
    pub indexed_cogs: usize,
    /// Sum of category-level frequencies.
    pub category_assignments: usize,
    /// Categories with at least one assignment.
    pub distinct_categories_observed: usize,
    /// Categories in the description table.
    pub categories_available: usize,
    /// Top hits whose CDD id has no COG mapping.
    pub unresolved_ids: usize,
    /// Top hits whose COG has no definition.
    pub missing_definitions: usize,
    /// Indexed COGs that have no definition row.
    pub undefined_indexed_cogs: usize,
    /// Queries whose first hit was not their best-scoring one.
    pub unsorted_queries: usize,
    pub group_totals: Vec<(CategoryGroup, usize)>,
}

impl ClassificationSummary {
    /// Top hits lost in the definition join.
    pub fn dropped_hits(&self) -> usize {
        self.unresolved_ids + self.missing_definitions
    }
}

/// Renders `classifier_result.tsv`.
pub fn render_classified_hits(hits: &[ClassifiedHit]) -> Result<Vec<u8>, csv::Error> {
    render_table(
        &CLASSIFIER_RESULT_HEADER,
        hits.iter().map(|h| {
            [
                h.query_id.clone(),
                h.subject_id.to_string(),
                format_identity(h.percent_identity),
                format_evalue(h.e_value),
                h.cog_id.clone(),
                h.class_codes.clone(),
                h.gene_function.clone(),
                h.gene_name.clone(),
            ]
        }),
    )
}

/// Renders `cog_stats.txt`.
pub fn render_cog_stats(rows: &[CogFrequency]) -> Result<Vec<u8>, csv::Error> {
    render_table(
        &COG_STATS_HEADER,
        rows.iter().map(|r| {
            [
                r.cog_id.clone(),
                r.gene_function.clone(),
                r.frequency.to_string(),
            ]
        }),
    )
}

/// Renders `func_stats.txt`; the class-less row has an empty letter.
pub fn render_func_stats(rows: &[CategoryFrequency]) -> Result<Vec<u8>, csv::Error> {
    render_table(
        &FUNC_STATS_HEADER,
        rows.iter().map(|r| {
            [
                r.letter.map(String::from).unwrap_or_default(),
                r.description.clone(),
                r.frequency.to_string(),
            ]
        }),
    )
}

/// Paths of the written output tables.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReport {
    pub classifier_result: PathBuf,
    pub cog_stats: PathBuf,
    pub func_stats: PathBuf,
}

/// Writes the three output tables into a results directory.
pub struct ReportWriter {
    results_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(results_dir: impl AsRef<Path>) -> Self {
        ReportWriter {
            results_dir: results_dir.as_ref().to_path_buf(),
        }
    }

    /// Renders all tables, stages them as temporary files in the results
    /// directory, then moves them into place.
    ///
    /// Either all three tables are replaced or none are: outputs that
    /// already exist are set aside first and restored if any move fails.
    pub fn write(
        &self,
        hits: &[ClassifiedHit],
        cog_stats: &[CogFrequency],
        func_stats: &[CategoryFrequency],
    ) -> Result<WrittenReport, ProcessingError> {
        let rendered = [
            (CLASSIFIER_RESULT_FILE, render_classified_hits(hits)?),
            (COG_STATS_FILE, render_cog_stats(cog_stats)?),
            (FUNC_STATS_FILE, render_func_stats(func_stats)?),
        ];

        std::fs::create_dir_all(&self.results_dir)?;

        let mut staged = Vec::with_capacity(rendered.len());
        for (name, bytes) in rendered {
            let mut tmp = NamedTempFile::new_in(&self.results_dir)?;
            tmp.write_all(&bytes)?;
            tmp.flush()?;
            staged.push((self.results_dir.join(name), tmp));
        }

        self.commit(staged)?;

        Ok(WrittenReport {
            classifier_result: self.results_dir.join(CLASSIFIER_RESULT_FILE),
            cog_stats: self.results_dir.join(COG_STATS_FILE),
            func_stats: self.results_dir.join(FUNC_STATS_FILE),
        })
    }

    fn commit(&self, staged: Vec<(PathBuf, NamedTempFile)>) -> Result<(), ProcessingError> {
        for (path, _) in &staged {
            if path.exists() && !path.is_file() {
                return Err(ProcessingError::Persist {
                    path: path.clone(),
                    source: io::Error::new(
                        io::ErrorKind::Other,
                        "output path exists and is not a regular file",
                    ),
                });
            }
        }

        let mut backups: Vec<(PathBuf, TempPath)> = Vec::new();
        let mut installed: Vec<PathBuf> = Vec::new();
        let outcome = self.swap_in(staged, &mut backups, &mut installed);

        if outcome.is_err() {
            for path in &installed {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("Could not remove partial output {}: {}", path.display(), e);
                }
            }
            for (path, backup) in backups {
                if let Err(e) = backup.persist(&path) {
                    warn!("Could not restore {}: {}", path.display(), e.error);
                }
            }
        }
        // Backups left in `backups` on success are deleted on drop.
        outcome
    }

    fn swap_in(
        &self,
        staged: Vec<(PathBuf, NamedTempFile)>,
        backups: &mut Vec<(PathBuf, TempPath)>,
        installed: &mut Vec<PathBuf>,
    ) -> Result<(), ProcessingError> {
        let persist_err = |path: &Path, source: io::Error| ProcessingError::Persist {
            path: path.to_path_buf(),
            source,
        };

        for (path, tmp) in staged {
            if path.is_file() {
                let backup = NamedTempFile::new_in(&self.results_dir)?.into_temp_path();
                std::fs::rename(&path, &backup).map_err(|e| persist_err(path.as_path(), e))?;
                backups.push((path.clone(), backup));
            }
            tmp.persist(&path).map_err(|e| persist_err(path.as_path(), e.error))?;
            info!("Wrote {}", path.display());
            installed.push(path);
        }
        Ok(())
    }
}

/// Formats the human-readable run summary.
pub fn generate_summary(summary: &ClassificationSummary, results_dir: &Path) -> String {
    let mut report = String::new();

    report.push_str("Overall assignment statistics:\n");
    report.push_str(&format!(
        "~ Total query proteins categorized into COGs: {} (of {} top hits)\n",
        summary.hits_categorized, summary.top_hits
    ));
    report.push_str(&format!(
        "~ Total COGs used for the query proteins [of {} overall]: {}\n",
        summary.indexed_cogs, summary.distinct_cogs
    ));
    report.push_str(&format!(
        "~ Total number of assigned functional categories: {}\n",
        summary.category_assignments
    ));
    report.push_str(&format!(
        "~ Total functional categories used for the query proteins [of {} overall]: {}\n",
        summary.categories_available, summary.distinct_categories_observed
    ));
    report.push_str(&format!(
        "~ Top hits not categorized: {} ({} unresolved CDD ids, {} COGs without definition)\n",
        summary.dropped_hits(),
        summary.unresolved_ids,
        summary.missing_definitions
    ));
    report.push_str(&format!(
        "~ Indexed COGs without a definition: {}\n",
        summary.undefined_indexed_cogs
    ));
    if summary.unsorted_queries > 0 {
        report.push_str(&format!(
            "~ Queries whose first hit was not their best (input not sorted by score): {}\n",
            summary.unsorted_queries
        ));
    }

    if !summary.group_totals.is_empty() {
        report.push_str("Functional category assignments by group:\n");
        for (group, total) in &summary.group_totals {
            report.push_str(&format!("  {}: {}\n", group.as_str(), total));
        }
    }

    report.push_str(&format!(
        "Classification completed. Results saved to {}",
        results_dir.display()
    ));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn hit() -> ClassifiedHit {
        ClassifiedHit {
            query_id: "prot_1".to_string(),
            subject_id: "CDD:12345".parse().unwrap(),
            percent_identity: 98.5,
            e_value: 2.5e-50,
            cog_id: "COG0001".to_string(),
            class_codes: "KL".to_string(),
            gene_function: "TranscriptionRegulator".to_string(),
            gene_name: "geneX".to_string(),
        }
    }

    #[test]
    fn test_render_classified_hits() {
        let text = String::from_utf8(render_classified_hits(&[hit()]).unwrap()).unwrap();
        assert_eq!(
            text,
            "qaccver\tsaccver\tpident\tevalue\tCOG\tClass\tGene_function\tGene\n\
             prot_1\tCDD:12345\t98.5\t2.5e-50\tCOG0001\tKL\tTranscriptionRegulator\tgeneX\n"
        );
    }

    #[test]
    fn test_render_func_stats_unassigned_row() {
        let rows = vec![
            CategoryFrequency {
                letter: None,
                description: String::new(),
                frequency: 2,
            },
            CategoryFrequency {
                letter: Some('K'),
                description: "Transcription".to_string(),
                frequency: 0,
            },
        ];
        let text = String::from_utf8(render_func_stats(&rows).unwrap()).unwrap();
        assert_eq!(
            text,
            "Class\tFunctional_Description\tfrequency\n\t\t2\nK\tTranscription\t0\n"
        );
    }

    #[test]
    fn test_writer_creates_directory_and_files() {
        let dir = tempdir().unwrap();
        let results = dir.path().join("nested").join("results");
        let cog_stats = vec![CogFrequency {
            cog_id: "COG0001".to_string(),
            gene_function: "TranscriptionRegulator".to_string(),
            frequency: 1,
        }];

        let written = ReportWriter::new(&results)
            .write(&[hit()], &cog_stats, &[])
            .unwrap();

        assert!(written.classifier_result.is_file());
        assert_eq!(
            fs::read_to_string(&written.cog_stats).unwrap(),
            "COG\tGene_function\tfrequency\nCOG0001\tTranscriptionRegulator\t1\n"
        );
        assert_eq!(
            fs::read_to_string(&written.func_stats).unwrap(),
            "Class\tFunctional_Description\tfrequency\n"
        );
        // Only the three tables remain; staged temp files were renamed.
        assert_eq!(fs::read_dir(&results).unwrap().count(), 3);
    }

    #[test]
    fn test_writer_replaces_existing_outputs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CLASSIFIER_RESULT_FILE), "OLD").unwrap();
        fs::write(dir.path().join(FUNC_STATS_FILE), "OLD").unwrap();

        let written = ReportWriter::new(dir.path())
            .write(&[hit()], &[], &[])
            .unwrap();

        assert!(fs::read_to_string(&written.classifier_result)
            .unwrap()
            .contains("prot_1\tCDD:12345"));
        assert_eq!(
            fs::read_to_string(&written.func_stats).unwrap(),
            "Class\tFunctional_Description\tfrequency\n"
        );
        // Set-aside copies of the old outputs are cleaned up.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_writer_leaves_outputs_untouched_when_a_target_is_blocked() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CLASSIFIER_RESULT_FILE), "OLD").unwrap();
        let blocked = dir.path().join(COG_STATS_FILE);
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep.txt"), "x").unwrap();

        let result = ReportWriter::new(dir.path()).write(&[hit()], &[], &[]);
        match result {
            Err(ProcessingError::Persist { path, .. }) => assert_eq!(path, blocked),
            other => panic!("expected Persist error, got {:?}", other),
        }

        assert_eq!(
            fs::read_to_string(dir.path().join(CLASSIFIER_RESULT_FILE)).unwrap(),
            "OLD"
        );
        assert!(!dir.path().join(FUNC_STATS_FILE).exists());
        assert!(blocked.join("keep.txt").is_file());
        // No staged temp files are left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_generate_summary() {
        let summary = ClassificationSummary {
            total_records: 10,
            top_hits: 4,
            hits_categorized: 3,
            distinct_cogs: 2,
            indexed_cogs: 4877,
            category_assignments: 5,
            distinct_categories_observed: 3,
            categories_available: 26,
            unresolved_ids: 1,
            missing_definitions: 0,
            undefined_indexed_cogs: 12,
            unsorted_queries: 0,
            group_totals: vec![(CategoryGroup::Metabolism, 5)],
        };
        let text = generate_summary(&summary, Path::new("out"));
        assert!(text.contains("categorized into COGs: 3 (of 4 top hits)"));
        assert!(text.contains("[of 4877 overall]: 2"));
        assert!(text.contains("[of 26 overall]: 3"));
        assert!(text.contains("Top hits not categorized: 1 (1 unresolved CDD ids, 0 COGs"));
        assert!(text.contains("  METABOLISM: 5"));
        assert!(!text.contains("not sorted"));
        assert!(text.ends_with("Results saved to out"));
    }
}
