//! COG assignment and definition join.
//!
//! Hits are first annotated with the COG accession their subject resolves
//! to, then inner-joined against the COG definitions. Hits lost in the join
//! are not errors, but every one of them is accounted for in the outcome.

use crate::bio::cog::{AlignmentHit, ClassifiedHit};
use crate::database::{CddIndex, CogDefinitions};
use log::{debug, info, warn};

/// A top hit together with the COG accession it resolved to, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedHit {
    pub hit: AlignmentHit,
    pub cog_id: Option<String>,
}

/// Annotates every hit with its COG accession.
///
/// The lookup key is the accession part of the subject id (`CDD:12345` ->
/// `12345`). Unresolved hits are kept, with no COG, in input order.
pub fn assign_cogs(hits: Vec<AlignmentHit>, index: &CddIndex) -> Vec<AnnotatedHit> {
    let annotated: Vec<AnnotatedHit> = hits
        .into_iter()
        .map(|hit| {
            let cog_id = index
                .resolve(&hit.subject_id.accession)
                .map(str::to_string);
            AnnotatedHit { hit, cog_id }
        })
        .collect();

    let resolved = annotated.iter().filter(|a| a.cog_id.is_some()).count();
    info!(
        "Resolved {} of {} top hits to a COG accession",
        resolved,
        annotated.len()
    );
    annotated
}

/// Why a hit did not survive the definition join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The subject's CDD id is not a COG entry in the index.
    UnresolvedId,
    /// The COG accession has no row in the definition table.
    MissingDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedHit {
    pub query_id: String,
    pub subject_id: String,
    pub cog_id: Option<String>,
    pub reason: DropReason,
}

/// Result of the definition join, with row counts before and after.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    pub classified: Vec<ClassifiedHit>,
    pub dropped: Vec<DroppedHit>,
    pub rows_before: usize,
}

impl JoinOutcome {
    pub fn rows_after(&self) -> usize {
        self.classified.len()
    }

    pub fn unresolved_ids(&self) -> usize {
        self.count_dropped(DropReason::UnresolvedId)
    }

    pub fn missing_definitions(&self) -> usize {
        self.count_dropped(DropReason::MissingDefinition)
    }

    fn count_dropped(&self, reason: DropReason) -> usize {
        self.dropped.iter().filter(|d| d.reason == reason).count()
    }
}

/// Inner-joins annotated hits with COG definitions on the COG accession.
///
/// Row order of the surviving hits follows the input.
pub fn join_definitions(
    annotated: Vec<AnnotatedHit>,
    definitions: &CogDefinitions,
) -> JoinOutcome {
    let mut outcome = JoinOutcome {
        rows_before: annotated.len(),
        ..Default::default()
    };

    for AnnotatedHit { hit, cog_id } in annotated {
        let definition = cog_id.as_deref().and_then(|id| definitions.get(id));
        match (cog_id, definition) {
            (Some(cog_id), Some(def)) => outcome.classified.push(ClassifiedHit {
                query_id: hit.query_id,
                subject_id: hit.subject_id,
                percent_identity: hit.percent_identity,
                e_value: hit.e_value,
                cog_id,
                class_codes: def.class_codes.clone(),
                gene_function: def.gene_function.clone(),
                gene_name: def.gene_name.clone(),
            }),
            (cog_id, _) => {
                let reason = if cog_id.is_some() {
                    DropReason::MissingDefinition
                } else {
                    DropReason::UnresolvedId
                };
                let dropped = DroppedHit {
                    query_id: hit.query_id,
                    subject_id: hit.subject_id.to_string(),
                    cog_id,
                    reason,
                };
                debug!(
                    "Dropping hit {} -> {} (COG {}, {:?})",
                    dropped.query_id,
                    dropped.subject_id,
                    dropped.cog_id.as_deref().unwrap_or("-"),
                    dropped.reason
                );
                outcome.dropped.push(dropped);
            }
        }
    }

    info!(
        "Definition join kept {} of {} hits",
        outcome.rows_after(),
        outcome.rows_before
    );
    if !outcome.dropped.is_empty() {
        warn!(
            "{} hits dropped: {} without a COG mapping, {} with a COG lacking a definition",
            outcome.dropped.len(),
            outcome.unresolved_ids(),
            outcome.missing_definitions()
        );
    }
    outcome
}
