//! Frequency statistics over classified hits.
//!
//! Two independent aggregations: per (COG, gene function) over the
//! classified hits, and per functional category over the expanded
//! category tokens. Both return rows in a canonical order so that output is
//! reproducible across runs.

use crate::bio::category::CategoryGroup;
use crate::bio::cog::ClassifiedHit;
use crate::database::CategoryTable;
use crate::pipeline::expand::CategoryToken;
use itertools::Itertools;
use log::warn;
use std::cmp::Reverse;

/// Hit count of one (COG, gene function) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CogFrequency {
    pub cog_id: String,
    pub gene_function: String,
    pub frequency: usize,
}

/// Assignment count of one functional category.
///
/// `letter` is `None` for hits whose COG carries no class letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFrequency {
    pub letter: Option<char>,
    pub description: String,
    pub frequency: usize,
}

/// Counts hits per (cog_id, gene_function).
///
/// Sorted by frequency descending, then COG id and gene function.
pub fn cog_frequencies(hits: &[ClassifiedHit]) -> Vec<CogFrequency> {
    hits.iter()
        .map(|h| (h.cog_id.as_str(), h.gene_function.as_str()))
        .counts()
        .into_iter()
        .map(|((cog_id, gene_function), frequency)| CogFrequency {
            cog_id: cog_id.to_string(),
            gene_function: gene_function.to_string(),
            frequency,
        })
        .sorted_by(|a, b| {
            (Reverse(a.frequency), &a.cog_id, &a.gene_function)
                .cmp(&(Reverse(b.frequency), &b.cog_id, &b.gene_function))
        })
        .collect()
}

/// Counts category tokens per letter, outer-joined with the category table.
///
/// Every category of the table appears, with zero when unobserved. Letters
/// observed but absent from the table get an empty description. Rows are
/// sorted by letter, with the class-less row (if any) first.
pub fn category_frequencies(
    tokens: &[CategoryToken],
    categories: &CategoryTable,
) -> Vec<CategoryFrequency> {
    let mut counts = tokens.iter().copied().counts();
    for letter in categories.letters() {
        counts.entry(Some(letter)).or_insert(0);
    }

    let unknown: Vec<char> = counts
        .keys()
        .filter_map(|token| *token)
        .filter(|letter| categories.description(*letter).is_none())
        .sorted()
        .collect();
    if !unknown.is_empty() {
        warn!(
            "Category letters without a description: {}",
            unknown.iter().join(", ")
        );
    }

    counts
        .into_iter()
        .map(|(letter, frequency)| CategoryFrequency {
            letter,
            description: letter
                .and_then(|l| categories.description(l))
                .unwrap_or_default()
                .to_string(),
            frequency,
        })
        .sorted_by_key(|row| row.letter)
        .collect()
}

/// Sums category assignments per super-group, in group display order.
pub fn group_totals(frequencies: &[CategoryFrequency]) -> Vec<(CategoryGroup, usize)> {
    CategoryGroup::all_groups()
        .into_iter()
        .map(|group| {
            let total = frequencies
                .iter()
                .filter(|row| row.letter.and_then(CategoryGroup::of) == Some(group))
                .map(|row| row.frequency)
                .sum();
            (group, total)
        })
        .collect()
}
