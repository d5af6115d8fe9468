//! Per-disease grouping of a flat forecast response.
//!
//! The API returns one row per (disease, date). The view shows one card per
//! disease, so rows are partitioned by disease name. Groups appear in the
//! order their disease is first seen and rows keep their relative order
//! inside each group; nothing is sorted, filtered or deduplicated.

use std::collections::HashMap;

use crate::model::{DiseaseGroup, ForecastEntry};

/// Partitions `entries` into disease groups.
///
/// Every entry lands in exactly one group. An empty input yields no groups.
/// Empty or unrecognized disease names are grouped like any other name.
pub fn group_by_disease(entries: &[ForecastEntry]) -> Vec<DiseaseGroup<'_>> {
    let mut groups: Vec<DiseaseGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let slot = *index.entry(entry.disease.as_str()).or_insert_with(|| {
            groups.push(DiseaseGroup {
                disease: entry.disease.as_str(),
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(entry);
    }

    groups
}

/// Number of entries across all groups.
pub fn total_entries(groups: &[DiseaseGroup<'_>]) -> usize {
    groups.iter().map(|g| g.entries.len()).sum()
}

/// Disease names in group order.
pub fn disease_names<'a>(groups: &[DiseaseGroup<'a>]) -> Vec<&'a str> {
    groups.iter().map(|g| g.disease).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
