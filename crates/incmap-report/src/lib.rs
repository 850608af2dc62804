//! # incmap-report
//!
//! **Tier 2 (Analysis)**
//!
//! Read-only report generation over the raw dependency graph: a boolean
//! adjacency matrix indexed by the sorted universe, plus a per-file
//! dependency listing.
//!
//! The matrix deliberately consumes the *raw* per-file sets. Edges to files
//! outside the universe never surface because the column index only ranges
//! over universe members; filtering the stored map instead would change the
//! matrix semantics.
//!
//! ## What belongs here
//! * Matrix and listing construction
//!
//! ## What does NOT belong here
//! * Leveling (use incmap-graph)
//! * Rendering/printing (use incmap-format)

#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use incmap_types::{DepReport, DependencyGraph, ListingRow};

/// The universe as a stable, lexicographically sorted index.
pub fn sorted_universe(universe: &BTreeSet<String>) -> Vec<String> {
    universe.iter().cloned().collect()
}

/// Square boolean matrix: `matrix[i][j] == 1` iff `index[j]` is in the raw
/// dependency set of `index[i]`.
pub fn adjacency_matrix(index: &[String], graph: &DependencyGraph) -> Vec<Vec<u8>> {
    index
        .iter()
        .map(|file| {
            let deps = graph.get(file);
            index
                .iter()
                .map(|target| match deps {
                    Some(deps) if deps.contains(target) => 1,
                    _ => 0,
                })
                .collect()
        })
        .collect()
}

/// One row per file with at least one recorded dependency, raw targets
/// sorted. Files whose raw set is empty (or absent) are omitted.
pub fn dependency_listing(index: &[String], graph: &DependencyGraph) -> Vec<ListingRow> {
    index
        .iter()
        .filter_map(|file| {
            let deps = graph.get(file)?;
            if deps.is_empty() {
                return None;
            }
            Some(ListingRow {
                name: file.clone(),
                deps: deps.iter().cloned().collect(),
            })
        })
        .collect()
}

/// Build the full dependency report in one pass.
pub fn build_report(universe: &BTreeSet<String>, graph: &DependencyGraph) -> DepReport {
    let index = sorted_universe(universe);
    let matrix = adjacency_matrix(&index, graph);
    let listing = dependency_listing(&index, graph);
    DepReport {
        index,
        matrix,
        listing,
    }
}
