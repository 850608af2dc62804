//! # incmap-graph
//!
//! **Tier 1 (Core Algorithm)**
//!
//! Dependency-graph assembly and iterative topological leveling.
//!
//! ## What belongs here
//! * Universe construction from scanned records
//! * Raw include-target set aggregation
//! * Level building with deterministic tie-breaking and cycle detection
//!
//! ## What does NOT belong here
//! * File I/O (use incmap-scan)
//! * Directive parsing (use incmap-extract)
//! * Output formatting (use incmap-format)

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use incmap_types::{CycleReport, DependencyGraph, FileRecord};

/// The set union of all header and source names. Restricts graph edges to
/// in-project dependencies at consumption time.
pub fn universe(headers: &[FileRecord], sources: &[FileRecord]) -> BTreeSet<String> {
    headers
        .iter()
        .chain(sources.iter())
        .map(|record| record.name.clone())
        .collect()
}

/// Collapse each record's ordered include targets into a raw dependency set.
///
/// Keys are exactly the scanned file names, including files with no
/// includes. Self-loops and targets outside the universe are recorded
/// verbatim; filtering is the consumer's job and the stored sets are never
/// mutated afterwards.
pub fn build_graph(headers: &[FileRecord], sources: &[FileRecord]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for record in headers.iter().chain(sources.iter()) {
        graph.insert(
            record.name.clone(),
            record.includes.iter().cloned().collect(),
        );
    }
    graph
}

/// Result of one leveling run: the levels placed so far and, when the run
/// stalled, the cycle diagnostic. A stall is a normal completion mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelingOutcome {
    pub levels: Vec<Vec<String>>,
    pub cycle: Option<CycleReport>,
}

/// Build ordered dependency levels by iteratively removing satisfied files.
///
/// Each pass collects `ready`, the remaining files whose in-universe
/// dependencies are all placed in earlier levels, appends it as the next
/// level (lexicographically ordered), and subtracts it from `remaining`.
/// When no file is ready but some remain, the run halts with a
/// [`CycleReport`] covering the unleveled subset. Terminates in at most
/// `universe.len()` passes since `remaining` strictly shrinks otherwise.
///
/// The ready set is recomputed from scratch every pass. That literal
/// re-intersection is the reference behavior validated by the property
/// tests; in-degree bookkeeping would obscure it for no measurable win at
/// this workload size.
pub fn build_levels(graph: &DependencyGraph, universe: &BTreeSet<String>) -> LevelingOutcome {
    let mut remaining: BTreeSet<String> = universe.clone();
    let mut levels: Vec<Vec<String>> = Vec::new();

    while !remaining.is_empty() {
        // BTreeSet iteration is already lexicographic, so `ready` comes out
        // in the deterministic level order.
        let ready: Vec<String> = remaining
            .iter()
            .filter(|name| blocking_deps(graph, name, &remaining).is_empty())
            .cloned()
            .collect();

        if ready.is_empty() {
            let mut blocked_edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
            for name in &remaining {
                let blocking = blocking_deps(graph, name, &remaining);
                if !blocking.is_empty() {
                    blocked_edges.insert(name.clone(), blocking);
                }
            }
            return LevelingOutcome {
                levels,
                cycle: Some(CycleReport {
                    remaining,
                    blocked_edges,
                }),
            };
        }

        for name in &ready {
            remaining.remove(name);
        }
        levels.push(ready);
    }

    LevelingOutcome {
        levels,
        cycle: None,
    }
}

/// Dependencies of `name` that are still unplaced. `remaining` is a subset
/// of the universe, so intersecting with it also applies the in-project
/// filter required by the raw map's contract.
fn blocking_deps(
    graph: &DependencyGraph,
    name: &str,
    remaining: &BTreeSet<String>,
) -> BTreeSet<String> {
    graph
        .get(name)
        .map(|deps| {
            deps.iter()
                .filter(|dep| remaining.contains(*dep))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use incmap_types::FileKind;

    fn header(name: &str, includes: &[&str]) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            kind: FileKind::Header,
            includes: includes.iter().map(|s| s.to_string()).collect(),
            content: String::new(),
        }
    }

    fn levels_of(records: &[FileRecord]) -> LevelingOutcome {
        let graph = build_graph(records, &[]);
        let uni = universe(records, &[]);
        build_levels(&graph, &uni)
    }

    #[test]
    fn empty_universe_yields_no_levels() {
        let outcome = levels_of(&[]);
        assert!(outcome.levels.is_empty());
        assert!(outcome.cycle.is_none());
    }

    #[test]
    fn linear_chain() {
        let records = vec![
            header("x.h", &[]),
            header("y.h", &["x.h"]),
            header("z.h", &["y.h"]),
        ];
        let outcome = levels_of(&records);
        assert_eq!(outcome.levels, vec![vec!["x.h"], vec!["y.h"], vec!["z.h"]]);
        assert!(outcome.cycle.is_none());
    }

    #[test]
    fn diamond_co_occurs_lexicographically() {
        let records = vec![
            header("a.h", &[]),
            header("b.h", &["a.h"]),
            header("c.h", &["a.h"]),
            header("d.h", &["b.h", "c.h"]),
        ];
        let outcome = levels_of(&records);
        assert_eq!(
            outcome.levels,
            vec![vec!["a.h"], vec!["b.h", "c.h"], vec!["d.h"]]
        );
        assert!(outcome.cycle.is_none());
    }

    #[test]
    fn two_node_cycle_produces_zero_levels() {
        let records = vec![header("a.h", &["b.h"]), header("b.h", &["a.h"])];
        let outcome = levels_of(&records);
        assert!(outcome.levels.is_empty());

        let cycle = outcome.cycle.expect("cycle expected");
        let expected: BTreeSet<String> = ["a.h", "b.h"].iter().map(|s| s.to_string()).collect();
        assert_eq!(cycle.remaining, expected);
        assert_eq!(
            cycle.blocked_edges["a.h"],
            BTreeSet::from(["b.h".to_string()])
        );
        assert_eq!(
            cycle.blocked_edges["b.h"],
            BTreeSet::from(["a.h".to_string()])
        );
    }

    #[test]
    fn self_loop_is_a_trivial_cycle() {
        let records = vec![header("loop.h", &["loop.h"])];
        let outcome = levels_of(&records);
        assert!(outcome.levels.is_empty());

        let cycle = outcome.cycle.expect("cycle expected");
        assert!(cycle.remaining.contains("loop.h"));
        assert_eq!(
            cycle.blocked_edges["loop.h"],
            BTreeSet::from(["loop.h".to_string()])
        );
    }

    #[test]
    fn cycle_after_partial_leveling() {
        // base.h resolves, then a/b deadlock each other.
        let records = vec![
            header("base.h", &[]),
            header("a.h", &["base.h", "b.h"]),
            header("b.h", &["a.h"]),
        ];
        let outcome = levels_of(&records);
        assert_eq!(outcome.levels, vec![vec!["base.h"]]);

        let cycle = outcome.cycle.expect("cycle expected");
        let expected: BTreeSet<String> = ["a.h", "b.h"].iter().map(|s| s.to_string()).collect();
        assert_eq!(cycle.remaining, expected);
        // base.h is already placed, so it never shows up as a blocking edge.
        assert_eq!(
            cycle.blocked_edges["a.h"],
            BTreeSet::from(["b.h".to_string()])
        );
    }

    #[test]
    fn out_of_universe_targets_are_ignored_at_lookup() {
        let records = vec![header("a.h", &["external.h"]), header("b.h", &["a.h"])];
        let outcome = levels_of(&records);
        assert_eq!(outcome.levels, vec![vec!["a.h"], vec!["b.h"]]);
        assert!(outcome.cycle.is_none());
    }

    #[test]
    fn raw_graph_retains_foreign_targets() {
        let records = vec![header("a.h", &["external.h", "a.h"])];
        let graph = build_graph(&records, &[]);
        // The stored set keeps everything verbatim, self-loop included.
        assert!(graph["a.h"].contains("external.h"));
        assert!(graph["a.h"].contains("a.h"));
    }

    #[test]
    fn graph_keys_cover_includeless_files() {
        let records = vec![header("lonely.h", &[])];
        let graph = build_graph(&records, &[]);
        assert!(graph["lonely.h"].is_empty());
    }

    #[test]
    fn duplicate_includes_collapse_in_the_set() {
        let records = vec![header("a.h", &["b.h", "b.h", "b.h"]), header("b.h", &[])];
        let graph = build_graph(&records, &[]);
        assert_eq!(graph["a.h"].len(), 1);
    }

    #[test]
    fn headers_and_sources_share_one_universe() {
        let headers = vec![header("api.h", &[])];
        let sources = vec![FileRecord {
            name: "api.c".to_string(),
            kind: FileKind::Source,
            includes: vec!["api.h".to_string()],
            content: String::new(),
        }];
        let uni = universe(&headers, &sources);
        assert_eq!(uni.len(), 2);

        let graph = build_graph(&headers, &sources);
        let outcome = build_levels(&graph, &uni);
        assert_eq!(outcome.levels, vec![vec!["api.h"], vec!["api.c"]]);
    }

    #[test]
    fn leveling_is_deterministic() {
        let records = vec![
            header("m.h", &[]),
            header("z.h", &["m.h"]),
            header("a.h", &["m.h"]),
            header("q.h", &["a.h", "z.h"]),
        ];
        let first = levels_of(&records);
        let second = levels_of(&records);
        assert_eq!(first, second);
        assert_eq!(first.levels[1], vec!["a.h", "z.h"]);
    }
}
