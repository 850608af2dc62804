//! # incmap-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures and contracts for `incmap`.
//! It contains only data types, Serde definitions, and `SCHEMA_VERSION`.
//!
//! ## Stability Policy
//!
//! **JSON-first stability**: the primary contract is the JSON receipt schema,
//! not Rust struct literals. New fields get sensible defaults; removed or
//! renamed fields bump `SCHEMA_VERSION`.
//!
//! ## What belongs here
//! * Pure data structs (records, reports, receipts)
//! * Serialization/Deserialization logic
//! * Stability markers (SCHEMA_VERSION)
//!
//! ## What does NOT belong here
//! * File I/O
//! * CLI argument parsing
//! * Graph or extraction logic

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The current schema version for all receipt types.
pub const SCHEMA_VERSION: u32 = 1;

/// Raw dependency map: file name to the set of include targets extracted
/// from it. Values may name files outside the scanned universe; consumers
/// filter at lookup time and never mutate the stored sets.
pub type DependencyGraph = BTreeMap<String, BTreeSet<String>>;

/// Which kind-group a scanned file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Header,
    Source,
}

/// One scanned file: its basename, kind, ordered include targets (duplicates
/// retained), and its raw text. Immutable after the scan phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub kind: FileKind,
    pub includes: Vec<String>,
    pub content: String,
}

/// Produced when leveling halts before exhausting the universe.
///
/// `remaining` is the unleveled subset, copied verbatim; `blocked_edges`
/// maps each still-blocked file to the dependencies holding it back
/// (restricted to `remaining`, entries with no blocking edge omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub remaining: BTreeSet<String>,
    pub blocked_edges: BTreeMap<String, BTreeSet<String>>,
}

/// Ordered dependency levels plus the optional cycle diagnostic.
///
/// When `cycle` is `None`, the concatenation of `levels` covers the scanned
/// universe exactly once and every file's in-project dependencies sit in
/// strictly earlier levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelsReport {
    pub levels: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleReport>,
    /// Size of the scanned universe (headers + sources).
    pub files: usize,
}

/// One row of the per-file dependency listing: raw include targets, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub name: String,
    pub deps: Vec<String>,
}

/// Adjacency matrix over the sorted universe plus the dependency listing.
///
/// `matrix[i][j] == 1` iff `index[j]` is in the raw dependency set of
/// `index[i]`. Rows without any recorded dependency are omitted from
/// `listing` but still present in the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepReport {
    pub index: Vec<String>,
    pub matrix: Vec<Vec<u8>>,
    pub listing: Vec<ListingRow>,
}

/// Terminal state of an analysis run. Cyclic is a valid completion mode,
/// not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Complete,
    Cyclic,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "incmap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Echo of the scan configuration, embedded in every receipt so results
/// stay reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanArgs {
    pub root: String,
    pub recursive: bool,
    pub hidden: bool,
    pub no_ignore: bool,
    pub excluded: Vec<String>,
    pub header_exts: Vec<String>,
    pub source_exts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelsArgsMeta {
    pub format: String,
    pub deny_cycles: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelsReceipt {
    pub schema_version: u32,
    pub generated_at_ms: u128,
    pub tool: ToolInfo,
    pub mode: String, // "levels"
    pub status: AnalysisStatus,
    pub warnings: Vec<String>,
    pub scan: ScanArgs,
    pub args: LevelsArgsMeta,
    #[serde(flatten)]
    pub report: LevelsReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArgsMeta {
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportReceipt {
    pub schema_version: u32,
    pub generated_at_ms: u128,
    pub tool: ToolInfo,
    pub mode: String, // "report"
    pub status: AnalysisStatus,
    pub warnings: Vec<String>,
    pub scan: ScanArgs,
    pub args: ReportArgsMeta,
    #[serde(flatten)]
    pub report: DepReport,
}

/// Per-file metadata carried in export receipts. Content stays opaque and
/// is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub kind: FileKind,
    pub includes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReceipt {
    pub schema_version: u32,
    pub generated_at_ms: u128,
    pub tool: ToolInfo,
    pub mode: String, // "export"
    pub status: AnalysisStatus,
    pub warnings: Vec<String>,
    pub scan: ScanArgs,
    pub levels: LevelsReport,
    pub report: DepReport,
    pub files: Vec<FileMeta>,
}

// -----------------------------------------------------------------------------
// Enums shared with the CLI
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum TableFormat {
    /// Markdown table (great for pasting into chat or a PR).
    #[default]
    Md,
    /// Tab-separated values (good for piping to other tools).
    Tsv,
    /// JSON receipt (compact, one line).
    Json,
}

impl TableFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TableFormat::Md => "md",
            TableFormat::Tsv => "tsv",
            TableFormat::Json => "json",
        }
    }
}
