//! # incmap-scan
//!
//! **Tier 2 (Adapter)**
//!
//! Filesystem traversal and file reading for incmap. This is the only crate
//! that touches the disk; it hands the core a collection of
//! `{name, raw text}` records and stays out of the graph logic.
//!
//! ## What belongs here
//! * Directory walking with gitignore support
//! * Header/source suffix classification
//! * Encoding-fallback text reading and per-file read warnings
//!
//! ## What does NOT belong here
//! * Graph assembly or leveling (use incmap-graph)
//! * Output formatting (use incmap-format)

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use incmap_extract::extract_includes;
use incmap_types::{FileKind, FileRecord};

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Walk subdirectories. Off by default: the flat top-level scan is the
    /// reference behavior.
    pub recursive: bool,
    /// Include hidden files and directories.
    pub hidden: bool,
    /// Don't respect ignore files (.gitignore, .ignore, etc.).
    pub no_ignore: bool,
    /// Exclude pattern(s) using gitignore syntax.
    pub excluded: Vec<String>,
    /// Extensions classified as headers (without the dot).
    pub header_exts: Vec<String>,
    /// Extensions classified as sources (without the dot).
    pub source_exts: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            hidden: false,
            no_ignore: false,
            excluded: vec![],
            header_exts: vec!["h".to_string()],
            source_exts: vec!["c".to_string()],
        }
    }
}

/// Scan result: records per kind-group plus non-fatal diagnostics. A file
/// that cannot be read produces a warning and is left out of both groups,
/// so it never enters the universe.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub headers: Vec<FileRecord>,
    pub sources: Vec<FileRecord>,
    pub warnings: Vec<String>,
}

/// Walk `root`, classify files by suffix, and build extracted records.
///
/// Records are keyed by basename within each kind-group; with identical
/// basenames the later walk entry wins. Output is sorted by name.
pub fn scan_dir(root: &Path, options: &ScanOptions) -> Result<ScanOutcome> {
    if !root.exists() {
        anyhow::bail!("Path not found: {}", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut builder = WalkBuilder::new(root);
    builder.hidden(!options.hidden);
    builder.follow_links(false);
    if !options.recursive {
        builder.max_depth(Some(1));
    }
    if options.no_ignore {
        builder.ignore(false);
        builder.git_ignore(false);
        builder.git_exclude(false);
        builder.git_global(false);
        builder.parents(false);
    }
    if !options.excluded.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in &options.excluded {
            overrides
                .add(&format!("!{pattern}"))
                .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
        }
        builder.overrides(overrides.build().context("Failed to build exclude set")?);
    }

    let mut headers: BTreeMap<String, FileRecord> = BTreeMap::new();
    let mut sources: BTreeMap<String, FileRecord> = BTreeMap::new();
    let mut warnings = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warnings.push(format!("walk error: {err}"));
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let Some(kind) = classify(path, options) else {
            continue;
        };
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                warnings.push(format!("skipping non-UTF-8 file name: {}", path.display()));
                continue;
            }
        };

        let content = match read_text(path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("failed to read {}: {err:#}", path.display()));
                continue;
            }
        };
        let includes = extract_includes(&content);

        let record = FileRecord {
            name: name.clone(),
            kind,
            includes,
            content,
        };
        match kind {
            FileKind::Header => headers.insert(name, record),
            FileKind::Source => sources.insert(name, record),
        };
    }

    Ok(ScanOutcome {
        headers: headers.into_values().collect(),
        sources: sources.into_values().collect(),
        warnings,
    })
}

fn classify(path: &Path, options: &ScanOptions) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?;
    if options.header_exts.iter().any(|e| e == ext) {
        Some(FileKind::Header)
    } else if options.source_exts.iter().any(|e| e == ext) {
        Some(FileKind::Source)
    } else {
        None
    }
}

/// Read a file as text: strict UTF-8 first, Latin-1 as the fallback. Only
/// the underlying I/O read can fail; Latin-1 maps every byte to the
/// matching code point, so decoding itself always succeeds.
fn read_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}
