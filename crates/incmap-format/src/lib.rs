//! # incmap-format
//!
//! **Tier 3 (Formatting)**
//!
//! Rendering and serialization of incmap results. Supports Markdown tables,
//! TSV, and single-line JSON receipts.
//!
//! ## What belongs here
//! * Markdown/TSV template rendering
//! * Receipt construction and JSON serialization
//! * Output file writing
//!
//! ## What does NOT belong here
//! * Graph or report computation
//! * CLI arg parsing

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use incmap_types::{
    AnalysisStatus, CycleReport, DepReport, ExportReceipt, FileMeta, LevelsArgsMeta, LevelsReceipt,
    LevelsReport, ReportArgsMeta, ReportReceipt, SCHEMA_VERSION, ScanArgs, TableFormat, ToolInfo,
};

pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

pub fn status_of(report: &LevelsReport) -> AnalysisStatus {
    if report.cycle.is_some() {
        AnalysisStatus::Cyclic
    } else {
        AnalysisStatus::Complete
    }
}

// -------------------
// Levels output
// -------------------

pub fn print_levels(
    report: &LevelsReport,
    scan: &ScanArgs,
    warnings: &[String],
    format: TableFormat,
    deny_cycles: bool,
) -> Result<()> {
    match format {
        TableFormat::Md => print!("{}", render_levels_md(report)),
        TableFormat::Tsv => print!("{}", render_levels_tsv(report)),
        TableFormat::Json => {
            let receipt = levels_receipt(report.clone(), scan, warnings, format, deny_cycles);
            println!("{}", serde_json::to_string(&receipt)?);
        }
    }
    Ok(())
}

pub fn levels_receipt(
    report: LevelsReport,
    scan: &ScanArgs,
    warnings: &[String],
    format: TableFormat,
    deny_cycles: bool,
) -> LevelsReceipt {
    LevelsReceipt {
        schema_version: SCHEMA_VERSION,
        generated_at_ms: now_ms(),
        tool: ToolInfo::current(),
        mode: "levels".to_string(),
        status: status_of(&report),
        warnings: warnings.to_vec(),
        scan: scan.clone(),
        args: LevelsArgsMeta {
            format: format.as_str().to_string(),
            deny_cycles,
        },
        report,
    }
}

pub fn render_levels_md(report: &LevelsReport) -> String {
    let mut s = String::new();
    s.push_str("|Level|Count|Files|\n");
    s.push_str("|---:|---:|---|\n");
    for (depth, level) in report.levels.iter().enumerate() {
        s.push_str(&format!("|{}|{}|{}|\n", depth, level.len(), level.join(", ")));
    }
    s.push_str(&format!("|**Total**|{}||\n", report.files));
    if let Some(cycle) = &report.cycle {
        s.push('\n');
        s.push_str(&format!(
            "**Unresolved ({} file(s) in a cycle):** {}\n",
            cycle.remaining.len(),
            cycle
                .remaining
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    s
}

pub fn render_levels_tsv(report: &LevelsReport) -> String {
    let mut s = String::new();
    s.push_str("Level\tCount\tFiles\n");
    for (depth, level) in report.levels.iter().enumerate() {
        s.push_str(&format!("{}\t{}\t{}\n", depth, level.len(), level.join(",")));
    }
    if let Some(cycle) = &report.cycle {
        s.push_str(&format!(
            "unresolved\t{}\t{}\n",
            cycle.remaining.len(),
            cycle
                .remaining
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(",")
        ));
    }
    s
}

/// Human diagnostic block for stderr when leveling stalls.
pub fn render_cycle_diagnostic(cycle: &CycleReport) -> String {
    let mut s = format!(
        "warning: circular dependency detected; {} file(s) could not be leveled\n",
        cycle.remaining.len()
    );
    for (name, blocking) in &cycle.blocked_edges {
        s.push_str(&format!(
            "  {} -> {}\n",
            name,
            blocking.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    s
}

// -------------------
// Dependency report output
// -------------------

pub fn print_report(
    report: &DepReport,
    status: AnalysisStatus,
    scan: &ScanArgs,
    warnings: &[String],
    format: TableFormat,
) -> Result<()> {
    match format {
        TableFormat::Md => print!("{}", render_report_md(report)),
        TableFormat::Tsv => print!("{}", render_report_tsv(report)),
        TableFormat::Json => {
            let receipt = report_receipt(report.clone(), status, scan, warnings, format);
            println!("{}", serde_json::to_string(&receipt)?);
        }
    }
    Ok(())
}

pub fn report_receipt(
    report: DepReport,
    status: AnalysisStatus,
    scan: &ScanArgs,
    warnings: &[String],
    format: TableFormat,
) -> ReportReceipt {
    ReportReceipt {
        schema_version: SCHEMA_VERSION,
        generated_at_ms: now_ms(),
        tool: ToolInfo::current(),
        mode: "report".to_string(),
        status,
        warnings: warnings.to_vec(),
        scan: scan.clone(),
        args: ReportArgsMeta {
            format: format.as_str().to_string(),
        },
        report,
    }
}

pub fn render_report_md(report: &DepReport) -> String {
    let mut s = String::new();

    s.push_str("|File|Depends on|\n");
    s.push_str("|---|---|\n");
    for row in &report.listing {
        s.push_str(&format!("|{}|{}|\n", row.name, row.deps.join(", ")));
    }

    if !report.index.is_empty() {
        s.push('\n');
        s.push_str(&format!("|Matrix|{}|\n", report.index.join("|")));
        s.push_str("|---|");
        for _ in &report.index {
            s.push_str("---:|");
        }
        s.push('\n');
        for (file, row) in report.index.iter().zip(&report.matrix) {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            s.push_str(&format!("|{}|{}|\n", file, cells.join("|")));
        }
    }

    s
}

pub fn render_report_tsv(report: &DepReport) -> String {
    let mut s = String::new();
    s.push_str("File\tDeps\n");
    for row in &report.listing {
        s.push_str(&format!("{}\t{}\n", row.name, row.deps.join(",")));
    }
    s.push('\n');
    s.push_str(&format!("Matrix\t{}\n", report.index.join("\t")));
    for (file, row) in report.index.iter().zip(&report.matrix) {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        s.push_str(&format!("{}\t{}\n", file, cells.join("\t")));
    }
    s
}

// -------------------
// Export output
// -------------------

pub fn export_receipt(
    levels: LevelsReport,
    report: DepReport,
    files: Vec<FileMeta>,
    scan: &ScanArgs,
    warnings: &[String],
) -> ExportReceipt {
    ExportReceipt {
        schema_version: SCHEMA_VERSION,
        generated_at_ms: now_ms(),
        tool: ToolInfo::current(),
        mode: "export".to_string(),
        status: status_of(&levels),
        warnings: warnings.to_vec(),
        scan: scan.clone(),
        levels,
        report,
        files,
    }
}

/// Write the export receipt to `out`, or stdout when no path is given.
pub fn write_export(receipt: &ExportReceipt, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, receipt)?;
            writeln!(&mut writer)?;
            writer.flush()?;
        }
        None => {
            println!("{}", serde_json::to_string(receipt)?);
        }
    }
    Ok(())
}
