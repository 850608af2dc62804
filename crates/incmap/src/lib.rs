//! # incmap
//!
//! **CLI Binary**
//!
//! Entry point for the `incmap` command-line application. It orchestrates
//! the other crates: scan -> extract -> graph -> levels -> report.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Load configuration profiles
//! * Dispatch commands to the analysis pipeline
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};

use incmap_format as format;
use incmap_graph as graph;
use incmap_report as report;
use incmap_scan as scan;

use incmap_types::{
    DependencyGraph, FileMeta, FileRecord, LevelsReport, ScanArgs, TableFormat,
};

pub mod cli;
mod error_hints;

use cli::{Cli, CliExportArgs, CliLevelsArgs, CliReportArgs, Commands, GlobalArgs, Profile,
          UserConfig};

/// Render an error chain plus actionable hints for the terminal.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}

fn load_config() -> Option<UserConfig> {
    let config_dir = dirs::config_dir()?.join("incmap");
    let config_path = config_dir.join("config.json");

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&content).ok()
    } else {
        None
    }
}

pub fn resolve_profile<'a>(
    config: &'a Option<UserConfig>,
    name: Option<&String>,
) -> Option<&'a Profile> {
    config.as_ref().and_then(|c| {
        let key = name.map(|s| s.as_str()).unwrap_or("default");
        c.profiles.get(key)
    })
}

fn profile_format(profile: Option<&Profile>) -> Option<TableFormat> {
    profile
        .and_then(|p| p.format.as_deref())
        .and_then(|s| TableFormat::from_str(s, true).ok())
}

fn resolve_format(cli: Option<TableFormat>, profile: Option<&Profile>) -> TableFormat {
    cli.or_else(|| profile_format(profile)).unwrap_or_default()
}

fn resolve_path(cli: Option<&PathBuf>) -> PathBuf {
    cli.cloned().unwrap_or_else(|| PathBuf::from("."))
}

fn scan_options(global: &GlobalArgs, profile: Option<&Profile>) -> scan::ScanOptions {
    let defaults = scan::ScanOptions::default();
    scan::ScanOptions {
        recursive: global.recursive || profile.and_then(|p| p.recursive).unwrap_or(false),
        hidden: global.hidden || profile.and_then(|p| p.hidden).unwrap_or(false),
        no_ignore: global.no_ignore,
        excluded: global.excluded.clone(),
        header_exts: if global.header_exts.is_empty() {
            profile
                .and_then(|p| p.header_exts.clone())
                .unwrap_or(defaults.header_exts)
        } else {
            global.header_exts.clone()
        },
        source_exts: if global.source_exts.is_empty() {
            profile
                .and_then(|p| p.source_exts.clone())
                .unwrap_or(defaults.source_exts)
        } else {
            global.source_exts.clone()
        },
    }
}

fn make_scan_args(root: &Path, options: &scan::ScanOptions) -> ScanArgs {
    ScanArgs {
        root: root.display().to_string(),
        recursive: options.recursive,
        hidden: options.hidden,
        no_ignore: options.no_ignore,
        excluded: options.excluded.clone(),
        header_exts: options.header_exts.clone(),
        source_exts: options.source_exts.clone(),
    }
}

/// One full pipeline run over a directory snapshot. Everything after the
/// scan is pure and derived.
struct Analysis {
    scan: ScanArgs,
    warnings: Vec<String>,
    headers: Vec<FileRecord>,
    sources: Vec<FileRecord>,
    graph: DependencyGraph,
    universe: BTreeSet<String>,
    levels: LevelsReport,
}

fn analyze(root: &Path, options: &scan::ScanOptions) -> Result<Analysis> {
    let outcome = scan::scan_dir(root, options)?;
    let dep_graph = graph::build_graph(&outcome.headers, &outcome.sources);
    let universe = graph::universe(&outcome.headers, &outcome.sources);
    let leveling = graph::build_levels(&dep_graph, &universe);
    let levels = LevelsReport {
        levels: leveling.levels,
        cycle: leveling.cycle,
        files: universe.len(),
    };
    Ok(Analysis {
        scan: make_scan_args(root, options),
        warnings: outcome.warnings,
        headers: outcome.headers,
        sources: outcome.sources,
        graph: dep_graph,
        universe,
        levels,
    })
}

fn emit_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    let user_config = load_config();
    let profile = resolve_profile(&user_config, cli.profile.as_ref());

    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::Levels(cli.levels.clone()));
    match command {
        Commands::Completions(args) => {
            use clap_complete::generate;
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            let shell = match args.shell {
                cli::Shell::Bash => clap_complete::Shell::Bash,
                cli::Shell::Elvish => clap_complete::Shell::Elvish,
                cli::Shell::Fish => clap_complete::Shell::Fish,
                cli::Shell::Powershell => clap_complete::Shell::PowerShell,
                cli::Shell::Zsh => clap_complete::Shell::Zsh,
            };
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(0)
        }
        Commands::Levels(args) => run_levels(&cli.global, profile, &args),
        Commands::Report(args) => run_report(&cli.global, profile, &args),
        Commands::Export(args) => run_export(&cli.global, profile, &args),
    }
}

fn run_levels(global: &GlobalArgs, profile: Option<&Profile>, args: &CliLevelsArgs) -> Result<i32> {
    let root = resolve_path(args.path.as_ref());
    let table_format = resolve_format(args.format, profile);
    let deny_cycles = args.deny_cycles || profile.and_then(|p| p.deny_cycles).unwrap_or(false);

    let options = scan_options(global, profile);
    let analysis = analyze(&root, &options)?;

    if table_format != TableFormat::Json {
        emit_warnings(&analysis.warnings);
        if let Some(cycle) = &analysis.levels.cycle {
            eprint!("{}", format::render_cycle_diagnostic(cycle));
        }
    }
    format::print_levels(
        &analysis.levels,
        &analysis.scan,
        &analysis.warnings,
        table_format,
        deny_cycles,
    )?;

    if deny_cycles && analysis.levels.cycle.is_some() {
        return Ok(2);
    }
    Ok(0)
}

fn run_report(global: &GlobalArgs, profile: Option<&Profile>, args: &CliReportArgs) -> Result<i32> {
    let root = resolve_path(args.path.as_ref());
    let table_format = resolve_format(args.format, profile);

    let options = scan_options(global, profile);
    let analysis = analyze(&root, &options)?;
    let dep_report = report::build_report(&analysis.universe, &analysis.graph);

    if table_format != TableFormat::Json {
        emit_warnings(&analysis.warnings);
    }
    format::print_report(
        &dep_report,
        format::status_of(&analysis.levels),
        &analysis.scan,
        &analysis.warnings,
        table_format,
    )?;
    Ok(0)
}

fn run_export(global: &GlobalArgs, profile: Option<&Profile>, args: &CliExportArgs) -> Result<i32> {
    let root = resolve_path(args.path.as_ref());

    let options = scan_options(global, profile);
    let analysis = analyze(&root, &options)?;
    let dep_report = report::build_report(&analysis.universe, &analysis.graph);

    let mut files: Vec<FileMeta> = analysis
        .headers
        .iter()
        .chain(analysis.sources.iter())
        .map(|record| FileMeta {
            name: record.name.clone(),
            kind: record.kind,
            includes: record.includes.len(),
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let receipt = format::export_receipt(
        analysis.levels,
        dep_report,
        files,
        &analysis.scan,
        &analysis.warnings,
    );
    format::write_export(&receipt, args.out.as_deref())?;
    Ok(0)
}
