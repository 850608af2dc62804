//! CLI argument and user-config structures.
//!
//! Clap `Parser`/`Args`/`Subcommand` derives plus the serde structs for the
//! optional `config.json` profiles. No business logic lives here.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

pub use incmap_types::TableFormat;

/// `incmap` — layered compile-order analysis for C-like codebases.
///
/// Default mode (no subcommand) prints the dependency levels.
#[derive(Parser, Debug)]
#[command(name = "incmap", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Default options for the implicit `levels` mode (when no subcommand is provided).
    #[command(flatten)]
    pub levels: CliLevelsArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration profile to use (e.g., "ci").
    #[arg(long, global = true)]
    pub profile: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Exclude pattern(s) using gitignore syntax. Repeatable.
    #[arg(long = "exclude", value_name = "PATTERN", global = true)]
    pub excluded: Vec<String>,

    /// Include hidden files and directories.
    #[arg(long, global = true)]
    pub hidden: bool,

    /// Don't respect ignore files (.gitignore, .ignore, etc.).
    #[arg(long, global = true)]
    pub no_ignore: bool,

    /// Walk subdirectories instead of scanning only the top level.
    #[arg(short = 'r', long, global = true)]
    pub recursive: bool,

    /// Extension(s) classified as headers, without the dot. Repeatable.
    #[arg(long = "header-ext", value_name = "EXT", global = true)]
    pub header_exts: Vec<String>,

    /// Extension(s) classified as sources, without the dot. Repeatable.
    #[arg(long = "source-ext", value_name = "EXT", global = true)]
    pub source_exts: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Layered compile order with cycle diagnostics (default).
    Levels(CliLevelsArgs),

    /// Adjacency matrix and per-file dependency listing.
    Report(CliReportArgs),

    /// Write the full analysis (levels + report + file metadata) as a JSON receipt.
    Export(CliExportArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CliLevelsArgs {
    /// Directory to analyze.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,

    /// Exit with code 2 when a cycle prevents full leveling (for CI).
    #[arg(long)]
    pub deny_cycles: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CliReportArgs {
    /// Directory to analyze.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct CliExportArgs {
    /// Directory to analyze.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Output file (stdout when omitted).
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Powershell,
    Zsh,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub format: Option<String>, // "md", "tsv", "json"
    pub recursive: Option<bool>,
    pub hidden: Option<bool>,
    pub header_exts: Option<Vec<String>>,
    pub source_exts: Option<Vec<String>>,
    pub deny_cycles: Option<bool>,
}
