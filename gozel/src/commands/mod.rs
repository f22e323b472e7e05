//! Gozel command-line interface
//!
//! - `list`: show configured variants and their tasks
//! - `plan`: print the environment and command line for one variant
//! - `build`: build some or all variants

use clap::{Parser, Subcommand, ValueEnum};
use convenient_golang::{ProjectConfig, VariantSet};
use std::path::{Path, PathBuf};

pub mod build;
pub mod list;
pub mod plan;

/// Boxed error returned by every command.
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Gozel - cross-compile Go modules into native variants
#[derive(Parser)]
#[command(name = "gozel")]
#[command(about = "Cross-compile Go modules into native variants")]
#[command(version)]
pub struct Cli {
    /// Project file
    #[arg(short, long, global = true, default_value = convenient_golang::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured variants
    List,

    /// Show the toolchain invocation for a variant without running it
    Plan {
        /// Variant name
        variant: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
    },

    /// Build variants (all of them when none are named)
    Build {
        /// Variant names
        variants: Vec<String>,

        /// Number of variants built in parallel
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

/// Output format of `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
}

/// Load the project file and register its variants.
pub async fn load_project(path: &Path) -> CommandResult<(ProjectConfig, VariantSet)> {
    let config = ProjectConfig::load(path).await?;
    let set = config.variant_set()?;
    Ok((config, set))
}
