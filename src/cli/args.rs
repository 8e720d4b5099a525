//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// buildreq - Reconcile and check build requirements.
#[derive(Debug, Parser)]
#[command(name = "buildreq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides buildreq.yml in the project root)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides discovery from the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Declare only these modules (comma-separated)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print requested data and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The `--modules` selection, if any was given.
    pub fn module_selection(&self) -> Option<&[String]> {
        if self.modules.is_empty() {
            None
        } else {
            Some(&self.modules)
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show every requirement (default if no command specified)
    Show(ShowArgs),

    /// Check requirements against the installed tools
    Check,

    /// Show the effective version of a package or a whole language
    Version(VersionArgs),

    /// List packages pinned to an exact version
    Pinned(PinnedArgs),

    /// List packages needed at runtime
    Runtime(PartitionArgs),

    /// List packages needed only while building
    BuildOnly(PartitionArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `version` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VersionArgs {
    /// Language (e.g. python, cpp)
    pub language: String,

    /// Package (all packages of the language when omitted)
    pub package: Option<String>,

    /// Show each origin's declaration instead of the merged version
    #[arg(long)]
    pub all_origins: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `pinned` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PinnedArgs {
    /// Limit to one language
    pub language: Option<String>,
}

/// Arguments for the `runtime` and `build-only` commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PartitionArgs {
    /// Limit to one language
    pub language: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
