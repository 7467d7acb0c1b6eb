//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cfgraph - Build and query declarative configuration graphs
#[derive(Parser, Debug)]
#[command(name = "cfgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a manifest's graph and report every declaration error
    #[command(
        long_about = "Build a manifest's graph and report every declaration error.\n\n\
            All nodes and edges are declared, then the graph is finalized. Every \
            problem found along the way (redeclarations, cycles, edges to undeclared \
            nodes) is printed with the manifest entry it came from.",
        after_help = "\
EXAMPLES:
    cfgraph check services.toml
    cfgraph --json check services.toml"
    )]
    Check {
        /// Manifest file
        manifest: PathBuf,
    },

    /// List every node reachable from a root
    Walk {
        /// Manifest file
        manifest: PathBuf,

        /// Root key, written kind:id/kind:id
        root: String,

        /// Child order: key, ~key, def, ~def
        #[arg(long)]
        order: Option<String>,

        /// Traversal topology: breadth or depth
        #[arg(long)]
        topology: Option<String>,
    },

    /// List the children of a node
    Children {
        /// Manifest file
        manifest: PathBuf,

        /// Node key, written kind:id/kind:id
        key: String,

        /// Order: key, ~key, def, ~def
        #[arg(long)]
        order: Option<String>,
    },

    /// List the parents of a node
    Parents {
        /// Manifest file
        manifest: PathBuf,

        /// Node key, written kind:id/kind:id
        key: String,

        /// Order: key, ~key, def, ~def
        #[arg(long)]
        order: Option<String>,
    },

    /// Print the finalized graph as JSON
    Export {
        /// Manifest file
        manifest: PathBuf,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
