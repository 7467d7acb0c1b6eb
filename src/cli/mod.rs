//! cli
//!
//! Command-line interface layer for cfgraph.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Load configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Manifests are replayed into a [`crate::core::graph::Graph`],
//! and all graph rules are enforced there.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};
use commands::Context;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CFGRAPH_LOG";

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let loaded = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }

    let ctx = Context {
        json: cli.json || loaded.config.json_output(),
        config: loaded.config,
        verbosity,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Log to stderr, filtered by `$CFGRAPH_LOG` (default `warn`).
/// `--debug` forces debug output for this crate.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cfgraph=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
