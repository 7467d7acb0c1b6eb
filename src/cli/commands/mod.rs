//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the manifest and builds a finalized graph
//! 2. Runs one graph query
//! 3. Formats and displays output
//!
//! Handlers never bypass the graph API.

mod check;
mod completion;
mod config_cmd;
mod export;
mod relationships;
mod walk;

// Re-export command functions for testing and direct invocation
pub use check::check;
pub use completion::completion;
pub use config_cmd::show as config_show;
pub use export::export;
pub use relationships::{children, parents};
pub use walk::walk;

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::core::graph::Graph;
use crate::core::key::Key;
use crate::core::order::{Order, Topology};
use crate::manifest::Manifest;
use crate::ui::output::{self, Verbosity};

/// Everything a handler needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub verbosity: Verbosity,
    pub json: bool,
}

impl Context {
    /// Resolve an `--order` flag against the configured default.
    pub fn order(&self, flag: Option<&str>) -> Result<Order> {
        match flag {
            Some(s) => Ok(s.parse()?),
            None => Ok(self.config.order()),
        }
    }

    /// Resolve a `--topology` flag against the configured default.
    pub fn topology(&self, flag: Option<&str>) -> Result<Topology> {
        match flag {
            Some(s) => Ok(s.parse()?),
            None => Ok(self.config.topology()),
        }
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Check { manifest } => check::check(ctx, &manifest),
        Command::Walk {
            manifest,
            root,
            order,
            topology,
        } => walk::walk(
            ctx,
            &manifest,
            &root,
            order.as_deref(),
            topology.as_deref(),
        ),
        Command::Children {
            manifest,
            key,
            order,
        } => relationships::children(ctx, &manifest, &key, order.as_deref()),
        Command::Parents {
            manifest,
            key,
            order,
        } => relationships::parents(ctx, &manifest, &key, order.as_deref()),
        Command::Export { manifest } => export::export(ctx, &manifest),
        Command::Config => config_cmd::show(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load a manifest and build its graph, failing hard on any error.
pub(crate) fn build_graph(path: &Path) -> Result<Graph> {
    let manifest = Manifest::load(path).context("Failed to load manifest")?;
    let mut graph = Graph::new();

    let errors = manifest.apply(&mut graph);
    if !errors.is_empty() {
        output::graph_errors(&errors);
        bail!(
            "{} declaration error(s) in {}",
            errors.len(),
            manifest.name()
        );
    }

    if let Err(err) = graph.freeze() {
        output::graph_errors(&err.errors);
        return Err(err).context(format!("Failed to finalize {}", manifest.name()));
    }
    Ok(graph)
}

/// Parse a `kind:id/kind:id` argument into a key of `graph`.
pub(crate) fn parse_key(graph: &mut Graph, text: &str) -> Result<Key> {
    let parts = Key::parse_path(text).with_context(|| format!("Invalid key '{text}'"))?;
    Ok(graph.key(&parts)?)
}
