//! check command - Build a manifest's graph and report every error

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde_json::json;

use super::Context;
use crate::core::graph::Graph;
use crate::manifest::Manifest;
use crate::ui::output;

/// Declare everything in the manifest, finalize, and report.
///
/// Unlike the query commands, declaration errors and dangling edges are
/// collected together so one run shows every problem.
pub fn check(ctx: &Context, path: &Path) -> Result<()> {
    let manifest = Manifest::load(path).context("Failed to load manifest")?;
    let mut graph = Graph::new();

    let mut errors = manifest.apply(&mut graph);
    errors.extend(graph.finalize());

    if ctx.json {
        let report = json!({
            "manifest": manifest.name(),
            "ok": errors.is_empty(),
            "errors": errors.iter().map(|e| e.backtrace()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::graph_errors(&errors);
    }

    if !errors.is_empty() {
        bail!("{} error(s) in {}", errors.len(), manifest.name());
    }

    if !ctx.json {
        output::print(
            format!(
                "{}: ok ({} nodes, {} edges)",
                manifest.name(),
                graph.nodes()?.len(),
                graph.edges()?.len()
            ),
            ctx.verbosity,
        );
    }
    Ok(())
}
