//! walk command - List every node reachable from a root

use std::path::Path;

use anyhow::Result;

use super::{build_graph, parse_key, Context};
use crate::ui::output;

/// Print the descendants of `root`, root included.
pub fn walk(
    ctx: &Context,
    manifest: &Path,
    root: &str,
    order: Option<&str>,
    topology: Option<&str>,
) -> Result<()> {
    let order = ctx.order(order)?;
    let topology = ctx.topology(topology)?;

    let mut graph = build_graph(manifest)?;
    let root = parse_key(&mut graph, root)?;
    let nodes = graph.descendants(&root, order, topology)?;

    if ctx.json {
        println!("{}", output::nodes_json(&nodes)?);
    } else if nodes.is_empty() {
        output::warn(format!("no node declared at {root}"), ctx.verbosity);
    } else {
        output::print(output::format_nodes(&nodes), ctx.verbosity);
    }
    Ok(())
}
