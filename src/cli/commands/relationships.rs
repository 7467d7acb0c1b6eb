//! children and parents commands - List the direct relatives of a node

use std::path::Path;

use anyhow::Result;

use super::{build_graph, parse_key, Context};
use crate::core::graph::NodeRef;
use crate::ui::output;

/// Print the children of `key`.
pub fn children(ctx: &Context, manifest: &Path, key: &str, order: Option<&str>) -> Result<()> {
    let order = ctx.order(order)?;
    let mut graph = build_graph(manifest)?;
    let key = parse_key(&mut graph, key)?;
    show(ctx, &graph.children(&key, order)?)
}

/// Print the parents of `key`.
pub fn parents(ctx: &Context, manifest: &Path, key: &str, order: Option<&str>) -> Result<()> {
    let order = ctx.order(order)?;
    let mut graph = build_graph(manifest)?;
    let key = parse_key(&mut graph, key)?;
    show(ctx, &graph.parents(&key, order)?)
}

fn show(ctx: &Context, nodes: &[NodeRef<'_>]) -> Result<()> {
    if ctx.json {
        println!("{}", output::nodes_json(nodes)?);
    } else if !nodes.is_empty() {
        output::print(output::format_nodes(nodes), ctx.verbosity);
    }
    Ok(())
}
