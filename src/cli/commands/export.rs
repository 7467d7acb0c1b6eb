//! export command - Print the finalized graph as JSON

use std::path::Path;

use anyhow::Result;

use super::{build_graph, Context};
use crate::core::export::GraphDocument;

/// Export is always JSON; `--json` makes no difference.
pub fn export(_ctx: &Context, manifest: &Path) -> Result<()> {
    let graph = build_graph(manifest)?;
    let document = GraphDocument::from_graph(&graph)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
