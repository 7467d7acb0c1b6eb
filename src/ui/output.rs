//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, output is machine-readable JSON.

use std::fmt::Display;

use serde::Serialize;

use crate::core::error::GraphError;
use crate::core::graph::NodeRef;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print graph errors with their provenance, one block per error.
pub fn graph_errors(errors: &[GraphError]) {
    for err in errors {
        eprintln!("{}\n", err.backtrace());
    }
}

/// A node as shown in JSON listings.
#[derive(Debug, Serialize)]
pub struct NodeSummary<'a> {
    pub key: String,
    pub index: Option<u64>,
    pub properties: Option<&'a crate::core::value::PropertyBag>,
}

impl<'a> From<&NodeRef<'a>> for NodeSummary<'a> {
    fn from(node: &NodeRef<'a>) -> Self {
        Self {
            key: node.key().to_string(),
            index: node.declaration_index(),
            properties: node.properties(),
        }
    }
}

/// Format a list of nodes, one key per line.
pub fn format_nodes(nodes: &[NodeRef<'_>]) -> String {
    format_list(nodes, "")
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render nodes as a pretty JSON array.
pub fn nodes_json(nodes: &[NodeRef<'_>]) -> serde_json::Result<String> {
    let summaries: Vec<NodeSummary<'_>> = nodes.iter().map(NodeSummary::from).collect();
    serde_json::to_string_pretty(&summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Graph;
    use crate::core::trace::Trace;
    use crate::core::value::Value;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn formats_nodes_as_lines_and_json() {
        let mut graph = Graph::new();
        let a = graph.key(&["svc", "a"]).unwrap();
        let b = graph.key(&["svc", "b"]).unwrap();
        graph
            .add_node(&a, Value::dict([("port", 1)]), false, Trace::none())
            .unwrap();
        graph.add_node(&b, Value::Null, false, Trace::none()).unwrap();
        assert!(graph.finalize().is_empty());

        let nodes = graph.nodes().unwrap();
        assert_eq!(format_nodes(&nodes), "svc:a\nsvc:b");

        let json: serde_json::Value = serde_json::from_str(&nodes_json(&nodes).unwrap()).unwrap();
        assert_eq!(json[0]["key"], "svc:a");
        assert_eq!(json[0]["properties"]["port"], 1);
        assert_eq!(json[1]["index"], 1);
    }
}
