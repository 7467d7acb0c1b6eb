//! core::error
//!
//! Errors reported by the graph engine.
//!
//! # Propagation
//!
//! Every error is returned as a value from the call that detected it.
//! `finalize` collects all dangling-edge errors in one pass; cycle and
//! redeclaration errors stop the offending call immediately.
//!
//! Errors that stem from a declaration carry the provenance [`Trace`] of that
//! declaration. [`GraphError::backtrace`] renders it together with the
//! message for the embedding runtime.

use std::fmt;

use thiserror::Error;

use super::graph::Edge;
use super::key::Key;
use super::trace::Trace;

/// Error type a traversal visitor may return.
pub type VisitError = Box<dyn std::error::Error + Send + Sync>;

/// Which end of an edge is undeclared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Parent,
    Child,
    Both,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Parent => f.write_str("parent"),
            Endpoint::Child => f.write_str("child"),
            Endpoint::Both => f.write_str("parent and child"),
        }
    }
}

/// Errors from graph construction and queries.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph is finalized and can no longer be modified")]
    Finalized,

    #[error("graph is not finalized yet")]
    NotFinalized,

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("{argument} key {key} belongs to a different graph")]
    ForeignKey { argument: String, key: Key },

    #[error("properties of {key} have non-string key {found}")]
    InvalidPropertyKey { key: Key, found: String },

    #[error("properties of {key} must be a dict, got {found}")]
    InvalidPropertyBag { key: Key, found: &'static str },

    #[error("node {key} is already declared")]
    NodeRedeclaration {
        key: Key,
        trace: Trace,
        previous_trace: Trace,
    },

    #[error("edge {edge} would create a cycle: {}", describe_path(.edge, .path))]
    Cycle { edge: Edge, path: Vec<Edge> },

    #[error("edge {edge} references undeclared {undeclared} node")]
    DanglingEdge { edge: Edge, undeclared: Endpoint },

    #[error("invalid order '{0}', expected one of: key, ~key, def, ~def")]
    InvalidOrder(String),

    #[error("invalid topology '{0}', expected one of: breadth, depth")]
    InvalidTopology(String),

    #[error("visitor at {node} returned {returned}, which is not one of its children")]
    VisitorContractViolation { node: Key, returned: Key },

    #[error("visitor failed at {node}: {source}")]
    Visitor { node: Key, source: VisitError },
}

impl GraphError {
    /// Provenance of the declaration this error is about, if any.
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            GraphError::NodeRedeclaration { trace, .. } => Some(trace),
            GraphError::Cycle { edge, .. } | GraphError::DanglingEdge { edge, .. } => {
                Some(edge.trace())
            }
            _ => None,
        }
    }

    /// Render the error with its provenance for display to a user.
    ///
    /// # Example
    ///
    /// ```
    /// use cfgraph::core::error::GraphError;
    ///
    /// let err = GraphError::Finalized;
    /// assert_eq!(err.backtrace(), "error: graph is finalized and can no longer be modified");
    /// ```
    pub fn backtrace(&self) -> String {
        let mut out = String::new();
        if let Some(trace) = self.trace().filter(|t| !t.is_none()) {
            out.push_str(&format!("{trace}\n"));
        }
        out.push_str(&format!("error: {self}"));
        if let GraphError::NodeRedeclaration { previous_trace, .. } = self {
            out.push_str(&format!("\nnote: first declared at {previous_trace}"));
        }
        out
    }
}

/// Render the cycle `parent -> child -> ... -> parent` closed by `edge`.
fn describe_path(edge: &Edge, path: &[Edge]) -> String {
    let mut hops = vec![edge.parent().to_string(), edge.child().to_string()];
    hops.extend(path.iter().map(|e| e.child().to_string()));
    hops.join(" -> ")
}

/// A failed [`freeze`](crate::core::graph::Graph::freeze): every error
/// `finalize` reported, to be treated as fatal by the caller.
#[derive(Debug, Error)]
#[error("graph failed to finalize with {} error(s):\n{}", .errors.len(), list_errors(.errors))]
pub struct FreezeError {
    pub errors: Vec<GraphError>,
}

fn list_errors(errors: &[GraphError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
