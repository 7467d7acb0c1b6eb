//! core::export
//!
//! Serializable snapshot of a finalized graph for artifact generators.
//!
//! # Example
//!
//! ```
//! use cfgraph::core::export::GraphDocument;
//! use cfgraph::core::graph::Graph;
//! use cfgraph::core::trace::Trace;
//! use cfgraph::core::value::Value;
//!
//! let mut graph = Graph::new();
//! let api = graph.key(&["service", "api"]).unwrap();
//! graph
//!     .add_node(&api, Value::dict([("port", 8080)]), false, Trace::none())
//!     .unwrap();
//! assert!(graph.finalize().is_empty());
//!
//! let doc = GraphDocument::from_graph(&graph).unwrap();
//! let json = serde_json::to_string(&doc).unwrap();
//! assert!(json.contains(r#""key":"service:api""#));
//! ```

use serde::Serialize;

use super::error::GraphError;
use super::graph::Graph;
use super::value::PropertyBag;

/// All declared nodes and edges, each in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeDocument>,
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDocument {
    /// Rendered key, `kind:id/kind:id`
    pub key: String,
    /// Key as `[kind, id]` pairs
    pub path: Vec<(String, String)>,
    pub index: u64,
    pub idempotent: bool,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeDocument {
    pub parent: String,
    pub child: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GraphDocument {
    /// Snapshot `graph`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NotFinalized` if the graph is still under
    /// construction.
    pub fn from_graph(graph: &Graph) -> Result<Self, GraphError> {
        let nodes = graph
            .nodes()?
            .into_iter()
            .map(|node| NodeDocument {
                key: node.key().to_string(),
                path: node.key().pairs().to_vec(),
                index: node.declaration_index().unwrap_or_default(),
                idempotent: node.idempotent(),
                properties: node.properties().cloned().unwrap_or_default(),
            })
            .collect();

        let edges = graph
            .edges()?
            .iter()
            .map(|edge| EdgeDocument {
                parent: edge.parent().to_string(),
                child: edge.child().to_string(),
                title: edge.title().map(str::to_string),
            })
            .collect();

        Ok(Self { nodes, edges })
    }
}
