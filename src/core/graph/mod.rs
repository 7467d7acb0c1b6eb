//! core::graph
//!
//! The declaration graph: construction, finalization, and queries.
//!
//! # Architecture
//!
//! The graph is a DAG where:
//! - Nodes are identified by interned [`Key`]s
//! - Edges point from parent to child and may carry a title
//! - Nodes come into existence when first referenced, and become
//!   *declared* once `add_node` gives them properties and a trace
//!
//! # Lifecycle
//!
//! A graph starts under construction. [`Graph::add_node`] and
//! [`Graph::add_edge`] may be called in any order and interleaving.
//! [`Graph::finalize`] then checks that every edge endpoint is declared and,
//! if so, freezes the graph. After that only the query API (see [`query`])
//! is available.
//!
//! # Invariants
//!
//! - Graph is acyclic at all times (checked on every `add_edge`)
//! - A finalized graph has no edge touching an undeclared node
//! - Re-declaring an identical edge is a no-op; the first trace wins
//!
//! # Example
//!
//! ```
//! use cfgraph::core::graph::Graph;
//! use cfgraph::core::order::Order;
//! use cfgraph::core::trace::Trace;
//! use cfgraph::core::value::Value;
//!
//! let mut graph = Graph::new();
//! let a = graph.key(&["service", "a"]).unwrap();
//! let b = graph.key(&["service", "b"]).unwrap();
//!
//! graph.add_edge(&a, &b, None, Trace::none()).unwrap();
//! graph.add_node(&a, Value::Null, false, Trace::none()).unwrap();
//! assert_eq!(graph.finalize().len(), 1); // b is not declared yet
//!
//! graph.add_node(&b, Value::Null, false, Trace::none()).unwrap();
//! assert!(graph.finalize().is_empty());
//!
//! let children = graph.children(&a, Order::Def).unwrap();
//! assert_eq!(children[0].key(), &b);
//! ```

mod node;
pub mod query;

pub use node::{Edge, NodeRef};
pub(crate) use node::{Declaration, NodeData, NodeId};

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use super::error::{Endpoint, FreezeError, GraphError};
use super::key::{Key, KeySet};
use super::trace::Trace;
use super::value::{PropertyBag, PropertyError, Value};

/// A graph of declared configuration entities.
#[derive(Debug, Default)]
pub struct Graph {
    keys: KeySet,
    nodes: Vec<NodeData>,
    index: HashMap<Key, NodeId>,
    /// All edges in declaration order.
    edges: Vec<Edge>,
    next_index: u64,
    finalized: bool,
}

impl Graph {
    /// Create an empty graph under construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a key in this graph's key set.
    ///
    /// Keys may be created at any time, including after finalization.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidKey` if `parts` is empty or odd-length.
    pub fn key<S: AsRef<str>>(&mut self, parts: &[S]) -> Result<Key, GraphError> {
        self.keys.intern(parts)
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_declared()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Declare the node at `key`.
    ///
    /// `properties` must be a string-keyed dict (or null for no properties).
    /// Re-declaring a node succeeds only if both declarations are idempotent
    /// and carry equal properties; the first declaration's index and trace
    /// are kept.
    ///
    /// # Errors
    ///
    /// - `GraphError::Finalized` if the graph is finalized
    /// - `GraphError::ForeignKey` if `key` belongs to another graph
    /// - `GraphError::InvalidPropertyKey` / `InvalidPropertyBag` for bad properties
    /// - `GraphError::NodeRedeclaration` if the node is already declared
    pub fn add_node(
        &mut self,
        key: &Key,
        properties: Value,
        idempotent: bool,
        trace: Trace,
    ) -> Result<(), GraphError> {
        if self.finalized {
            return Err(GraphError::Finalized);
        }
        self.keys.check("node", key)?;
        let properties = PropertyBag::from_value(properties).map_err(|err| match err {
            PropertyError::NonStringKey(found) => GraphError::InvalidPropertyKey {
                key: key.clone(),
                found,
            },
            PropertyError::NotADict(found) => GraphError::InvalidPropertyBag {
                key: key.clone(),
                found,
            },
        })?;

        let id = self.ensure_node(key);
        let node = &mut self.nodes[id.0];
        match &node.declaration {
            None => {
                let index = self.next_index;
                self.next_index += 1;
                node.declaration = Some(Declaration {
                    properties,
                    idempotent,
                    index,
                    trace,
                });
                debug!(%key, index, idempotent, "declared node");
                Ok(())
            }
            Some(previous)
                if previous.idempotent && idempotent && previous.properties == properties =>
            {
                debug!(%key, "idempotent node redeclared");
                Ok(())
            }
            Some(previous) => Err(GraphError::NodeRedeclaration {
                key: key.clone(),
                trace,
                previous_trace: previous.trace.clone(),
            }),
        }
    }

    /// Declare an edge from `parent` to `child`.
    ///
    /// Either endpoint may still be undeclared; it must be declared before
    /// [`finalize`](Self::finalize) succeeds. Adding an edge identical in
    /// parent, child, and title to an existing one is a no-op.
    ///
    /// # Errors
    ///
    /// - `GraphError::Finalized` if the graph is finalized
    /// - `GraphError::ForeignKey` if either key belongs to another graph
    /// - `GraphError::Cycle` if the edge would close a cycle; the graph is
    ///   left unchanged
    pub fn add_edge(
        &mut self,
        parent: &Key,
        child: &Key,
        title: Option<&str>,
        trace: Trace,
    ) -> Result<(), GraphError> {
        if self.finalized {
            return Err(GraphError::Finalized);
        }
        self.keys.check("parent", parent)?;
        self.keys.check("child", child)?;

        if parent == child {
            // The rejected edge is never recorded, so its endpoint id may
            // point past the node table.
            let id = self
                .index
                .get(parent)
                .copied()
                .unwrap_or(NodeId(self.nodes.len()));
            return Err(GraphError::Cycle {
                edge: Edge::new(
                    (parent.clone(), id),
                    (child.clone(), id),
                    title.map(str::to_string),
                    trace,
                ),
                path: Vec::new(),
            });
        }

        // A fresh endpoint cannot close a cycle, so creating entries here
        // leaves a rejected edge without side effects.
        let p = self.ensure_node(parent);
        let c = self.ensure_node(child);

        if self.nodes[p.0]
            .children
            .iter()
            .any(|&e| self.edges[e].matches(c, title))
        {
            debug!(%parent, %child, ?title, "duplicate edge ignored");
            return Ok(());
        }

        let edge = Edge::new(
            (parent.clone(), p),
            (child.clone(), c),
            title.map(str::to_string),
            trace,
        );

        self.visit_descendants(c, |node, path| {
            if node == p {
                Err(GraphError::Cycle {
                    edge: edge.clone(),
                    path: path.iter().map(|&e| self.edges[e].clone()).collect(),
                })
            } else {
                Ok(())
            }
        })?;

        let position = self.edges.len();
        self.edges.push(edge);
        self.nodes[p.0].children.push(position);
        self.nodes[c.0].parents.push(position);
        debug!(%parent, %child, ?title, "declared edge");
        Ok(())
    }

    /// Check that every edge joins two declared nodes and, if so, freeze
    /// the graph.
    ///
    /// Returns one `GraphError::DanglingEdge` per offending edge. On any
    /// error the graph stays under construction so missing nodes can be
    /// declared and `finalize` called again. Finalizing a finalized graph
    /// is a no-op.
    pub fn finalize(&mut self) -> Vec<GraphError> {
        if self.finalized {
            return Vec::new();
        }

        let errors: Vec<GraphError> = self
            .edges
            .iter()
            .filter_map(|edge| {
                let parent = self.nodes[edge.parent_id.0].is_declared();
                let child = self.nodes[edge.child_id.0].is_declared();
                let undeclared = match (parent, child) {
                    (true, true) => return None,
                    (false, true) => Endpoint::Parent,
                    (true, false) => Endpoint::Child,
                    (false, false) => Endpoint::Both,
                };
                Some(GraphError::DanglingEdge {
                    edge: edge.clone(),
                    undeclared,
                })
            })
            .collect();

        if errors.is_empty() {
            self.finalized = true;
            info!(
                nodes = self.nodes.len(),
                edges = self.edges.len(),
                "graph finalized"
            );
        } else {
            warn!(dangling = errors.len(), "graph finalize failed");
        }
        errors
    }

    /// Like [`finalize`](Self::finalize), but reports failure as a single
    /// fatal error for callers that cannot retry.
    ///
    /// # Errors
    ///
    /// Returns `FreezeError` holding every error `finalize` produced.
    pub fn freeze(&mut self) -> Result<(), FreezeError> {
        let errors = self.finalize();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FreezeError { errors })
        }
    }

    /// Look up the node table entry for `key`, creating an undeclared one
    /// if absent.
    fn ensure_node(&mut self, key: &Key) -> NodeId {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(key.clone()));
        self.index.insert(key.clone(), id);
        id
    }

    /// Depth-first walk over every node reachable from `start` (excluding
    /// `start` itself). `visit` receives each node together with the edge
    /// path that led to it; an error stops the walk immediately.
    fn visit_descendants<F>(&self, start: NodeId, mut visit: F) -> Result<(), GraphError>
    where
        F: FnMut(NodeId, &[usize]) -> Result<(), GraphError>,
    {
        let mut seen = HashSet::new();
        // `path[i]` is the edge that entered `stack[i + 1]`.
        let mut path: Vec<usize> = Vec::new();
        // Each frame holds a node and the position of its next outgoing edge.
        let mut stack = vec![(start, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let Some(&edge) = self.nodes[frame.0 .0].children.get(frame.1) else {
                stack.pop();
                path.pop();
                continue;
            };
            frame.1 += 1;

            let child = self.edges[edge].child_id;
            if !seen.insert(child) {
                continue;
            }
            path.push(edge);
            visit(child, &path)?;
            stack.push((child, 0));
        }
        Ok(())
    }
}
