//! core::graph::node
//!
//! Node and edge records, and the borrowed [`NodeRef`] handle.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use super::Graph;
use crate::core::key::Key;
use crate::core::trace::Trace;
use crate::core::value::PropertyBag;

/// Index of a node in its graph's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

/// What `add_node` recorded for a node.
#[derive(Debug)]
pub(crate) struct Declaration {
    pub(crate) properties: PropertyBag,
    pub(crate) idempotent: bool,
    pub(crate) index: u64,
    pub(crate) trace: Trace,
}

/// A node table entry. Exists from the first reference onwards; declared
/// once `declaration` is set.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) key: Key,
    pub(crate) declaration: Option<Declaration>,
    /// Outgoing edges, as indices into the graph's edge list.
    pub(crate) children: Vec<usize>,
    /// Incoming edges.
    pub(crate) parents: Vec<usize>,
}

impl NodeData {
    pub(crate) fn new(key: Key) -> Self {
        Self {
            key,
            declaration: None,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub(crate) fn is_declared(&self) -> bool {
        self.declaration.is_some()
    }
}

/// A directed, optionally titled relation between two nodes.
///
/// Edges are immutable once recorded.
#[derive(Debug, Clone)]
pub struct Edge {
    parent: Key,
    child: Key,
    title: Option<String>,
    trace: Trace,
    pub(crate) parent_id: NodeId,
    pub(crate) child_id: NodeId,
}

impl Edge {
    pub(crate) fn new(
        parent: (Key, NodeId),
        child: (Key, NodeId),
        title: Option<String>,
        trace: Trace,
    ) -> Self {
        Self {
            parent: parent.0,
            child: child.0,
            title,
            trace,
            parent_id: parent.1,
            child_id: child.1,
        }
    }

    pub fn parent(&self) -> &Key {
        &self.parent
    }

    pub fn child(&self) -> &Key {
        &self.child
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub(crate) fn matches(&self, child: NodeId, title: Option<&str>) -> bool {
        self.child_id == child && self.title.as_deref() == title
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.parent, self.child)?;
        if let Some(title) = &self.title {
            write!(f, " [{title}]")?;
        }
        Ok(())
    }
}

/// A borrowed handle to a node of a [`Graph`].
///
/// Two handles are equal when they point at the same node of the same graph.
#[derive(Clone, Copy)]
pub struct NodeRef<'g> {
    pub(crate) graph: &'g Graph,
    pub(crate) id: NodeId,
}

impl<'g> NodeRef<'g> {
    pub(crate) fn new(graph: &'g Graph, id: NodeId) -> Self {
        Self { graph, id }
    }

    fn data(&self) -> &'g NodeData {
        &self.graph.nodes[self.id.0]
    }

    pub(crate) fn belongs_to(&self, graph: &Graph) -> bool {
        ptr::eq(self.graph, graph)
    }

    pub fn key(&self) -> &'g Key {
        &self.data().key
    }

    /// Whether `add_node` has been called for this node.
    pub fn declared(&self) -> bool {
        self.data().is_declared()
    }

    pub fn properties(&self) -> Option<&'g PropertyBag> {
        self.data().declaration.as_ref().map(|d| &d.properties)
    }

    pub fn idempotent(&self) -> bool {
        self.data()
            .declaration
            .as_ref()
            .is_some_and(|d| d.idempotent)
    }

    /// Position of this node in declaration order.
    pub fn declaration_index(&self) -> Option<u64> {
        self.data().declaration.as_ref().map(|d| d.index)
    }

    pub fn trace(&self) -> Option<&'g Trace> {
        self.data().declaration.as_ref().map(|d| &d.trace)
    }

    /// Children in edge declaration order. The returned list is a copy.
    pub fn children(&self) -> Vec<NodeRef<'g>> {
        self.data()
            .children
            .iter()
            .map(|&e| NodeRef::new(self.graph, self.graph.edges[e].child_id))
            .collect()
    }

    /// Parents in edge declaration order. The returned list is a copy.
    pub fn parents(&self) -> Vec<NodeRef<'g>> {
        self.data()
            .parents
            .iter()
            .map(|&e| NodeRef::new(self.graph, self.graph.edges[e].parent_id))
            .collect()
    }

    pub fn child_edges(&self) -> Vec<&'g Edge> {
        self.data()
            .children
            .iter()
            .map(|&e| &self.graph.edges[e])
            .collect()
    }

    pub fn parent_edges(&self) -> Vec<&'g Edge> {
        self.data()
            .parents
            .iter()
            .map(|&e| &self.graph.edges[e])
            .collect()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.graph as *const Graph as usize).hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.key(), f)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({})", self.key())
    }
}
