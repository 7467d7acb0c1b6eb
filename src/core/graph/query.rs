//! core::graph::query
//!
//! Read-only queries over a finalized [`Graph`].
//!
//! Every query fails with `GraphError::NotFinalized` until
//! [`Graph::finalize`] has succeeded, and with `GraphError::ForeignKey` when
//! handed a key (or node) from another graph. A key with no declared node is
//! not an error: lookups return `None` and listings return an empty list.
//!
//! # Traversal
//!
//! [`Graph::descendants`] walks everything reachable from a root:
//!
//! - [`Topology::Breadth`] emits nodes as they leave the queue, root first
//! - [`Topology::Depth`] emits each node after all of its children, root last
//!
//! At every node the children are ordered by the requested [`Order`] and, in
//! [`Graph::descendants_with`], handed to a visitor that chooses which of
//! them to follow. Nodes already visited are skipped.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::{Edge, Graph, NodeId, NodeRef};
use crate::core::error::{GraphError, VisitError};
use crate::core::key::Key;
use crate::core::order::{Order, Topology};

type Visitor<'v, 'g> =
    dyn FnMut(NodeRef<'g>, Vec<NodeRef<'g>>) -> Result<Vec<NodeRef<'g>>, VisitError> + 'v;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Children,
    Parents,
}

impl Graph {
    /// The declared node at `key`, if any.
    pub fn node(&self, key: &Key) -> Result<Option<NodeRef<'_>>, GraphError> {
        self.ensure_finalized()?;
        self.keys.check("node", key)?;
        Ok(self.lookup(key).map(|id| NodeRef::new(self, id)))
    }

    /// Declared nodes in declaration order.
    pub fn nodes(&self) -> Result<Vec<NodeRef<'_>>, GraphError> {
        self.ensure_finalized()?;
        let mut nodes: Vec<NodeRef<'_>> = (0..self.nodes.len())
            .map(|i| NodeRef::new(self, NodeId(i)))
            .filter(NodeRef::declared)
            .collect();
        nodes.sort_by_key(NodeRef::declaration_index);
        Ok(nodes)
    }

    /// All edges in declaration order.
    pub fn edges(&self) -> Result<&[Edge], GraphError> {
        self.ensure_finalized()?;
        Ok(&self.edges)
    }

    /// Children of the node at `parent`, ordered by `order`.
    ///
    /// `Order::Def` follows the order the edges to each child were declared.
    pub fn children(&self, parent: &Key, order: Order) -> Result<Vec<NodeRef<'_>>, GraphError> {
        self.relatives(parent, "parent", Direction::Children, order)
    }

    /// Parents of the node at `child`, ordered by `order`.
    pub fn parents(&self, child: &Key, order: Order) -> Result<Vec<NodeRef<'_>>, GraphError> {
        self.relatives(child, "child", Direction::Parents, order)
    }

    /// Every node reachable from `root` (including `root`), in the order
    /// produced by `topology`.
    ///
    /// # Example
    ///
    /// ```
    /// use cfgraph::core::graph::Graph;
    /// use cfgraph::core::order::{Order, Topology};
    /// use cfgraph::core::trace::Trace;
    /// use cfgraph::core::value::Value;
    ///
    /// let mut graph = Graph::new();
    /// let root = graph.key(&["app", "root"]).unwrap();
    /// let x = graph.key(&["app", "x"]).unwrap();
    /// let y = graph.key(&["app", "y"]).unwrap();
    /// let z = graph.key(&["app", "z"]).unwrap();
    /// for key in [&root, &x, &y, &z] {
    ///     graph.add_node(key, Value::Null, false, Trace::none()).unwrap();
    /// }
    /// graph.add_edge(&root, &x, None, Trace::none()).unwrap();
    /// graph.add_edge(&root, &y, None, Trace::none()).unwrap();
    /// graph.add_edge(&x, &z, None, Trace::none()).unwrap();
    /// assert!(graph.finalize().is_empty());
    ///
    /// let bfs: Vec<&str> = graph
    ///     .descendants(&root, Order::Def, Topology::Breadth)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|n| n.key().id())
    ///     .collect();
    /// assert_eq!(bfs, ["root", "x", "y", "z"]);
    ///
    /// let dfs: Vec<&str> = graph
    ///     .descendants(&root, Order::Def, Topology::Depth)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|n| n.key().id())
    ///     .collect();
    /// assert_eq!(dfs, ["z", "x", "y", "root"]);
    /// ```
    pub fn descendants(
        &self,
        root: &Key,
        order: Order,
        topology: Topology,
    ) -> Result<Vec<NodeRef<'_>>, GraphError> {
        self.traverse(root, order, topology, None)
    }

    /// Like [`descendants`](Self::descendants), but at every node the
    /// visitor receives the node and its ordered children and returns the
    /// children to follow.
    ///
    /// # Errors
    ///
    /// - `GraphError::VisitorContractViolation` if the visitor returns a
    ///   node that is not a child of the node being visited
    /// - `GraphError::Visitor` if the visitor itself fails
    pub fn descendants_with<'g, F>(
        &'g self,
        root: &Key,
        order: Order,
        topology: Topology,
        mut visitor: F,
    ) -> Result<Vec<NodeRef<'g>>, GraphError>
    where
        F: FnMut(NodeRef<'g>, Vec<NodeRef<'g>>) -> Result<Vec<NodeRef<'g>>, VisitError>,
    {
        let visitor: &mut Visitor<'_, 'g> = &mut visitor;
        self.traverse(root, order, topology, Some(visitor))
    }

    /// Sort `nodes` in place.
    ///
    /// `Order::Def` sorts by node declaration index, which is not the same
    /// as the edge order used by [`children`](Self::children).
    ///
    /// # Errors
    ///
    /// Returns `GraphError::ForeignKey` naming the first node that does not
    /// belong to this graph.
    pub fn sort_nodes(&self, nodes: &mut [NodeRef<'_>], order: Order) -> Result<(), GraphError> {
        self.ensure_finalized()?;
        if let Some((i, node)) = nodes.iter().enumerate().find(|(_, n)| !n.belongs_to(self)) {
            return Err(GraphError::ForeignKey {
                argument: format!("nodes[{i}]"),
                key: node.key().clone(),
            });
        }
        match order {
            Order::Key => nodes.sort_by(|a, b| a.key().cmp(b.key())),
            Order::KeyDesc => nodes.sort_by(|a, b| b.key().cmp(a.key())),
            Order::Def => nodes.sort_by_key(|n| n.declaration_index()),
            Order::DefDesc => nodes.sort_by(|a, b| b.declaration_index().cmp(&a.declaration_index())),
        }
        Ok(())
    }

    fn ensure_finalized(&self) -> Result<(), GraphError> {
        if self.finalized {
            Ok(())
        } else {
            Err(GraphError::NotFinalized)
        }
    }

    /// Id of the declared node at `key`.
    fn lookup(&self, key: &Key) -> Option<NodeId> {
        self.index
            .get(key)
            .copied()
            .filter(|id| self.nodes[id.0].is_declared())
    }

    fn relatives(
        &self,
        key: &Key,
        argument: &str,
        direction: Direction,
        order: Order,
    ) -> Result<Vec<NodeRef<'_>>, GraphError> {
        self.ensure_finalized()?;
        self.keys.check(argument, key)?;
        Ok(match self.lookup(key) {
            Some(id) => self.ordered_relatives(id, direction, order),
            None => Vec::new(),
        })
    }

    fn ordered_relatives(&self, id: NodeId, direction: Direction, order: Order) -> Vec<NodeRef<'_>> {
        let node = NodeRef::new(self, id);
        let mut relatives = match direction {
            Direction::Children => node.children(),
            Direction::Parents => node.parents(),
        };
        match order {
            Order::Key => relatives.sort_by(|a, b| a.key().cmp(b.key())),
            Order::KeyDesc => relatives.sort_by(|a, b| b.key().cmp(a.key())),
            Order::Def => {}
            Order::DefDesc => relatives.reverse(),
        }
        relatives
    }

    fn traverse<'g>(
        &'g self,
        root: &Key,
        order: Order,
        topology: Topology,
        visitor: Option<&mut Visitor<'_, 'g>>,
    ) -> Result<Vec<NodeRef<'g>>, GraphError> {
        self.ensure_finalized()?;
        self.keys.check("root", root)?;
        let Some(root_id) = self.lookup(root) else {
            return Ok(Vec::new());
        };

        let mut walk = Walk {
            graph: self,
            order,
            visitor,
            visited: HashSet::new(),
            out: Vec::new(),
        };
        match topology {
            Topology::Breadth => walk.breadth_first(root_id)?,
            Topology::Depth => walk.depth_first(root_id)?,
        }
        debug!(%root, %order, %topology, visited = walk.out.len(), "traversal complete");
        Ok(walk.out)
    }
}

/// State of one descendant traversal.
struct Walk<'g, 'a, 'v> {
    graph: &'g Graph,
    order: Order,
    visitor: Option<&'a mut Visitor<'v, 'g>>,
    visited: HashSet<NodeId>,
    out: Vec<NodeRef<'g>>,
}

impl<'g> Walk<'g, '_, '_> {
    fn breadth_first(&mut self, root: NodeId) -> Result<(), GraphError> {
        let mut queue = VecDeque::from([root]);
        self.visited.insert(root);

        while let Some(current) = queue.pop_front() {
            self.out.push(NodeRef::new(self.graph, current));
            for child in self.next_children(current)? {
                if self.visited.insert(child.id) {
                    queue.push_back(child.id);
                }
            }
        }
        Ok(())
    }

    fn depth_first(&mut self, root: NodeId) -> Result<(), GraphError> {
        self.visited.insert(root);
        // Each frame holds a node and the children it has yet to enter.
        let mut stack = vec![(root, self.next_children(root)?.into_iter())];

        while let Some((node, pending)) = stack.last_mut() {
            let next = pending.find(|child| !self.visited.contains(&child.id));
            match next {
                Some(child) => {
                    self.visited.insert(child.id);
                    let children = self.next_children(child.id)?;
                    stack.push((child.id, children.into_iter()));
                }
                None => {
                    let node = *node;
                    stack.pop();
                    self.out.push(NodeRef::new(self.graph, node));
                }
            }
        }
        Ok(())
    }

    /// Ordered children of `node`, filtered through the visitor if any.
    fn next_children(&mut self, node: NodeId) -> Result<Vec<NodeRef<'g>>, GraphError> {
        let children = self
            .graph
            .ordered_relatives(node, Direction::Children, self.order);
        let Some(visitor) = self.visitor.as_deref_mut() else {
            return Ok(children);
        };

        let current = NodeRef::new(self.graph, node);
        let allowed: HashSet<NodeRef<'g>> = children.iter().copied().collect();
        let chosen = visitor(current, children).map_err(|source| GraphError::Visitor {
            node: current.key().clone(),
            source,
        })?;

        if let Some(stray) = chosen.iter().find(|c| !allowed.contains(*c)) {
            return Err(GraphError::VisitorContractViolation {
                node: current.key().clone(),
                returned: stray.key().clone(),
            });
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trace::Trace;
    use crate::core::value::Value;

    /// root -> x -> z, root -> y, all declared in key order.
    fn sample() -> (Graph, Key) {
        let mut graph = Graph::new();
        let keys: Vec<Key> = ["root", "x", "y", "z"]
            .iter()
            .map(|id| graph.key(&["n", id]).unwrap())
            .collect();
        for key in &keys {
            graph.add_node(key, Value::Null, false, Trace::none()).unwrap();
        }
        graph.add_edge(&keys[0], &keys[1], None, Trace::none()).unwrap();
        graph.add_edge(&keys[0], &keys[2], None, Trace::none()).unwrap();
        graph.add_edge(&keys[1], &keys[3], None, Trace::none()).unwrap();
        assert!(graph.finalize().is_empty());
        let root = keys[0].clone();
        (graph, root)
    }

    fn ids(nodes: &[NodeRef<'_>]) -> Vec<String> {
        nodes.iter().map(|n| n.key().id().to_string()).collect()
    }

    #[test]
    fn queries_require_finalize() {
        let mut graph = Graph::new();
        let a = graph.key(&["n", "a"]).unwrap();
        assert!(matches!(graph.node(&a), Err(GraphError::NotFinalized)));
        assert!(matches!(
            graph.children(&a, Order::Def),
            Err(GraphError::NotFinalized)
        ));
        assert!(matches!(
            graph.descendants(&a, Order::Def, Topology::Depth),
            Err(GraphError::NotFinalized)
        ));
        assert!(matches!(graph.edges(), Err(GraphError::NotFinalized)));
    }

    #[test]
    fn missing_nodes_are_empty_not_errors() {
        let (mut graph, _) = sample();
        let ghost = graph.key(&["n", "ghost"]).unwrap();
        assert!(graph.node(&ghost).unwrap().is_none());
        assert!(graph.children(&ghost, Order::Key).unwrap().is_empty());
        assert!(graph.parents(&ghost, Order::Key).unwrap().is_empty());
        assert!(graph
            .descendants(&ghost, Order::Key, Topology::Breadth)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn foreign_keys_are_rejected() {
        let (graph, _) = sample();
        let (other, other_root) = sample();
        let err = graph.children(&other_root, Order::Def).unwrap_err();
        assert!(matches!(err, GraphError::ForeignKey { ref argument, .. } if argument == "parent"));

        let mut nodes = other.nodes().unwrap();
        let err = graph.sort_nodes(&mut nodes, Order::Key).unwrap_err();
        assert!(matches!(err, GraphError::ForeignKey { ref argument, .. } if argument == "nodes[0]"));
    }

    #[test]
    fn breadth_and_depth_orders() {
        let (graph, root) = sample();
        let bfs = graph.descendants(&root, Order::Def, Topology::Breadth).unwrap();
        assert_eq!(ids(&bfs), ["root", "x", "y", "z"]);
        let dfs = graph.descendants(&root, Order::Def, Topology::Depth).unwrap();
        assert_eq!(ids(&dfs), ["z", "x", "y", "root"]);
        let reversed = graph
            .descendants(&root, Order::DefDesc, Topology::Breadth)
            .unwrap();
        assert_eq!(ids(&reversed), ["root", "y", "x", "z"]);
    }

    #[test]
    fn shared_descendants_are_emitted_once() {
        let mut graph = Graph::new();
        let keys: Vec<Key> = ["top", "left", "right", "shared"]
            .iter()
            .map(|id| graph.key(&["n", id]).unwrap())
            .collect();
        for key in &keys {
            graph.add_node(key, Value::Null, false, Trace::none()).unwrap();
        }
        graph.add_edge(&keys[0], &keys[1], None, Trace::none()).unwrap();
        graph.add_edge(&keys[0], &keys[2], None, Trace::none()).unwrap();
        graph.add_edge(&keys[1], &keys[3], None, Trace::none()).unwrap();
        graph.add_edge(&keys[2], &keys[3], None, Trace::none()).unwrap();
        assert!(graph.finalize().is_empty());

        let dfs = graph
            .descendants(&keys[0], Order::Def, Topology::Depth)
            .unwrap();
        assert_eq!(ids(&dfs), ["shared", "left", "right", "top"]);
        let bfs = graph
            .descendants(&keys[0], Order::Def, Topology::Breadth)
            .unwrap();
        assert_eq!(ids(&bfs), ["top", "left", "right", "shared"]);
    }

    #[test]
    fn visitor_filters_children() {
        let (graph, root) = sample();
        let visited = graph
            .descendants_with(&root, Order::Def, Topology::Breadth, |_, children| {
                Ok(children
                    .into_iter()
                    .filter(|c| c.key().id() != "x")
                    .collect())
            })
            .unwrap();
        assert_eq!(ids(&visited), ["root", "y"]);
    }

    #[test]
    fn visitor_may_reorder_children() {
        let (graph, root) = sample();
        let visited = graph
            .descendants_with(&root, Order::Def, Topology::Depth, |_, mut children| {
                children.reverse();
                Ok(children)
            })
            .unwrap();
        assert_eq!(ids(&visited), ["y", "z", "x", "root"]);
    }

    #[test]
    fn visitor_returning_stranger_violates_contract() {
        let (graph, root) = sample();
        let z = graph.nodes().unwrap()[3];
        let err = graph
            .descendants_with(&root, Order::Def, Topology::Breadth, |_, mut children| {
                children.push(z);
                Ok(children)
            })
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::VisitorContractViolation { ref node, ref returned }
                if node.id() == "root" && returned.id() == "z"
        ));
    }

    #[test]
    fn visitor_failure_names_the_node() {
        let (graph, root) = sample();
        let err = graph
            .descendants_with(&root, Order::Def, Topology::Depth, |node, children| {
                if node.key().id() == "x" {
                    Err("script raised".into())
                } else {
                    Ok(children)
                }
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "visitor failed at n:x: script raised");
    }

    #[test]
    fn sort_nodes_by_declaration_index() {
        let (graph, _) = sample();
        let mut nodes = graph.nodes().unwrap();
        nodes.reverse();
        graph.sort_nodes(&mut nodes, Order::Def).unwrap();
        assert_eq!(ids(&nodes), ["root", "x", "y", "z"]);
        graph.sort_nodes(&mut nodes, Order::KeyDesc).unwrap();
        assert_eq!(ids(&nodes), ["z", "y", "x", "root"]);
    }

    #[test]
    fn depth_first_handles_long_chains() {
        let mut graph = Graph::new();
        let keys: Vec<Key> = (0..50_000)
            .map(|i| graph.key(&["n".to_string(), i.to_string()]).unwrap())
            .collect();
        for key in &keys {
            graph.add_node(key, Value::Null, false, Trace::none()).unwrap();
        }
        for pair in keys.windows(2) {
            graph.add_edge(&pair[0], &pair[1], None, Trace::none()).unwrap();
        }
        assert!(graph.finalize().is_empty());

        let walk = graph.descendants(&keys[0], Order::Def, Topology::Depth).unwrap();
        assert_eq!(walk.len(), keys.len());
        assert_eq!(walk[0].key(), &keys[keys.len() - 1]);
        assert_eq!(walk[walk.len() - 1].key(), &keys[0]);

        let walk = graph
            .descendants_with(&keys[0], Order::Def, Topology::Depth, |_, children| Ok(children))
            .unwrap();
        assert_eq!(walk.len(), keys.len());
    }
}
