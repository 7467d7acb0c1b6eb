//! core::order
//!
//! Sort modes and traversal topologies accepted by the query API.
//!
//! # Orders
//!
//! | Spelling | Variant            | Meaning                                  |
//! |----------|--------------------|------------------------------------------|
//! | `key`    | [`Order::Key`]     | Lexicographic by key                     |
//! | `~key`   | [`Order::KeyDesc`] | Reverse lexicographic by key             |
//! | `def`    | [`Order::Def`]     | Declaration order                        |
//! | `~def`   | [`Order::DefDesc`] | Reverse declaration order                |
//!
//! "Declaration order" means edge order for `children`/`parents` and node
//! declaration index for `sort_nodes`.

use std::fmt;
use std::str::FromStr;

use super::error::GraphError;

/// How a list of nodes is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Key,
    KeyDesc,
    Def,
    DefDesc,
}

impl Order {
    pub const ALL: [Order; 4] = [Order::Key, Order::KeyDesc, Order::Def, Order::DefDesc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Key => "key",
            Order::KeyDesc => "~key",
            Order::Def => "def",
            Order::DefDesc => "~def",
        }
    }
}

impl FromStr for Order {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Order::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| GraphError::InvalidOrder(s.to_string()))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a descendant traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Queue-based, each node emitted when dequeued (root first).
    Breadth,
    /// Recursive, each node emitted after its children (root last).
    Depth,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Breadth => "breadth",
            Topology::Depth => "depth",
        }
    }
}

impl FromStr for Topology {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breadth" => Ok(Topology::Breadth),
            "depth" => Ok(Topology::Depth),
            other => Err(GraphError::InvalidTopology(other.to_string())),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
