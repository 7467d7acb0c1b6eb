//! cfgraph - Declarative configuration graphs
//!
//! cfgraph holds a directed acyclic graph of configuration nodes. Each node
//! is addressed by an interned hierarchical key, carries an immutable
//! property bag, and is linked to other nodes by titled edges. Declarations
//! are collected first; once the graph is finalized it becomes read-only
//! and can be queried for ordered children, parents and descendants.
//!
//! # Architecture
//!
//! - [`core`] - Keys, values, the graph engine, configuration and export
//! - [`manifest`] - TOML manifests replayed into a graph
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. The graph never contains a cycle; an edge that would close one is rejected
//! 2. A node is declared at most once, except for idempotent redeclarations
//! 3. Every edge of a finalized graph connects two declared nodes
//! 4. A finalized graph is never mutated

pub mod cli;
pub mod core;
pub mod manifest;
pub mod ui;
