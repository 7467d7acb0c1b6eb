//! core
//!
//! Core domain types and the declaration graph.
//!
//! # Modules
//!
//! - [`key`] - Interned hierarchical keys
//! - [`value`] - Property values and frozen property bags
//! - [`trace`] - Opaque provenance of declarations
//! - [`graph`] - Graph construction, finalization, and queries
//! - [`order`] - Sort orders and traversal topologies
//! - [`error`] - Error taxonomy
//! - [`export`] - Serializable snapshot for artifact generators
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - The graph is acyclic at every point of construction
//! - Construction and querying are separate phases
//! - All ordering is deterministic

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod key;
pub mod order;
pub mod trace;
pub mod value;
