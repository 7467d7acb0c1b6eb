//! manifest
//!
//! Declarative TOML manifests that drive graph construction.
//!
//! # Overview
//!
//! A manifest plays the part of the scripting runtime: it lists node and
//! edge declarations that are replayed against a [`Graph`]. Every
//! declaration is stamped with a [`Trace`] naming the manifest and the entry,
//! so diagnostics point back to the offending table.
//!
//! # Format
//!
//! ```toml
//! [[node]]
//! key = ["service", "api"]
//! properties = { port = 8080 }
//!
//! [[node]]
//! key = ["service", "db"]
//! idempotent = true
//!
//! [[edge]]
//! parent = ["service", "api"]
//! child = ["service", "db"]
//! title = "reads"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::error::GraphError;
use crate::core::graph::Graph;
use crate::core::trace::Trace;
use crate::core::value::Value;

/// Errors from loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{name}': {message}")]
    ParseError { name: String, message: String },
}

/// One `[[node]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDecl {
    pub key: Vec<String>,
    #[serde(default)]
    pub idempotent: bool,
    #[serde(default)]
    pub properties: toml::Table,
}

/// One `[[edge]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDecl {
    pub parent: Vec<String>,
    pub child: Vec<String>,
    pub title: Option<String>,
}

/// A parsed manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeDecl>,
    #[serde(default, rename = "edge")]
    pub edges: Vec<EdgeDecl>,
    #[serde(skip)]
    name: String,
}

/// Where in a manifest a declaration came from.
#[derive(Debug, Clone)]
struct Site {
    manifest: Arc<str>,
    table: &'static str,
    index: usize,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}[{}]", self.manifest, self.table, self.index)
    }
}

impl Manifest {
    /// Parse manifest text. `name` is used in traces and errors.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::ParseError` for malformed TOML or unknown
    /// fields.
    pub fn parse(name: &str, text: &str) -> Result<Self, ManifestError> {
        let mut manifest: Manifest =
            toml::from_str(text).map_err(|e| ManifestError::ParseError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        manifest.name = name.to_string();
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&path.display().to_string(), &text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare every node, then every edge, in manifest order.
    ///
    /// A failed declaration does not stop the replay; all errors are
    /// returned so they can be reported together. The graph is not
    /// finalized.
    pub fn apply(&self, graph: &mut Graph) -> Vec<GraphError> {
        let manifest: Arc<str> = Arc::from(self.name.as_str());
        let site = |table, index| {
            Trace::new(Site {
                manifest: Arc::clone(&manifest),
                table,
                index,
            })
        };
        let mut errors = Vec::new();

        for (i, decl) in self.nodes.iter().enumerate() {
            let result = graph.key(&decl.key).and_then(|key| {
                graph.add_node(
                    &key,
                    table_to_value(&decl.properties),
                    decl.idempotent,
                    site("node", i),
                )
            });
            if let Err(err) = result {
                errors.push(err);
            }
        }

        for (i, decl) in self.edges.iter().enumerate() {
            let result = graph.key(&decl.parent).and_then(|parent| {
                let child = graph.key(&decl.child)?;
                graph.add_edge(&parent, &child, decl.title.as_deref(), site("edge", i))
            });
            if let Err(err) = result {
                errors.push(err);
            }
        }

        debug!(
            manifest = %self.name,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            errors = errors.len(),
            "manifest applied"
        );
        errors
    }
}

fn table_to_value(table: &toml::Table) -> Value {
    Value::Dict(
        table
            .iter()
            .map(|(k, v)| (Value::Str(k.clone()), toml_to_value(v)))
            .collect(),
    )
}

fn toml_to_value(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s.clone()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(x) => Value::Float(*x),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => table_to_value(table),
    }
}
