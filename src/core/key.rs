//! core::key
//!
//! Interned hierarchical keys.
//!
//! # Overview
//!
//! A [`Key`] is an ordered sequence of `(kind, id)` pairs, for example
//! `service:api/port:http`. Keys are handed out by a [`KeySet`], which
//! canonicalizes them: asking the same set twice for the same pair sequence
//! returns the same handle. Equality and hashing are therefore by identity,
//! and keys minted by two different sets never compare equal.
//!
//! # Ordering
//!
//! `Ord` is lexicographic over the pair sequence (shorter prefixes sort
//! first). Keys with identical pairs from different sets are ordered by
//! their owning set so that `Ord` agrees with `Eq`.
//!
//! # Example
//!
//! ```
//! use cfgraph::core::key::KeySet;
//!
//! let mut keys = KeySet::new();
//! let a = keys.intern(&["service", "a"]).unwrap();
//! let again = keys.intern(&["service", "a"]).unwrap();
//! assert_eq!(a, again);
//! assert_eq!(a.to_string(), "service:a");
//!
//! assert!(keys.intern(&["service"]).is_err());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use super::error::GraphError;

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct KeyInner {
    set: u64,
    pairs: Box<[(String, String)]>,
}

/// A canonical, interned node identifier.
///
/// Cloning a key clones a handle, not the pair sequence.
#[derive(Clone)]
pub struct Key(Arc<KeyInner>);

impl Key {
    /// The `(kind, id)` pairs, root first.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0.pairs
    }

    /// Kind of the innermost pair.
    pub fn kind(&self) -> &str {
        self.0.pairs.last().map(|(kind, _)| kind.as_str()).unwrap_or("")
    }

    /// Id of the innermost pair.
    pub fn id(&self) -> &str {
        self.0.pairs.last().map(|(_, id)| id.as_str()).unwrap_or("")
    }

    pub(crate) fn set_id(&self) -> u64 {
        self.0.set
    }

    /// Split a rendered key path (`kind:id/kind:id`) into flat parts
    /// suitable for [`KeySet::intern`].
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidKey` if a segment has no `:` separator
    /// or an empty kind.
    ///
    /// # Example
    ///
    /// ```
    /// use cfgraph::core::key::Key;
    ///
    /// let parts = Key::parse_path("service:a/port:http").unwrap();
    /// assert_eq!(parts, vec!["service", "a", "port", "http"]);
    /// ```
    pub fn parse_path(path: &str) -> Result<Vec<String>, GraphError> {
        let mut parts = Vec::new();
        for segment in path.split('/') {
            let (kind, id) = segment.split_once(':').ok_or_else(|| {
                GraphError::InvalidKey(format!("segment '{segment}' is not of the form kind:id"))
            })?;
            if kind.is_empty() {
                return Err(GraphError::InvalidKey(format!(
                    "segment '{segment}' has an empty kind"
                )));
            }
            parts.push(kind.to_string());
            parts.push(id.to_string());
        }
        Ok(parts)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .pairs
            .cmp(&other.0.pairs)
            .then_with(|| self.0.set.cmp(&other.0.set))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, id)) in self.0.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{kind}:{id}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

/// The interning table that owns every [`Key`] of one graph.
#[derive(Debug)]
pub struct KeySet {
    id: u64,
    keys: HashMap<Vec<(String, String)>, Key>,
}

impl KeySet {
    /// Create an empty set with a process-unique identity.
    pub fn new() -> Self {
        Self {
            id: NEXT_SET_ID.fetch_add(1, AtomicOrdering::Relaxed),
            keys: HashMap::new(),
        }
    }

    /// Return the canonical key for a flat `kind, id, kind, id, ...` list.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidKey` if `parts` is empty or has an odd
    /// number of elements.
    pub fn intern<S: AsRef<str>>(&mut self, parts: &[S]) -> Result<Key, GraphError> {
        if parts.is_empty() {
            return Err(GraphError::InvalidKey(
                "key needs at least one kind/id pair".into(),
            ));
        }
        if parts.len() % 2 != 0 {
            return Err(GraphError::InvalidKey(format!(
                "key needs an even number of elements, got {}",
                parts.len()
            )));
        }

        let pairs: Vec<(String, String)> = parts
            .chunks_exact(2)
            .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string()))
            .collect();

        if let Some(key) = self.keys.get(&pairs) {
            return Ok(key.clone());
        }

        let key = Key(Arc::new(KeyInner {
            set: self.id,
            pairs: pairs.clone().into_boxed_slice(),
        }));
        self.keys.insert(pairs, key.clone());
        Ok(key)
    }

    /// Whether `key` was minted by this set.
    pub fn owns(&self, key: &Key) -> bool {
        key.set_id() == self.id
    }

    /// Reject keys minted by another set, naming the offending argument.
    pub(crate) fn check(&self, argument: &str, key: &Key) -> Result<(), GraphError> {
        if self.owns(key) {
            Ok(())
        } else {
            Err(GraphError::ForeignKey {
                argument: argument.to_string(),
                key: key.clone(),
            })
        }
    }

    /// Number of distinct keys interned so far.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeySet {
    fn default() -> Self {
        Self::new()
    }
}
