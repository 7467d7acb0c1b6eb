//! core::trace
//!
//! Opaque provenance captured by the embedding runtime.
//!
//! The graph never interprets a trace. It stores the value handed to a
//! declaration and renders it again when reporting an error about that
//! declaration.

use std::fmt;
use std::sync::Arc;

/// A printable capture of where a declaration happened.
///
/// # Example
///
/// ```
/// use cfgraph::core::trace::Trace;
///
/// let trace = Trace::new("services.star:12: in declare_api");
/// assert_eq!(trace.to_string(), "services.star:12: in declare_api");
/// assert!(Trace::none().is_none());
/// ```
#[derive(Clone, Default)]
pub struct Trace(Option<Arc<dyn fmt::Display + Send + Sync>>);

impl Trace {
    /// Wrap any displayable provenance value.
    pub fn new<T>(trace: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self(Some(Arc::new(trace)))
    }

    /// A trace for declarations with no known origin.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(trace) => fmt::Display::fmt(trace, f),
            None => f.write_str("<unknown origin>"),
        }
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(trace) => write!(f, "Trace({trace})"),
            None => f.write_str("Trace(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Frame {
        file: &'static str,
        line: u32,
    }

    impl fmt::Display for Frame {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}:{}", self.file, self.line)
        }
    }

    #[test]
    fn renders_wrapped_value() {
        let trace = Trace::new(Frame {
            file: "main.star",
            line: 7,
        });
        assert_eq!(trace.to_string(), "main.star:7");
        assert_eq!(format!("{trace:?}"), "Trace(main.star:7)");
    }

    #[test]
    fn none_has_placeholder_text() {
        assert_eq!(Trace::none().to_string(), "<unknown origin>");
        assert!(Trace::default().is_none());
    }
}
