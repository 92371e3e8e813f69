#![forbid(unsafe_code)]

//! The view-factory seam between the modal orchestrator and the host UI
//! framework.
//!
//! The orchestrator never instantiates, attaches, or destroys components
//! itself; it goes through [`ViewFactory`]. An embedding implements the
//! trait over whatever framework it runs on (a DOM renderer, a TUI widget
//! tree, a test recorder), which keeps the orchestration logic
//! framework-swappable.
//!
//! # Invariants
//!
//! - Every handle returned by `instantiate` is eventually passed to
//!   `dispose` exactly once by the orchestrator.
//! - Props are delivered at instantiation time, so the view exposes them
//!   before its first render.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown view type | Type not registered with the factory | `Err(ViewError::UnknownViewType)` |
//! | Factory failure | Framework rejected construction | `Err(ViewError::Instantiation)` |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered content-view type name.
///
/// The factory decides what names it knows; the orchestrator treats the
/// name as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewType(pub &'static str);

impl ViewType {
    /// The registered name.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Opaque handle to an instantiated view, issued by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(u64);

impl ViewHandle {
    /// Create a handle from a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Typed props injected into a content view at instantiation time.
///
/// This replaces dynamic per-field assignment onto a live component
/// instance: the caller declares the values, the factory hands them to the
/// view's constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewProps(HashMap<String, Value>);

impl ViewProps {
    /// Create an empty props map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a prop, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a prop by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of props.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Errors from view instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view type is not registered with the factory.
    UnknownViewType(String),
    /// The framework failed to construct the view.
    Instantiation { view: String, reason: String },
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownViewType(name) => write!(f, "unknown view type: {name}"),
            Self::Instantiation { view, reason } => {
                write!(f, "failed to instantiate '{view}': {reason}")
            }
        }
    }
}

impl std::error::Error for ViewError {}

/// Capability interface over the host framework's view machinery.
pub trait ViewFactory {
    /// Construct a view of the given type with the given props.
    fn instantiate(&mut self, view: ViewType, props: &ViewProps) -> Result<ViewHandle, ViewError>;

    /// Attach the view to the live view tree.
    fn attach(&mut self, view: ViewHandle);

    /// Detach the view from the live view tree.
    fn detach(&mut self, view: ViewHandle);

    /// Release the view's framework-level resources.
    fn dispose(&mut self, view: ViewHandle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn props_builder_and_lookup() {
        let props = ViewProps::new()
            .with("x", 1)
            .with("label", "hello")
            .with("nested", json!({"a": true}));

        assert_eq!(props.len(), 3);
        assert_eq!(props.get("x"), Some(&json!(1)));
        assert_eq!(props.get("label"), Some(&json!("hello")));
        assert!(props.get("missing").is_none());
    }

    #[test]
    fn props_insert_replaces() {
        let mut props = ViewProps::new().with("x", 1);
        props.insert("x", 2);
        assert_eq!(props.get("x"), Some(&serde_json::json!(2)));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn error_display() {
        let err = ViewError::UnknownViewType("mystery".into());
        assert_eq!(err.to_string(), "unknown view type: mystery");

        let err = ViewError::Instantiation {
            view: "form".into(),
            reason: "missing dependency".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to instantiate 'form': missing dependency"
        );
    }
}
