//! # Archgraph Prelude
//!
//! Commonly used types in one import.
//!
//! ```
//! use archgraph::prelude::*;
//!
//! let mut editor = archgraph::default();
//! let root = editor.model().root.id.clone();
//! let id = editor.add_child(&root).unwrap();
//! assert!(editor.find_node(&id).is_some());
//! ```

// Re-export core application types
pub use crate::app::DiagramEditor;
pub use crate::config::EditorConfig;
pub use crate::default;
pub use crate::error::{EditorError, Result};

// Re-export model and notification types
pub use crate::events::{ChangeBus, ChangeKind, ChangePayload, NodeChanges, UpdateOptions};
pub use crate::model::{Architecture, LegendEntry, Node};
pub use crate::selection::SelectionEvent;

// Re-export graphics and scene types
pub use crate::gfx::gizmos::{Axis, DragState};
pub use crate::gfx::picking::Ray;
pub use crate::gfx::scene::{SceneGraph, SceneObject};
pub use cgmath::Vector3;
