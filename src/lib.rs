// src/lib.rs
//! Archgraph
//!
//! The core of an interactive 3D architecture-diagram editor: a node tree
//! model, a change bus, a scene graph kept in sync with the model, and an
//! axis-constrained translate gizmo.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod gfx;
pub mod model;
pub mod performance;
pub mod prelude;
pub mod selection;

#[cfg(test)]
mod test_session;

// Re-export main types for convenience
pub use app::DiagramEditor;
pub use config::EditorConfig;
pub use error::{EditorError, Result};

/// Install `env_logger` with an `info` default, overridable via `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Creates an editor with the default configuration and the built-in sample
/// loaded
pub fn default() -> DiagramEditor {
    let mut editor = DiagramEditor::default();
    editor.load_sample();
    editor
}
