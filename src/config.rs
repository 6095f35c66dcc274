//! # Editor Configuration
//!
//! Tunables for a [`DiagramEditor`](crate::app::DiagramEditor). Every field
//! has a default, so a partial JSON document (or none at all) is a valid
//! configuration.
//!
//! ```
//! use archgraph::config::EditorConfig;
//!
//! let config = EditorConfig::default()
//!     .with_debounce_ms(0)
//!     .with_edit_mode(false);
//! assert!(config.debounce().is_zero());
//! ```

use serde::Deserialize;
use std::time::Duration;

use crate::error::Result;
use crate::model::DEFAULT_COLOR;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet window for debounced position updates
    pub debounce_ms: u64,
    /// Color for nodes with neither a category nor a color
    pub default_color: String,
    /// Size multiplier for the axis handles
    pub handle_scale: f32,
    /// Name given to nodes created by "add child"
    pub new_child_name: String,
    /// Offset of a new child from its parent
    pub new_child_offset: [f32; 3],
    /// Whether the gizmo is shown for the selection
    pub edit_mode: bool,
    /// Whether scene objects carry a spin rate
    pub animate: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            default_color: DEFAULT_COLOR.to_string(),
            handle_scale: 1.0,
            new_child_name: "New Node".to_string(),
            new_child_offset: [0.0, -2.0, 0.0],
            edit_mode: true,
            animate: true,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    pub fn with_handle_scale(mut self, handle_scale: f32) -> Self {
        self.handle_scale = handle_scale;
        self
    }

    pub fn with_new_child_name(mut self, name: impl Into<String>) -> Self {
        self.new_child_name = name.into();
        self
    }

    pub fn with_new_child_offset(mut self, offset: [f32; 3]) -> Self {
        self.new_child_offset = offset;
        self
    }

    pub fn with_edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = edit_mode;
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }
}
