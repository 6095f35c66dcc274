//! # Scene Graph
//!
//! The renderable side of the editor: one [`SceneObject`] per model node and
//! one [`Connector`] per parent to child edge, kept in step with the model by
//! the [`SceneGraph`] synchronizer.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Owns the objects and dispatches change payloads
//! - [`SceneObject`] - A node's box: position, scale, color, spin
//! - [`Connector`] - A line from a parent's box to a child's box
//! - [`NodeInstance`] / [`LineVertex`] - GPU-ready exports

pub mod object;
pub mod sync;
pub mod vertex;

pub use object::{Connector, ConnectorKey, SceneObject, BOX_SIZE};
pub use sync::SceneGraph;
pub use vertex::{LineVertex, NodeInstance};
