//! # Graphics Module
//!
//! Everything on the renderable side of the editor. Nothing here draws; the
//! module decides which objects exist, where they sit, and how a drag maps
//! to a 3D position, and exports plain data for a renderer collaborator.
//!
//! ## Architecture Overview
//!
//! - **Scene Graph** ([`scene`]) - Objects and connectors derived from the model
//! - **Gizmos** ([`gizmos`]) - The axis-constrained translate handle
//! - **Picking** ([`picking`]) - Rays, bounding boxes, nearest-hit search
//! - **Color** ([`color`]) - `#rrggbb` parsing and float conversion

pub mod color;
pub mod gizmos;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use color::Color;
pub use gizmos::{Axis, ManipulationController};
pub use picking::Ray;
pub use scene::SceneGraph;
