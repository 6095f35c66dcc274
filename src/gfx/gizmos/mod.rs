//! # Gizmo System
//!
//! The translate gizmo: three axis handles drawn at the selected object,
//! each of which can be grabbed to drag the object along that axis only.
//!
//! ## Key Components
//!
//! - [`ManipulationController`] - Idle / AxisDragging state machine
//! - [`AxisHandles`] - Handle geometry and hit-testing
//! - [`closest_point_on_axis`] - Ray to axis projection
//! - [`DragCommit`] - The model write produced on release
//!
//! ## Usage
//!
//! ```
//! use archgraph::gfx::gizmos::{Axis, ManipulationController};
//! use archgraph::gfx::picking::Ray;
//! use cgmath::Vector3;
//!
//! let mut gizmo = ManipulationController::default();
//! gizmo.show_at(Vector3::new(0.0, 0.0, 0.0));
//!
//! let ray = Ray::new(Vector3::new(0.5, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
//! assert_eq!(gizmo.pointer_down(&ray, Some("node")), Some(Axis::X));
//! ```

pub mod axis;
pub mod handles;
pub mod translate;

#[cfg(test)]
mod test_translate;

pub use axis::Axis;
pub use handles::{AxisHandles, HandlePart, PartKind};
pub use translate::{closest_point_on_axis, DragCommit, DragState, ManipulationController};
