//! # Translation Gizmo
//!
//! The axis-constrained drag. The controller is a two-state machine:
//!
//! ```text
//! Idle --pointer_down on a handle--> AxisDragging(axis)
//! AxisDragging --pointer_move--> AxisDragging   (object follows the ray)
//! AxisDragging --pointer_up--> Idle             (final position committed)
//! ```
//!
//! There is no cancel transition; releasing the pointer always commits.
//! While dragging only the scene object moves. The model is written once,
//! on release, through a [`DragCommit`].

use std::cell::RefCell;

use cgmath::{InnerSpace, Vector3};

use super::axis::Axis;
use super::handles::AxisHandles;
use crate::events::{ChangeBus, ChangePayload, NodeChanges, UpdateOptions};
use crate::gfx::picking::Ray;
use crate::gfx::scene::SceneGraph;
use crate::model::Architecture;

/// Below this the ray is treated as parallel to the axis
const PARALLEL_EPSILON: f32 = 1e-6;

/// Closest point to `ray` on the infinite line through `anchor` along
/// `axis_direction`.
///
/// When the ray is (nearly) parallel to the line there is no unique answer
/// and the anchor itself is returned.
pub fn closest_point_on_axis(
    anchor: Vector3<f32>,
    axis_direction: Vector3<f32>,
    ray: &Ray,
) -> Vector3<f32> {
    let d1 = axis_direction.normalize();
    let d2 = ray.direction.normalize();
    let r = anchor - ray.origin;

    let a = d1.dot(d1);
    let b = d1.dot(d2);
    let c = d2.dot(d2);
    let d = d1.dot(r);
    let e = d2.dot(r);
    let denom = a * c - b * b;

    let t = if denom.abs() > PARALLEL_EPSILON {
        (b * e - c * d) / denom
    } else {
        0.0
    };

    anchor + d1 * t
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    AxisDragging(Axis),
}

/// A finished drag waiting to be written to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit {
    pub node_id: String,
    pub axis: Axis,
    pub position: Vector3<f32>,
}

impl DragCommit {
    pub fn payload(&self) -> ChangePayload {
        ChangePayload::node_updated(&self.node_id, NodeChanges::position(self.position.into()))
    }

    /// Write the position into `model`, then emit `node-updated`.
    ///
    /// Returns `false` (and emits nothing) if the node is gone.
    pub fn apply(&self, model: &RefCell<Architecture>, bus: &mut ChangeBus<ChangePayload>) -> bool {
        if model.borrow().find(&self.node_id).is_none() {
            log::warn!("Dropping drag commit for missing node `{}`", self.node_id);
            return false;
        }

        bus.update(
            model,
            |arch| {
                if let Some(node) = arch.find_mut(&self.node_id) {
                    node.set_position(self.position);
                }
            },
            self.payload(),
            UpdateOptions::immediate(),
        );
        log::info!(
            "Moved `{}` along {} to ({:.3}, {:.3}, {:.3})",
            self.node_id,
            self.axis.label(),
            self.position.x,
            self.position.y,
            self.position.z
        );
        true
    }
}

/// The translate gizmo bound to the current selection.
#[derive(Debug, Clone)]
pub struct ManipulationController {
    handles: AxisHandles,
    state: DragState,
    visible: bool,
    anchor: Vector3<f32>,
    target: Option<String>,
}

impl ManipulationController {
    pub fn new(handle_scale: f32) -> Self {
        Self {
            handles: AxisHandles::new(handle_scale),
            state: DragState::Idle,
            visible: false,
            anchor: Vector3::new(0.0, 0.0, 0.0),
            target: None,
        }
    }

    /// Show the handles at `anchor`
    pub fn show_at(&mut self, anchor: Vector3<f32>) {
        self.visible = true;
        self.anchor = anchor;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn anchor(&self) -> Vector3<f32> {
        self.anchor
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::AxisDragging(_))
    }

    pub fn handles(&self) -> &AxisHandles {
        &self.handles
    }

    /// Start a drag if `ray` hits a handle of the visible gizmo.
    ///
    /// `selected` is the node the drag will move. Returns the grabbed axis.
    pub fn pointer_down(&mut self, ray: &Ray, selected: Option<&str>) -> Option<Axis> {
        if !self.visible || self.is_dragging() {
            return None;
        }

        let axis = self.handles.hit_test(self.anchor, ray)?;
        self.state = DragState::AxisDragging(axis);
        self.target = selected.map(str::to_string);
        log::debug!("Grabbed {} handle", axis.label());
        Some(axis)
    }

    /// Project `ray` onto the drag axis and move the dragged object there.
    ///
    /// Does nothing when idle or when the dragged node has no object.
    pub fn pointer_move(&mut self, ray: &Ray, scene: &mut SceneGraph) -> Option<Vector3<f32>> {
        let DragState::AxisDragging(axis) = self.state else {
            return None;
        };
        let target = self.target.as_deref()?;

        let point = closest_point_on_axis(self.anchor, axis.direction(), ray);
        if !scene.move_object(target, point) {
            return None;
        }
        self.anchor = point;
        Some(point)
    }

    /// Finish the drag. The returned commit carries the object's final
    /// position and must be applied to the model by the caller.
    pub fn pointer_up(&mut self, scene: &SceneGraph) -> Option<DragCommit> {
        let DragState::AxisDragging(axis) = std::mem::take(&mut self.state) else {
            return None;
        };
        let node_id = self.target.take()?;
        let object = scene.object(&node_id)?;

        Some(DragCommit {
            position: object.position,
            node_id,
            axis,
        })
    }
}

impl Default for ManipulationController {
    fn default() -> Self {
        Self::new(1.0)
    }
}
