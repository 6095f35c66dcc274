//! # Axis Handles
//!
//! Geometry of the translation gizmo. The handles form a small part tree:
//!
//! ```text
//! root group
//! ├── X group (tagged X) ── shaft, arrowhead
//! ├── Y group (tagged Y) ── shaft, arrowhead
//! └── Z group (tagged Z) ── shaft, arrowhead
//! ```
//!
//! A ray is tested against the meshes only; the axis of a hit is read from
//! the nearest ancestor group that carries a tag, so meshes never need to
//! know which axis they belong to.

use cgmath::Vector3;

use super::axis::Axis;
use crate::gfx::picking::{pick_nearest, Aabb, Ray};

const SHAFT_RADIUS: f32 = 0.06;
const SHAFT_LENGTH: f32 = 1.0;
const ARROW_RADIUS: f32 = 0.12;
const ARROW_HEIGHT: f32 = 0.2;
/// Distance of the arrowhead's center from the anchor
const ARROW_OFFSET: f32 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Group,
    Shaft,
    Arrowhead,
}

/// One node of the handle tree
#[derive(Debug, Clone)]
pub struct HandlePart {
    pub kind: PartKind,
    pub parent: Option<usize>,
    /// Set on axis groups only
    pub axis: Option<Axis>,
    /// Bounds relative to the anchor at handle scale 1.0; `None` for groups
    pub local_bounds: Option<Aabb>,
}

/// The three-axis translation handle set.
#[derive(Debug, Clone)]
pub struct AxisHandles {
    parts: Vec<HandlePart>,
    scale: f32,
}

impl AxisHandles {
    pub fn new(scale: f32) -> Self {
        let mut parts = vec![HandlePart {
            kind: PartKind::Group,
            parent: None,
            axis: None,
            local_bounds: None,
        }];

        for axis in Axis::ALL {
            let group = parts.len();
            parts.push(HandlePart {
                kind: PartKind::Group,
                parent: Some(0),
                axis: Some(axis),
                local_bounds: None,
            });
            parts.push(HandlePart {
                kind: PartKind::Shaft,
                parent: Some(group),
                axis: None,
                local_bounds: Some(along(axis, SHAFT_LENGTH * 0.5, SHAFT_LENGTH, SHAFT_RADIUS)),
            });
            parts.push(HandlePart {
                kind: PartKind::Arrowhead,
                parent: Some(group),
                axis: None,
                local_bounds: Some(along(axis, ARROW_OFFSET, ARROW_HEIGHT, ARROW_RADIUS)),
            });
        }

        Self { parts, scale }
    }

    pub fn parts(&self) -> &[HandlePart] {
        &self.parts
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// World bounds of a mesh part with the gizmo at `anchor`
    pub fn world_bounds(&self, part: usize, anchor: Vector3<f32>) -> Option<Aabb> {
        let local = self.parts.get(part)?.local_bounds?;
        Some(Aabb::new(
            anchor + local.min * self.scale,
            anchor + local.max * self.scale,
        ))
    }

    /// Axis of the handle nearest along `ray`, if any is hit
    pub fn hit_test(&self, anchor: Vector3<f32>, ray: &Ray) -> Option<Axis> {
        let meshes = (0..self.parts.len())
            .filter_map(|part| self.world_bounds(part, anchor).map(|bounds| (part, bounds)));
        let hit = pick_nearest(ray, meshes)?;
        self.axis_of(hit.key)
    }

    /// Walk up from `part` to the first ancestor (or itself) tagged with an
    /// axis
    pub fn axis_of(&self, part: usize) -> Option<Axis> {
        let mut current = Some(part);
        while let Some(index) = current {
            let part = self.parts.get(index)?;
            if let Some(axis) = part.axis {
                return Some(axis);
            }
            current = part.parent;
        }
        None
    }
}

impl Default for AxisHandles {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Box of `length` along `axis` centered `offset` from the origin, with
/// `radius` across
fn along(axis: Axis, offset: f32, length: f32, radius: f32) -> Aabb {
    let direction = axis.direction();
    let across = Vector3::new(radius, radius, radius);
    let half = across + direction * (length * 0.5 - radius);
    Aabb::from_center_extents(direction * offset, half)
}
