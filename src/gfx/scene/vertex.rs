//! # Render Export Data
//!
//! GPU-compatible plain-old-data views of the scene. The core never renders;
//! a renderer collaborator uploads these slices as-is with
//! [`bytemuck::cast_slice`].

use super::object::{Connector, SceneObject};

/// Per-instance data for one node box.
///
/// # Memory Layout
///
/// `#[repr(C)]` with three 16-byte rows, so the struct has no implicit
/// padding and can be uploaded directly as an instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeInstance {
    /// World-space center [x, y, z]
    pub position: [f32; 3],
    /// Uniform scale
    pub scale: f32,
    /// Linear color [r, g, b, a]
    pub color: [f32; 4],
    /// Spin applied about the X and Y axes, in radians
    pub rotation: f32,
    pub _padding: [f32; 3],
}

impl From<&SceneObject> for NodeInstance {
    fn from(object: &SceneObject) -> Self {
        Self {
            position: object.position.into(),
            scale: object.scale,
            color: object.color.to_rgba(),
            rotation: object.rotation,
            _padding: [0.0; 3],
        }
    }
}

/// One end of a connector line.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    /// Both ends of `connector`, for a line-list topology
    pub fn pair(connector: &Connector) -> [LineVertex; 2] {
        let color = connector.color.to_rgb();
        [
            LineVertex {
                position: connector.start.into(),
                color,
            },
            LineVertex {
                position: connector.end.into(),
                color,
            },
        ]
    }
}
