//! # Scene Objects
//!
//! The renderable projection of the model. A [`SceneObject`] stands for one
//! node and a [`Connector`] for one parent to child edge. Neither holds a
//! reference back into the model; both are addressed by node id.

use cgmath::Vector3;

use crate::gfx::color::Color;
use crate::gfx::picking::Aabb;
use crate::model::Node;

/// Edge length of a node's box at scale 1.0
pub const BOX_SIZE: f32 = 0.6;

/// `(parent id, child id)`
pub type ConnectorKey = (String, String);

/// One node as the renderer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub node_id: String,
    pub name: String,
    pub position: Vector3<f32>,
    pub scale: f32,
    pub color: Color,
    /// Radians per reference frame; zero when animation is off
    pub spin_speed: f32,
    /// Accumulated spin, discarded on rebuild
    pub rotation: f32,
}

impl SceneObject {
    pub fn from_node(node: &Node, color: Color, spin_speed: f32) -> Self {
        Self {
            node_id: node.id.clone(),
            name: node.name.clone(),
            position: node.position(),
            scale: node.scale,
            color,
            spin_speed,
            rotation: 0.0,
        }
    }

    /// Box used for picking
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, BOX_SIZE * 0.5 * self.scale)
    }
}

/// A line from a parent's object to a child's object.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent_id: String,
    pub child_id: String,
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    /// The parent's color
    pub color: Color,
}

impl Connector {
    pub fn between(parent: &SceneObject, child: &SceneObject) -> Self {
        Self {
            parent_id: parent.node_id.clone(),
            child_id: child.node_id.clone(),
            start: parent.position,
            end: child.position,
            color: parent.color,
        }
    }

    pub fn key(&self) -> ConnectorKey {
        (self.parent_id.clone(), self.child_id.clone())
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.parent_id == node_id || self.child_id == node_id
    }
}
