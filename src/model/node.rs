//! # Architecture Nodes
//!
//! A [`Node`] is one named, positioned box in the architecture tree. Parents
//! own their children by value, so the tree can never share a subtree or
//! form a cycle.

use cgmath::Vector3;
use serde::{Deserialize, Serialize, Serializer};

fn default_scale() -> f32 {
    1.0
}

/// A positioned entity in the architecture tree.
///
/// An empty `id` means "not yet assigned"; [`assign_ids`](super::assign_ids)
/// fills those in after a load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    /// Stable identifier, unique across the tree
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// World-space position `[x, y, z]`
    #[serde(default)]
    pub pos: [f32; 3],
    /// Uniform scale, 1.0 unless stated otherwise
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Legend entry id; when set it is the authoritative color source
    #[serde(default)]
    pub category: Option<String>,
    /// Explicit or cached color (`#rrggbb`)
    #[serde(default)]
    pub color: Option<String>,
    /// Ordered children, exclusively owned
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node without an id at the given position
    pub fn new(name: impl Into<String>, pos: [f32; 3]) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            pos,
            scale: 1.0,
            category: None,
            color: None,
            children: Vec::new(),
        }
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Reference a legend entry
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set an explicit color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Position as a cgmath vector
    pub fn position(&self) -> Vector3<f32> {
        Vector3::from(self.pos)
    }

    /// Set the position from a cgmath vector
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.pos = position.into();
    }

    /// Whether an id has been assigned
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Pre-order walk handing each node to `visit` together with its parent.
    ///
    /// The node the walk starts from is reported with `parent == None`.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Node, Option<&'a Node>),
    {
        self.walk_from(None, visit);
    }

    fn walk_from<'a, F>(&'a self, parent: Option<&'a Node>, visit: &mut F)
    where
        F: FnMut(&'a Node, Option<&'a Node>),
    {
        visit(self, parent);
        for child in &self.children {
            child.walk_from(Some(self), visit);
        }
    }
}

/// Borrowed, persisted shape of a node: `category` XOR `color`.
#[derive(Serialize)]
struct NodeRecord<'a> {
    id: &'a str,
    name: &'a str,
    pos: [f32; 3],
    scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
    children: &'a [Node],
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let category = self.category.as_deref();
        // A cached color is derived from the legend and never persisted alongside a category
        let color = match category {
            Some(_) => None,
            None => self.color.as_deref(),
        };

        NodeRecord {
            id: &self.id,
            name: &self.name,
            pos: self.pos,
            scale: self.scale,
            category,
            color,
            children: &self.children,
        }
        .serialize(serializer)
    }
}
