//! # Change Payloads
//!
//! The wire contract between the model and everything derived from it. Each
//! variant names what changed so the scene synchronizer can choose between a
//! targeted patch and a full rebuild.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// A message that can travel over a [`ChangeBus`](super::ChangeBus).
///
/// The kind is the debounce key: pending emissions of the same kind replace
/// each other.
pub trait Payload {
    type Kind: Copy + Eq + Hash + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Fields changed by a `node-updated` payload. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl NodeChanges {
    pub fn position(pos: [f32; 3]) -> Self {
        Self {
            pos: Some(pos),
            ..Self::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn scale(scale: f32) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_none() && self.name.is_none() && self.color.is_none() && self.scale.is_none()
    }
}

/// What changed in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChangePayload {
    /// Anything may have changed; rebuild everything
    Rebuild,
    /// Some fields of one node changed
    NodeUpdated { id: String, changes: NodeChanges },
    /// A leaf was appended under `parent_id`
    NodeAdded {
        id: String,
        #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
    },
    /// A node and its whole subtree were removed
    NodeRemoved { id: String },
    /// Legend entries were added, removed or recolored
    LegendChanged,
}

/// Discriminant of a [`ChangePayload`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Rebuild,
    NodeUpdated,
    NodeAdded,
    NodeRemoved,
    LegendChanged,
}

impl ChangeKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Rebuild => "rebuild",
            ChangeKind::NodeUpdated => "node-updated",
            ChangeKind::NodeAdded => "node-added",
            ChangeKind::NodeRemoved => "node-removed",
            ChangeKind::LegendChanged => "legend-changed",
        }
    }
}

impl Payload for ChangePayload {
    type Kind = ChangeKind;

    fn kind(&self) -> ChangeKind {
        match self {
            ChangePayload::Rebuild => ChangeKind::Rebuild,
            ChangePayload::NodeUpdated { .. } => ChangeKind::NodeUpdated,
            ChangePayload::NodeAdded { .. } => ChangeKind::NodeAdded,
            ChangePayload::NodeRemoved { .. } => ChangeKind::NodeRemoved,
            ChangePayload::LegendChanged => ChangeKind::LegendChanged,
        }
    }
}

impl ChangePayload {
    pub fn node_updated(id: impl Into<String>, changes: NodeChanges) -> Self {
        ChangePayload::NodeUpdated {
            id: id.into(),
            changes,
        }
    }

    pub fn node_added(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        ChangePayload::NodeAdded {
            id: id.into(),
            parent_id: Some(parent_id.into()),
        }
    }

    pub fn node_removed(id: impl Into<String>) -> Self {
        ChangePayload::NodeRemoved { id: id.into() }
    }

    /// Strict decode of a wire payload
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode a wire payload, treating an unknown or missing `type` as a
    /// request to rebuild.
    pub fn decode_lenient(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Unrecognized change payload, rebuilding instead: {}", err);
                ChangePayload::Rebuild
            }
        }
    }

    /// Encode to the wire shape
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
