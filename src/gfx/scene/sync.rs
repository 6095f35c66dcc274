//! # Scene Synchronizer
//!
//! [`SceneGraph`] owns every renderable object and keeps it consistent with
//! the model. Each change payload is dispatched either to a full rebuild or
//! to a targeted patch:
//!
//! | payload          | action                                               |
//! |------------------|------------------------------------------------------|
//! | `rebuild`        | discard everything, walk the model from the root     |
//! | `node-updated`   | patch the object in place, rebuild if it is missing  |
//! | `node-added`     | attach the new object and its connector              |
//! | `node-removed`   | detach the object, its descendants and connectors    |
//! | `legend-changed` | rebuild                                              |
//!
//! Objects live in a flat arena with an id to slot index; nothing in the
//! scene points back into the model, so teardown is just clearing tables.
//!
//! ## Removals
//!
//! A `node-removed` payload arrives after the subtree is already gone from
//! the model, so the descendant set has to be captured beforehand with
//! [`SceneGraph::stage_removal`]. When nothing was staged the synchronizer
//! falls back to walking its own connector table.

use std::collections::{BTreeMap, HashMap};

use cgmath::Vector3;
use rand::Rng;

use super::object::{Connector, ConnectorKey, SceneObject};
use super::vertex::{LineVertex, NodeInstance};
use crate::config::EditorConfig;
use crate::events::{ChangePayload, NodeChanges};
use crate::gfx::color::Color;
use crate::gfx::picking::{pick_nearest, PickResult, Ray};
use crate::model::{collect_descendant_ids, Architecture, Node, DEFAULT_COLOR};
use crate::performance::SyncMetrics;

/// Spin rate range for new objects, radians per reference frame
const SPIN_SPEED_RANGE: std::ops::Range<f32> = 0.005..0.015;

/// Frame rate the spin rates are expressed against
const REFERENCE_FPS: f32 = 60.0;

/// The derived, disposable projection of the model.
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    index: HashMap<String, usize>,
    connectors: BTreeMap<ConnectorKey, Connector>,
    staged_removals: HashMap<String, Vec<String>>,
    default_color: Color,
    animate: bool,
    generation: u64,
    metrics: SyncMetrics,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let default_color = Color::from_hex(&config.default_color).unwrap_or_else(|| {
            log::warn!(
                "Configured default color `{}` is not #rrggbb, using {}",
                config.default_color,
                DEFAULT_COLOR
            );
            Color::new(0x66, 0x66, 0x66)
        });

        Self {
            objects: Vec::new(),
            index: HashMap::new(),
            connectors: BTreeMap::new(),
            staged_removals: HashMap::new(),
            default_color,
            animate: config.animate,
            generation: 0,
            metrics: SyncMetrics::default(),
        }
    }

    /// Bring the scene up to date with `model` after `payload`.
    pub fn apply(&mut self, model: &Architecture, payload: &ChangePayload) {
        match payload {
            ChangePayload::Rebuild => self.rebuild(model),
            ChangePayload::LegendChanged => {
                log::debug!("Legend changed, rebuilding scene");
                self.rebuild(model);
            }
            ChangePayload::NodeUpdated { id, changes } => {
                if !self.patch_node(model, id, changes) {
                    log::warn!("node-updated for `{}` which has no object, rebuilding", id);
                    self.fallback_rebuild(model);
                }
            }
            ChangePayload::NodeAdded { id, parent_id } => {
                if !self.attach_node(model, id, parent_id.as_deref()) {
                    log::warn!("node-added for `{}` could not be attached, rebuilding", id);
                    self.fallback_rebuild(model);
                }
            }
            ChangePayload::NodeRemoved { id } => {
                self.remove_subtree(id);
            }
        }
    }

    /// Discard every object and recreate the scene from the root.
    pub fn rebuild(&mut self, model: &Architecture) {
        self.rebuild_from(model, false);
    }

    fn fallback_rebuild(&mut self, model: &Architecture) {
        self.rebuild_from(model, true);
    }

    fn rebuild_from(&mut self, model: &Architecture, fallback: bool) {
        let timer = self.metrics.begin_rebuild();

        self.objects.clear();
        self.index.clear();
        self.connectors.clear();
        self.staged_removals.clear();

        model.root.walk(&mut |node, parent| {
            self.insert_object(model, node, parent.map(|parent| parent.id.as_str()));
        });

        self.generation += 1;
        self.metrics.end_rebuild(timer, self.objects.len(), fallback);
        log::debug!(
            "Rebuilt scene: {} objects, {} connectors",
            self.objects.len(),
            self.connectors.len()
        );
    }

    /// Apply `changes` to the object for `id` in place.
    ///
    /// Returns `false` when there is no such object.
    pub fn patch_node(&mut self, model: &Architecture, id: &str, changes: &NodeChanges) -> bool {
        let Some(&slot) = self.index.get(id) else {
            return false;
        };

        let color = changes
            .color
            .as_deref()
            .map(|hex| self.parse_patch_color(model, id, hex));

        let object = &mut self.objects[slot];
        if let Some(name) = &changes.name {
            object.name = name.clone();
        }
        if let Some(scale) = changes.scale {
            object.scale = scale;
        }
        if let Some(color) = color {
            object.color = color;
            for connector in self.connectors.values_mut() {
                if connector.parent_id == id {
                    connector.color = color;
                }
            }
        }
        if let Some(pos) = changes.pos {
            self.move_object(id, Vector3::from(pos));
        }

        self.metrics.patches += 1;
        log::debug!("Patched object `{}`", id);
        true
    }

    /// Create objects for `id` (and anything already under it) and connect
    /// it to its parent.
    ///
    /// Without `parent_id` the parent is looked up in the model. Returns
    /// `false` when the node is missing from the model, already has an
    /// object, or its parent has no object.
    pub fn attach_node(&mut self, model: &Architecture, id: &str, parent_id: Option<&str>) -> bool {
        let Some(node) = model.find(id) else {
            return false;
        };
        if self.index.contains_key(id) {
            return false;
        }

        let parent_id = match parent_id {
            Some(parent_id) => Some(parent_id),
            None => model.parent_of(id).map(|parent| parent.id.as_str()),
        };
        if parent_id.is_some_and(|parent_id| !self.index.contains_key(parent_id)) {
            return false;
        }

        let mut attached = 0;
        node.walk(&mut |node, parent| {
            let parent_id = parent.map(|parent| parent.id.as_str()).or(parent_id);
            self.insert_object(model, node, parent_id);
            attached += 1;
        });

        self.metrics.additions += attached;
        log::debug!("Attached `{}` ({} objects)", id, attached);
        true
    }

    /// Record the descendants of `id` while its subtree is still in `model`.
    ///
    /// Must run before the node is unlinked. Returns the number staged.
    pub fn stage_removal(&mut self, model: &Architecture, id: &str) -> usize {
        match collect_descendant_ids(&model.root, id) {
            Some(descendants) => {
                let staged = descendants.len();
                self.staged_removals.insert(id.to_string(), descendants);
                staged
            }
            None => 0,
        }
    }

    /// Detach the object for `id`, every descendant, and all their
    /// connectors. Returns the number of objects removed.
    pub fn remove_subtree(&mut self, id: &str) -> usize {
        let descendants = match self.staged_removals.remove(id) {
            Some(staged) => staged,
            None => {
                let found = self.descendants_from_connectors(id);
                if !found.is_empty() {
                    log::warn!(
                        "Removal of `{}` was not staged, found {} descendants from connectors",
                        id,
                        found.len()
                    );
                }
                found
            }
        };

        let mut removed = usize::from(self.detach(id));
        for descendant in &descendants {
            removed += usize::from(self.detach(descendant));
        }

        self.metrics.removals += removed as u64;
        log::debug!("Removed `{}` and {} descendants", id, descendants.len());
        removed
    }

    fn descendants_from_connectors(&self, id: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            for connector in self.connectors.values() {
                if connector.parent_id == current {
                    found.push(connector.child_id.clone());
                    stack.push(connector.child_id.clone());
                }
            }
        }
        found
    }

    fn detach(&mut self, id: &str) -> bool {
        self.connectors.retain(|_, connector| !connector.touches(id));

        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.objects.swap_remove(slot);
        if let Some(moved) = self.objects.get(slot) {
            self.index.insert(moved.node_id.clone(), slot);
        }
        true
    }

    /// Move the object for `id` and drag its connector endpoints along.
    pub fn move_object(&mut self, id: &str, position: Vector3<f32>) -> bool {
        let Some(&slot) = self.index.get(id) else {
            return false;
        };
        self.objects[slot].position = position;

        for connector in self.connectors.values_mut() {
            if connector.parent_id == id {
                connector.start = position;
            }
            if connector.child_id == id {
                connector.end = position;
            }
        }
        true
    }

    fn insert_object(&mut self, model: &Architecture, node: &Node, parent_id: Option<&str>) {
        let object = SceneObject::from_node(node, self.resolve_color(model, node), self.spin_speed());

        let connector = parent_id
            .and_then(|parent_id| self.object(parent_id))
            .map(|parent| Connector::between(parent, &object));
        if let Some(connector) = connector {
            self.connectors.insert(connector.key(), connector);
        }

        self.index.insert(node.id.clone(), self.objects.len());
        self.objects.push(object);
    }

    fn resolve_color(&self, model: &Architecture, node: &Node) -> Color {
        let fallback = self.default_color.to_hex();
        let hex = model.color_of_or(node, &fallback);
        Color::from_hex(hex).unwrap_or_else(|| {
            log::warn!("Node `{}` has malformed color `{}`", node.id, hex);
            self.default_color
        })
    }

    fn parse_patch_color(&self, model: &Architecture, id: &str, hex: &str) -> Color {
        Color::from_hex(hex).unwrap_or_else(|| {
            log::warn!("Ignoring malformed color `{}` for `{}`", hex, id);
            model
                .find(id)
                .map(|node| self.resolve_color(model, node))
                .unwrap_or(self.default_color)
        })
    }

    fn spin_speed(&self) -> f32 {
        if self.animate {
            rand::rng().random_range(SPIN_SPEED_RANGE)
        } else {
            0.0
        }
    }

    /// Advance every object's spin by `delta_time` seconds
    pub fn animate(&mut self, delta_time: f32) {
        let frames = delta_time * REFERENCE_FPS;
        for object in &mut self.objects {
            object.rotation += object.spin_speed * frames;
        }
    }

    /// Nearest object hit by `ray`
    pub fn pick(&self, ray: &Ray) -> Option<PickResult<&str>> {
        pick_nearest(
            ray,
            self.objects
                .iter()
                .map(|object| (object.node_id.as_str(), object.bounds())),
        )
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.index.get(id).map(|&slot| &self.objects[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn connector(&self, parent_id: &str, child_id: &str) -> Option<&Connector> {
        self.connectors.get(&(parent_id.to_string(), child_id.to_string()))
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Color of nodes that neither the legend nor their own color covers
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Bumped on every rebuild; object references from an older generation
    /// are stale
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }

    /// Instance data for every object, in arena order
    pub fn instances(&self) -> Vec<NodeInstance> {
        self.objects.iter().map(NodeInstance::from).collect()
    }

    /// Line-list vertices for every connector
    pub fn connector_vertices(&self) -> Vec<LineVertex> {
        self.connectors.values().flat_map(LineVertex::pair).collect()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
