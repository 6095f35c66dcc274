//! # Diagram Editor
//!
//! [`DiagramEditor`] is the application context. It owns the model, both
//! buses, the scene graph, the selection and the gizmo, and wires them
//! together at construction:
//!
//! 1. the scene synchronizer listens on the change bus first,
//! 2. the selection listener second, so the gizmo is always re-anchored
//!    against the scene as it stands after the patch.
//!
//! Every editing operation mutates the model and then emits one change
//! payload. The UI collaborator calls these operations and reads back
//! through the query methods; it never touches the scene directly.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use anyhow::Context;
use cgmath::Vector3;

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::events::{
    ChangeBus, ChangeKind, ChangePayload, Clock, ListenerId, NodeChanges, SystemClock,
    UpdateOptions,
};
use crate::gfx::color::Color;
use crate::gfx::gizmos::{Axis, ManipulationController};
use crate::gfx::picking::Ray;
use crate::gfx::scene::{LineVertex, NodeInstance, SceneGraph, SceneObject};
use crate::model::ids::mint_unique_id;
use crate::model::{self, Architecture, LegendEntry, Node};
use crate::performance::SyncMetrics;
use crate::selection::{SelectionCoordinator, SelectionEvent};

pub struct DiagramEditor {
    config: EditorConfig,
    model: Rc<RefCell<Architecture>>,
    bus: ChangeBus<ChangePayload>,
    selection_bus: ChangeBus<SelectionEvent>,
    scene: Rc<RefCell<SceneGraph>>,
    selection: Rc<RefCell<SelectionCoordinator>>,
    gizmo: Rc<RefCell<ManipulationController>>,
}

impl DiagramEditor {
    /// Create an editor holding an empty architecture
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create an editor whose debounce windows run on `clock`
    pub fn with_clock(config: EditorConfig, clock: impl Clock + 'static) -> Self {
        let model = Rc::new(RefCell::new(Architecture::empty()));
        let scene = Rc::new(RefCell::new(SceneGraph::with_config(&config)));
        let selection = Rc::new(RefCell::new(SelectionCoordinator::new(config.edit_mode)));
        let gizmo = Rc::new(RefCell::new(ManipulationController::new(config.handle_scale)));

        let mut bus = ChangeBus::with_clock(clock);

        let (sync_model, sync_scene) = (Rc::clone(&model), Rc::clone(&scene));
        bus.subscribe(move |payload: &ChangePayload| {
            let model = sync_model
                .try_borrow()
                .context("model is being mutated during notification")?;
            let mut scene = sync_scene
                .try_borrow_mut()
                .context("scene graph is already borrowed")?;
            scene.apply(&model, payload);
            Ok(())
        });

        let (sel_scene, sel_selection, sel_gizmo) =
            (Rc::clone(&scene), Rc::clone(&selection), Rc::clone(&gizmo));
        bus.subscribe(move |_: &ChangePayload| {
            let scene = sel_scene.try_borrow().context("scene graph is borrowed")?;
            let mut gizmo = sel_gizmo.try_borrow_mut().context("gizmo is borrowed")?;
            sel_selection
                .try_borrow()
                .context("selection is borrowed")?
                .refresh(&scene, &mut gizmo);
            Ok(())
        });

        let mut editor = Self {
            config,
            model,
            bus,
            selection_bus: ChangeBus::new(),
            scene,
            selection,
            gizmo,
        };
        editor.bus.emit(&ChangePayload::Rebuild);
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ---- loading ------------------------------------------------------

    /// Replace the whole document and rebuild the scene.
    pub fn load(&mut self, mut archive: Architecture) {
        archive.normalize();
        let nodes = archive.node_count();

        let dropped = self.bus.cancel_all();
        if dropped > 0 {
            log::debug!("Dropped {} pending notifications for the previous document", dropped);
        }

        let title = archive.title.clone();
        self.bus.update(
            &self.model,
            |model| *model = archive,
            ChangePayload::Rebuild,
            UpdateOptions::immediate(),
        );
        log::info!("Loaded `{}` with {} nodes", title, nodes);
    }

    pub fn load_sample(&mut self) {
        self.load(Architecture::sample());
    }

    pub fn load_json(&mut self, text: &str) -> Result<()> {
        let archive = Architecture::from_json(text)?;
        self.load(archive);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        self.model.borrow().to_json()
    }

    // ---- node edits -----------------------------------------------------

    /// Move a node. With `debounced`, a burst of moves produces a single
    /// notification once the configured quiet window has passed.
    pub fn set_position(&mut self, id: &str, pos: [f32; 3], debounced: bool) -> Result<()> {
        self.ensure_node(id)?;
        let options = if debounced {
            UpdateOptions::debounced(self.config.debounce())
        } else {
            UpdateOptions::immediate()
        };

        self.bus.update(
            &self.model,
            |model| {
                if let Some(node) = model.find_mut(id) {
                    node.pos = pos;
                }
            },
            ChangePayload::node_updated(id, NodeChanges::position(pos)),
            options,
        );
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        self.ensure_node(id)?;
        self.bus.update(
            &self.model,
            |model| {
                if let Some(node) = model.find_mut(id) {
                    node.name = name.to_string();
                }
            },
            ChangePayload::node_updated(id, NodeChanges::name(name)),
            UpdateOptions::immediate(),
        );
        Ok(())
    }

    pub fn set_scale(&mut self, id: &str, scale: f32) -> Result<()> {
        self.ensure_node(id)?;
        self.bus.update(
            &self.model,
            |model| {
                if let Some(node) = model.find_mut(id) {
                    node.scale = scale;
                }
            },
            ChangePayload::node_updated(id, NodeChanges::scale(scale)),
            UpdateOptions::immediate(),
        );
        Ok(())
    }

    /// Point a node at a legend entry, or clear its category and color with
    /// `None`.
    pub fn assign_category(&mut self, id: &str, category: Option<&str>) -> Result<()> {
        self.ensure_node(id)?;
        let color = match category {
            Some(category) => self
                .model
                .borrow()
                .legend_entry(category)
                .ok_or_else(|| EditorError::LegendEntryNotFound(category.to_string()))?
                .color()
                .map(str::to_string),
            None => None,
        };
        let resolved = color
            .clone()
            .unwrap_or_else(|| self.scene.borrow().default_color().to_hex());

        self.bus.update(
            &self.model,
            |model| {
                if let Some(node) = model.find_mut(id) {
                    node.category = category.map(str::to_string);
                    node.color = color;
                }
            },
            ChangePayload::node_updated(id, NodeChanges::color(resolved)),
            UpdateOptions::immediate(),
        );
        Ok(())
    }

    /// Append a new leaf under `parent_id`. Returns the new node's id.
    pub fn add_child(&mut self, parent_id: &str) -> Result<String> {
        let (id, child) = {
            let model = self.model.borrow();
            let parent = model
                .find(parent_id)
                .ok_or_else(|| EditorError::NodeNotFound(parent_id.to_string()))?;

            let id = mint_unique_id(&mut model.node_ids());
            let position = parent.position() + Vector3::from(self.config.new_child_offset);
            let child =
                Node::new(self.config.new_child_name.clone(), position.into()).with_id(id.clone());
            (id, child)
        };

        self.bus.update(
            &self.model,
            |arch| model::add_child(&mut arch.root, parent_id, child),
            ChangePayload::node_added(id.clone(), parent_id),
            UpdateOptions::immediate(),
        );
        log::info!("Added `{}` under `{}`", id, parent_id);
        Ok(id)
    }

    /// Delete a node and its subtree. The root is refused.
    pub fn delete_node(&mut self, id: &str) -> Result<()> {
        let descendants = {
            let model = self.model.borrow();
            if model.root.id == id {
                log::warn!("Refusing to delete the root node");
                return Err(EditorError::CannotDeleteRoot);
            }
            let descendants = model::collect_descendant_ids(&model.root, id)
                .ok_or_else(|| EditorError::NodeNotFound(id.to_string()))?;
            self.scene.borrow_mut().stage_removal(&model, id);
            descendants
        };

        self.bus.update(
            &self.model,
            |arch| model::delete_by_id(&mut arch.root, id),
            ChangePayload::node_removed(id),
            UpdateOptions::immediate(),
        );
        log::info!("Deleted `{}` and {} descendants", id, descendants.len());

        let selection_removed = self
            .selected_id()
            .is_some_and(|selected| selected == id || descendants.iter().any(|d| *d == selected));
        if selection_removed {
            self.deselect();
        }
        Ok(())
    }

    // ---- legend -------------------------------------------------------

    /// Add a legend entry. Returns its minted id.
    pub fn add_legend_entry(&mut self, name: &str, color: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyLegendName);
        }
        Color::parse(color)?;

        let id = {
            let model = self.model.borrow();
            let mut taken = model.legend.iter().map(|entry| entry.id.clone()).collect();
            mint_unique_id(&mut taken)
        };
        let entry = LegendEntry::new(id.clone(), name, color);

        self.legend_update(|model| model.legend.push(entry));
        Ok(id)
    }

    /// Recolor a legend entry and every node that references it.
    pub fn set_legend_color(&mut self, id: &str, color: &str) -> Result<()> {
        self.ensure_legend_entry(id)?;
        Color::parse(color)?;

        self.legend_update(|arch| {
            if let Some(entry) = arch.legend_entry_mut(id) {
                entry.color = color.to_string();
            }
            model::visit_mut(&mut arch.root, &mut |node| {
                if node.category.as_deref() == Some(id) {
                    node.color = Some(color.to_string());
                }
            });
        });
        Ok(())
    }

    pub fn rename_legend_entry(&mut self, id: &str, name: &str) -> Result<()> {
        self.ensure_legend_entry(id)?;
        self.legend_update(|model| {
            if let Some(entry) = model.legend_entry_mut(id) {
                entry.name = name.to_string();
            }
        });
        Ok(())
    }

    /// Remove a legend entry. Nodes that referenced it lose their category
    /// and keep their last color.
    pub fn remove_legend_entry(&mut self, id: &str) -> Result<()> {
        self.ensure_legend_entry(id)?;
        self.legend_update(|arch| {
            arch.legend.retain(|entry| entry.id != id);
            model::visit_mut(&mut arch.root, &mut |node| {
                if node.category.as_deref() == Some(id) {
                    node.category = None;
                }
            });
        });
        Ok(())
    }

    fn legend_update(&mut self, mutator: impl FnOnce(&mut Architecture)) {
        self.bus.update(
            &self.model,
            mutator,
            ChangePayload::LegendChanged,
            UpdateOptions::immediate(),
        );
    }

    /// The title is document metadata only; the scene is not notified.
    pub fn set_title(&mut self, title: &str) {
        self.model.borrow_mut().title = title.to_string();
    }

    // ---- selection ----------------------------------------------------

    pub fn select(&mut self, id: &str) -> Result<()> {
        self.ensure_node(id)?;
        let event = self.selection.borrow_mut().select(id);
        self.selection_changed(event);
        Ok(())
    }

    pub fn deselect(&mut self) {
        let event = self.selection.borrow_mut().deselect();
        self.selection_changed(event);
    }

    /// Select the nearest object under `ray`, or deselect on a miss.
    /// Returns the selected id afterward.
    pub fn click(&mut self, ray: &Ray) -> Option<String> {
        let event = self.selection.borrow_mut().pick(&self.scene.borrow(), ray);
        self.selection_changed(event);
        self.selected_id()
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.selection.borrow_mut().set_edit_mode(edit_mode);
        self.refresh_gizmo();
    }

    fn selection_changed(&mut self, event: Option<SelectionEvent>) {
        self.refresh_gizmo();
        if let Some(event) = event {
            log::debug!("Selection: {:?}", event);
            self.selection_bus.emit(&event);
        }
    }

    fn refresh_gizmo(&self) {
        self.selection
            .borrow()
            .refresh(&self.scene.borrow(), &mut self.gizmo.borrow_mut());
    }

    // ---- manipulation -------------------------------------------------

    /// Grab a gizmo handle. Returns the axis grabbed, if any.
    pub fn pointer_down(&mut self, ray: &Ray) -> Option<Axis> {
        let selected = self.selected_id();
        self.gizmo.borrow_mut().pointer_down(ray, selected.as_deref())
    }

    /// Continue a drag. Returns where the dragged object now sits.
    pub fn pointer_move(&mut self, ray: &Ray) -> Option<Vector3<f32>> {
        self.gizmo
            .borrow_mut()
            .pointer_move(ray, &mut self.scene.borrow_mut())
    }

    /// Release a drag and commit the final position to the model.
    /// Returns `true` if a position was committed.
    pub fn pointer_up(&mut self) -> bool {
        let commit = self.gizmo.borrow_mut().pointer_up(&self.scene.borrow());
        match commit {
            Some(commit) => commit.apply(&self.model, &mut self.bus),
            None => false,
        }
    }

    // ---- time ---------------------------------------------------------

    /// Fire debounced notifications whose quiet window has elapsed
    pub fn poll(&mut self) -> usize {
        self.bus.poll()
    }

    /// Fire every debounced notification now
    pub fn flush(&mut self) -> usize {
        self.bus.flush()
    }

    pub fn has_pending(&self, kind: ChangeKind) -> bool {
        self.bus.has_pending(kind)
    }

    /// Advance per-object animation by `delta_time` seconds
    pub fn animate(&mut self, delta_time: f32) {
        self.scene.borrow_mut().animate(delta_time);
    }

    // ---- queries ------------------------------------------------------

    pub fn model(&self) -> Ref<'_, Architecture> {
        self.model.borrow()
    }

    pub fn scene(&self) -> Ref<'_, SceneGraph> {
        self.scene.borrow()
    }

    pub fn find_node(&self, id: &str) -> Option<Node> {
        self.model.borrow().find(id).cloned()
    }

    /// Resolved color of a node
    pub fn color_of(&self, id: &str) -> Option<String> {
        let fallback = self.scene.borrow().default_color().to_hex();
        let model = self.model.borrow();
        model
            .find(id)
            .map(|node| model.color_of_or(node, &fallback).to_string())
    }

    pub fn object(&self, id: &str) -> Option<SceneObject> {
        self.scene.borrow().object(id).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.scene.borrow().object_count()
    }

    pub fn connector_count(&self) -> usize {
        self.scene.borrow().connector_count()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selection.borrow().selected_id().map(str::to_string)
    }

    pub fn gizmo_visible(&self) -> bool {
        self.gizmo.borrow().is_visible()
    }

    pub fn gizmo_anchor(&self) -> Vector3<f32> {
        self.gizmo.borrow().anchor()
    }

    pub fn is_dragging(&self) -> bool {
        self.gizmo.borrow().is_dragging()
    }

    pub fn sync_metrics(&self) -> SyncMetrics {
        self.scene.borrow().metrics().clone()
    }

    pub fn instances(&self) -> Vec<NodeInstance> {
        self.scene.borrow().instances()
    }

    pub fn connector_vertices(&self) -> Vec<LineVertex> {
        self.scene.borrow().connector_vertices()
    }

    // ---- observers ----------------------------------------------------

    /// Listen for model changes. Runs after the scene and selection have
    /// been updated for the same payload.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangePayload) -> anyhow::Result<()> + 'static,
    {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn on_select<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&SelectionEvent) -> anyhow::Result<()> + 'static,
    {
        self.selection_bus.subscribe(listener)
    }

    pub fn off_select(&mut self, id: ListenerId) -> bool {
        self.selection_bus.unsubscribe(id)
    }

    fn ensure_node(&self, id: &str) -> Result<()> {
        match self.model.borrow().find(id) {
            Some(_) => Ok(()),
            None => Err(EditorError::NodeNotFound(id.to_string())),
        }
    }

    fn ensure_legend_entry(&self, id: &str) -> Result<()> {
        match self.model.borrow().legend_entry(id) {
            Some(_) => Ok(()),
            None => Err(EditorError::LegendEntryNotFound(id.to_string())),
        }
    }
}

impl Default for DiagramEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
