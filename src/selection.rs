//! # Selection
//!
//! [`SelectionCoordinator`] holds the one canonical selected node id. It
//! never keeps a reference to a scene object: every query resolves the id
//! against the scene's current id table, so a selection survives rebuilds
//! and a selection whose node is gone simply resolves to nothing.

use crate::events::Payload;
use crate::gfx::gizmos::ManipulationController;
use crate::gfx::picking::Ray;
use crate::gfx::scene::{SceneGraph, SceneObject};

/// Published on the selection bus whenever the selected id changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(String),
    Deselected,
}

impl SelectionEvent {
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            SelectionEvent::Selected(id) => Some(id),
            SelectionEvent::Deselected => None,
        }
    }
}

impl Payload for SelectionEvent {
    // One kind: selection changes all debounce together
    type Kind = ();

    fn kind(&self) {}
}

#[derive(Debug, Clone)]
pub struct SelectionCoordinator {
    selected: Option<String>,
    edit_mode: bool,
}

impl SelectionCoordinator {
    pub fn new(edit_mode: bool) -> Self {
        Self {
            selected: None,
            edit_mode,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select `id`. Returns the event to publish, or `None` if unchanged.
    pub fn select(&mut self, id: impl Into<String>) -> Option<SelectionEvent> {
        let id = id.into();
        if self.selected.as_deref() == Some(id.as_str()) {
            return None;
        }
        self.selected = Some(id.clone());
        Some(SelectionEvent::Selected(id))
    }

    /// Clear the selection. Returns the event to publish, or `None` if
    /// nothing was selected.
    pub fn deselect(&mut self) -> Option<SelectionEvent> {
        self.selected.take().map(|_| SelectionEvent::Deselected)
    }

    /// The live object for the selected id, looked up now
    pub fn resolve<'a>(&self, scene: &'a SceneGraph) -> Option<&'a SceneObject> {
        scene.object(self.selected.as_deref()?)
    }

    /// Select whatever `ray` hits first, or deselect on a miss
    pub fn pick(&mut self, scene: &SceneGraph, ray: &Ray) -> Option<SelectionEvent> {
        match scene.pick(ray) {
            Some(hit) => self.select(hit.key),
            None => self.deselect(),
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    /// Show the gizmo at the resolved selection, or hide it when there is
    /// nothing to show (no selection, stale id, or edit mode off).
    pub fn refresh(&self, scene: &SceneGraph, gizmo: &mut ManipulationController) {
        match self.resolve(scene).filter(|_| self.edit_mode) {
            Some(object) => gizmo.show_at(object.position),
            None => gizmo.hide(),
        }
    }
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangePayload;
    use crate::model::{Architecture, Node};
    use cgmath::Vector3;

    fn scene() -> (Architecture, SceneGraph) {
        let root = Node::new("root", [0.0, 0.0, 0.0])
            .with_id("root")
            .with_child(Node::new("a", [3.0, 0.0, 0.0]).with_id("a"));
        let model = Architecture::new(root);
        let mut scene = SceneGraph::new();
        scene.rebuild(&model);
        (model, scene)
    }

    #[test]
    fn test_select_shows_gizmo_at_object() {
        let (_, scene) = scene();
        let mut selection = SelectionCoordinator::default();
        let mut gizmo = ManipulationController::default();

        assert_eq!(selection.select("a"), Some(SelectionEvent::Selected("a".to_string())));
        assert_eq!(selection.select("a"), None);
        selection.refresh(&scene, &mut gizmo);
        assert!(gizmo.is_visible());
        assert_eq!(gizmo.anchor(), Vector3::new(3.0, 0.0, 0.0));

        assert_eq!(selection.deselect(), Some(SelectionEvent::Deselected));
        assert_eq!(selection.deselect(), None);
        selection.refresh(&scene, &mut gizmo);
        assert!(!gizmo.is_visible());
    }

    #[test]
    fn test_resolution_survives_rebuild() {
        let (model, mut scene) = scene();
        let mut selection = SelectionCoordinator::default();
        selection.select("a");

        scene.apply(&model, &ChangePayload::Rebuild);
        assert_eq!(selection.resolve(&scene).unwrap().node_id, "a");
    }

    #[test]
    fn test_stale_selection_hides_gizmo() {
        let (_, mut scene) = scene();
        let mut selection = SelectionCoordinator::default();
        let mut gizmo = ManipulationController::default();
        selection.select("a");
        selection.refresh(&scene, &mut gizmo);

        scene.remove_subtree("a");
        assert!(selection.resolve(&scene).is_none());
        selection.refresh(&scene, &mut gizmo);
        assert!(!gizmo.is_visible());
        assert_eq!(selection.selected_id(), Some("a"));
    }

    #[test]
    fn test_edit_mode_off_keeps_gizmo_hidden() {
        let (_, scene) = scene();
        let mut selection = SelectionCoordinator::new(false);
        let mut gizmo = ManipulationController::default();
        selection.select("root");
        selection.refresh(&scene, &mut gizmo);
        assert!(!gizmo.is_visible());

        selection.set_edit_mode(true);
        selection.refresh(&scene, &mut gizmo);
        assert!(gizmo.is_visible());
    }

    #[test]
    fn test_pick_selects_or_clears() {
        let (_, scene) = scene();
        let mut selection = SelectionCoordinator::default();

        let hit = Ray::new(Vector3::new(3.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(
            selection.pick(&scene, &hit),
            Some(SelectionEvent::Selected("a".to_string()))
        );

        let miss = Ray::new(Vector3::new(3.0, 9.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(selection.pick(&scene, &miss), Some(SelectionEvent::Deselected));
        assert_eq!(selection.selected_id(), None);
    }
}
