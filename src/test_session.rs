//! Whole editing sessions through the editor context

#[cfg(test)]
mod tests {
    use crate::app::DiagramEditor;
    use crate::config::EditorConfig;
    use crate::error::EditorError;
    use crate::events::{ChangeKind, ChangePayload, ManualClock, NodeChanges};
    use crate::gfx::gizmos::Axis;
    use crate::gfx::picking::Ray;
    use crate::model::{Architecture, LegendEntry, Node};
    use crate::selection::SelectionEvent;
    use cgmath::Vector3;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Root, four modules, two components under each: 13 nodes
    fn three_level_archive() -> Architecture {
        let mut root = Node::new("Platform", [0.0, 0.0, 0.0]).with_id("root");
        for m in 1..=4 {
            let x = m as f32 * 10.0 - 25.0;
            let mut module = Node::new(format!("Module {}", m), [x, 5.0, 0.0])
                .with_id(format!("m{}", m))
                .with_category("legend-modules");
            for c in 1..=2 {
                module = module.with_child(
                    Node::new(format!("Component {}.{}", m, c), [x, 8.0, c as f32 * 4.0 - 6.0])
                        .with_id(format!("m{}c{}", m, c))
                        .with_scale(0.6),
                );
            }
            root = root.with_child(module);
        }

        let mut archive = Architecture::new(root);
        archive.legend = vec![LegendEntry::new("legend-modules", "Modules", "#ff00ff")];
        archive.title = "TEST PLATFORM".to_string();
        archive
    }

    fn recorder(editor: &mut DiagramEditor) -> Rc<RefCell<Vec<ChangePayload>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.subscribe(move |payload: &ChangePayload| {
            sink.borrow_mut().push(payload.clone());
            Ok(())
        });
        seen
    }

    fn loaded() -> DiagramEditor {
        let mut editor = DiagramEditor::default();
        editor.load(three_level_archive());
        editor
    }

    fn ray_onto_x_shaft(anchor: Vector3<f32>) -> Ray {
        Ray::new(anchor + Vector3::new(0.5, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_delete_module_drops_exactly_its_subtree() {
        let mut editor = loaded();
        assert_eq!(editor.object_count(), 13);
        assert_eq!(editor.connector_count(), 12);

        let siblings_before: Vec<_> = ["m2", "m2c1", "m2c2"]
            .iter()
            .map(|id| editor.object(id).unwrap())
            .collect();
        let rebuilds_before = editor.sync_metrics().rebuilds;

        editor.delete_node("m1").unwrap();

        assert_eq!(editor.object_count(), 10);
        assert_eq!(editor.connector_count(), 9);
        for id in ["m1", "m1c1", "m1c2"] {
            assert!(editor.object(id).is_none());
            assert!(editor.find_node(id).is_none());
        }
        let siblings_after: Vec<_> = ["m2", "m2c1", "m2c2"]
            .iter()
            .map(|id| editor.object(id).unwrap())
            .collect();
        assert_eq!(siblings_before, siblings_after);

        let metrics = editor.sync_metrics();
        assert_eq!(metrics.rebuilds, rebuilds_before);
        assert_eq!(metrics.removals, 3);
    }

    #[test]
    fn test_root_delete_is_refused() {
        let mut editor = loaded();
        let root = editor.model().root.id.clone();

        assert!(matches!(editor.delete_node(&root), Err(EditorError::CannotDeleteRoot)));
        assert!(matches!(editor.delete_node("nope"), Err(EditorError::NodeNotFound(_))));
        assert_eq!(editor.object_count(), 13);
    }

    #[test]
    fn test_debounced_moves_emit_once_with_last_position() {
        let clock = ManualClock::new();
        let config = EditorConfig::default().with_debounce_ms(100);
        let mut editor = DiagramEditor::with_clock(config, clock.clone());
        editor.load(three_level_archive());
        let seen = recorder(&mut editor);

        editor.set_position("m3", [1.0, 1.0, 1.0], true).unwrap();
        clock.advance(Duration::from_millis(50));
        editor.set_position("m3", [2.0, 2.0, 2.0], true).unwrap();
        clock.advance(Duration::from_millis(50));

        assert_eq!(editor.poll(), 0);
        assert!(editor.has_pending(ChangeKind::NodeUpdated));
        assert_eq!(editor.object("m3").unwrap().position, Vector3::new(5.0, 5.0, 0.0));
        assert_eq!(editor.find_node("m3").unwrap().pos, [2.0, 2.0, 2.0]);

        clock.advance(Duration::from_millis(50));
        assert_eq!(editor.poll(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![ChangePayload::node_updated("m3", NodeChanges::position([2.0, 2.0, 2.0]))]
        );
        assert_eq!(editor.object("m3").unwrap().position, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(editor.connector_vertices().len(), 24);
    }

    #[test]
    fn test_drag_commits_to_model() {
        let mut editor = DiagramEditor::default();
        editor.load_sample();
        let seen = recorder(&mut editor);
        let component = editor.model().root.children[0].children[0].id.clone();

        editor.select(&component).unwrap();
        assert!(editor.gizmo_visible());
        let anchor = editor.gizmo_anchor();
        assert_eq!(anchor, Vector3::new(15.0, 8.0, 5.0));

        assert_eq!(editor.pointer_down(&ray_onto_x_shaft(anchor)), Some(Axis::X));
        assert!(editor.is_dragging());

        let ray = Ray::new(Vector3::new(20.0, 12.0, 30.0), Vector3::new(0.0, 0.0, -1.0));
        let point = editor.pointer_move(&ray).unwrap();
        assert_eq!(point, Vector3::new(20.0, 8.0, 5.0));
        assert!(seen.borrow().is_empty());
        assert_eq!(editor.find_node(&component).unwrap().pos, [15.0, 8.0, 5.0]);

        assert!(editor.pointer_up());
        assert!(!editor.is_dragging());
        assert_eq!(editor.find_node(&component).unwrap().pos, [20.0, 8.0, 5.0]);
        assert_eq!(
            *seen.borrow(),
            vec![ChangePayload::node_updated(
                component.as_str(),
                NodeChanges::position([20.0, 8.0, 5.0])
            )]
        );
        assert_eq!(editor.gizmo_anchor(), point);
        assert!(!editor.pointer_up());
    }

    #[test]
    fn test_deleting_selected_subtree_clears_selection() {
        let mut editor = loaded();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        editor.on_select(move |event: &SelectionEvent| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });

        editor.select("m4c2").unwrap();
        assert!(editor.gizmo_visible());
        editor.delete_node("m4").unwrap();

        assert_eq!(editor.selected_id(), None);
        assert!(!editor.gizmo_visible());
        assert_eq!(
            *events.borrow(),
            vec![
                SelectionEvent::Selected("m4c2".to_string()),
                SelectionEvent::Deselected
            ]
        );
    }

    #[test]
    fn test_stale_selection_after_reload_degrades() {
        let mut editor = loaded();
        editor.select("m2c1").unwrap();

        editor.load_sample();

        assert_eq!(editor.selected_id().as_deref(), Some("m2c1"));
        assert!(!editor.gizmo_visible());
        let ray = ray_onto_x_shaft(editor.gizmo_anchor());
        assert_eq!(editor.pointer_down(&ray), None);
    }

    #[test]
    fn test_click_selects_nearest_or_clears() {
        let mut editor = loaded();
        let ray = Ray::new(Vector3::new(-15.0, 5.0, 20.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(editor.click(&ray).as_deref(), Some("m1"));

        let miss = Ray::new(Vector3::new(100.0, 0.0, 20.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(editor.click(&miss), None);
        assert!(!editor.gizmo_visible());
    }

    #[test]
    fn test_edit_mode_controls_gizmo() {
        let mut editor = DiagramEditor::new(EditorConfig::default().with_edit_mode(false));
        editor.load(three_level_archive());
        editor.select("m1").unwrap();
        assert!(!editor.gizmo_visible());

        editor.set_edit_mode(true);
        assert!(editor.gizmo_visible());
        assert_eq!(editor.gizmo_anchor(), Vector3::new(-15.0, 5.0, 0.0));
    }

    #[test]
    fn test_add_child_is_a_targeted_attach() {
        let mut editor = loaded();
        let rebuilds = editor.sync_metrics().rebuilds;

        let id = editor.add_child("m2").unwrap();

        let node = editor.find_node(&id).unwrap();
        assert_eq!(node.name, "New Node");
        assert_eq!(node.pos, [-5.0, 3.0, 0.0]);
        assert_eq!(editor.object_count(), 14);
        assert_eq!(editor.connector_count(), 13);
        assert_eq!(editor.sync_metrics().rebuilds, rebuilds);
        assert_eq!(editor.sync_metrics().additions, 1);
        assert!(matches!(editor.add_child("nope"), Err(EditorError::NodeNotFound(_))));
    }

    #[test]
    fn test_legend_edits() {
        let mut editor = loaded();
        assert_eq!(editor.color_of("m1").as_deref(), Some("#ff00ff"));

        let data = editor.add_legend_entry("Data", "#00ff00").unwrap();
        editor.assign_category("m1c1", Some(&data)).unwrap();
        assert_eq!(editor.color_of("m1c1").as_deref(), Some("#00ff00"));
        assert_eq!(editor.object("m1c1").unwrap().color.to_hex(), "#00ff00");

        editor.set_legend_color("legend-modules", "#123456").unwrap();
        assert_eq!(editor.object("m2").unwrap().color.to_hex(), "#123456");
        assert_eq!(editor.find_node("m2").unwrap().color.as_deref(), Some("#123456"));

        editor.remove_legend_entry("legend-modules").unwrap();
        let m2 = editor.find_node("m2").unwrap();
        assert_eq!(m2.category, None);
        assert_eq!(editor.color_of("m2").as_deref(), Some("#123456"));

        editor.assign_category("m1c1", None).unwrap();
        assert_eq!(editor.color_of("m1c1").as_deref(), Some("#666666"));

        assert!(matches!(
            editor.add_legend_entry("  ", "#ffffff"),
            Err(EditorError::EmptyLegendName)
        ));
        assert!(matches!(
            editor.add_legend_entry("Bad", "blue"),
            Err(EditorError::InvalidColor(_))
        ));
        assert!(matches!(
            editor.set_legend_color(&data, "#+f+f+f"),
            Err(EditorError::InvalidColor(_))
        ));
        assert!(matches!(
            editor.assign_category("m1", Some("missing")),
            Err(EditorError::LegendEntryNotFound(_))
        ));
    }

    #[test]
    fn test_failing_subscriber_does_not_stop_sync() {
        let mut editor = loaded();
        editor.subscribe(|_: &ChangePayload| Err(anyhow::anyhow!("observer broke")));

        editor.rename("m1", "Renamed").unwrap();
        editor.set_scale("m1", 2.0).unwrap();

        let object = editor.object("m1").unwrap();
        assert_eq!(object.name, "Renamed");
        assert_eq!(object.scale, 2.0);
    }

    #[test]
    fn test_json_roundtrip_and_title() {
        let mut editor = loaded();
        let seen = recorder(&mut editor);
        editor.set_title("RENAMED");
        assert!(seen.borrow().is_empty());

        let text = editor.to_json().unwrap();
        let mut other = DiagramEditor::default();
        other.load_json(&text).unwrap();

        assert_eq!(other.object_count(), 13);
        assert_eq!(other.model().title, "RENAMED");
        assert_eq!(other.color_of("m3c2"), editor.color_of("m3c2"));
        assert!(other.load_json("{ not json").is_err());
        assert_eq!(other.object_count(), 13);
    }

    #[test]
    fn test_reported_color_matches_rendered_color() {
        let mut editor = DiagramEditor::new(EditorConfig::default().with_default_color("#000000"));
        editor.load_sample();
        let root = editor.model().root.id.clone();

        assert_eq!(editor.color_of(&root).as_deref(), Some("#000000"));
        assert_eq!(editor.object(&root).unwrap().color.to_hex(), "#000000");

        editor.load(three_level_archive());
        editor.assign_category("m1c1", None).unwrap();
        assert_eq!(editor.color_of("m1c1").as_deref(), Some("#000000"));
        assert_eq!(editor.object("m1c1").unwrap().color.to_hex(), "#000000");
    }

    #[test]
    fn test_duplicate_ids_are_reassigned_on_load() {
        let json = r#"{
            "root": { "id": "R", "name": "R", "pos": [0, 0, 0], "children": [
                { "id": "dup", "name": "A", "pos": [1, 0, 0], "children": [
                    { "id": "a1", "name": "a1", "pos": [2, 0, 0] }
                ] },
                { "id": "dup", "name": "B", "pos": [-1, 0, 0] }
            ] }
        }"#;
        let mut editor = DiagramEditor::default();
        editor.load_json(json).unwrap();

        {
            let model = editor.model();
            assert_eq!(model.node_ids().len(), model.node_count());
        }
        assert_eq!(editor.object_count(), 4);

        editor.delete_node("dup").unwrap();
        assert!(editor.object("dup").is_none());
        assert!(editor.object("a1").is_none());
        assert_eq!(editor.object_count(), 2);
        let survivor = editor.model().root.children[0].id.clone();
        assert_eq!(editor.object(&survivor).unwrap().name, "B");
    }
}
