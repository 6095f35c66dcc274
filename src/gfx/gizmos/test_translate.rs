//! Drag sessions against a real scene graph

#[cfg(test)]
mod tests {
    use super::super::axis::Axis;
    use super::super::translate::{closest_point_on_axis, DragState, ManipulationController};
    use crate::events::{ChangeBus, ChangePayload, NodeChanges};
    use crate::gfx::picking::Ray;
    use crate::gfx::scene::SceneGraph;
    use crate::model::{Architecture, Node};
    use cgmath::Vector3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    fn scene_with_box() -> (Architecture, SceneGraph) {
        let root = Node::new("root", [0.0, 0.0, 0.0])
            .with_id("root")
            .with_child(Node::new("box", [2.0, 0.0, 0.0]).with_id("box"));
        let model = Architecture::new(root);
        let mut scene = SceneGraph::new();
        scene.rebuild(&model);
        (model, scene)
    }

    /// Ray straight down onto the X shaft of a gizmo at `anchor`
    fn ray_onto_x_shaft(anchor: Vector3<f32>) -> Ray {
        Ray::new(anchor + Vector3::new(0.5, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_projection_onto_vertical_axis() {
        let ray = Ray::new(Vector3::new(10.0, 3.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let point = closest_point_on_axis(Vector3::new(0.0, 0.0, 0.0), Vector3::unit_y(), &ray);
        assert_eq!(point, Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_projection_with_offset_anchor_and_oblique_ray() {
        let anchor = Vector3::new(1.0, 2.0, 3.0);
        let ray = Ray::new(Vector3::new(4.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let point = closest_point_on_axis(anchor, Vector3::unit_x(), &ray);
        assert!(close(point, Vector3::new(4.0, 2.0, 3.0)));
    }

    #[test]
    fn test_parallel_ray_returns_anchor() {
        let anchor = Vector3::new(1.0, 1.0, 1.0);
        let ray = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let point = closest_point_on_axis(anchor, Vector3::unit_y(), &ray);
        assert_eq!(point, anchor);
    }

    #[test]
    fn test_hidden_gizmo_ignores_pointer_down() {
        let mut controller = ManipulationController::default();
        let ray = ray_onto_x_shaft(Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(controller.pointer_down(&ray, Some("box")), None);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_arrowheads_resolve_to_their_axis() {
        let mut controller = ManipulationController::default();
        controller.show_at(Vector3::new(0.0, 0.0, 0.0));

        let down_z = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(controller.pointer_down(&down_z, None), Some(Axis::Z));
        assert_eq!(controller.state(), DragState::AxisDragging(Axis::Z));
    }

    #[test]
    fn test_miss_stays_idle() {
        let mut controller = ManipulationController::default();
        controller.show_at(Vector3::new(0.0, 0.0, 0.0));
        let ray = Ray::new(Vector3::new(3.0, 3.0, 3.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(controller.pointer_down(&ray, Some("box")), None);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_drag_moves_object_along_axis_and_commits() {
        let (model, mut scene) = scene_with_box();
        let anchor = scene.object("box").unwrap().position;
        let mut controller = ManipulationController::default();
        controller.show_at(anchor);

        assert_eq!(
            controller.pointer_down(&ray_onto_x_shaft(anchor), Some("box")),
            Some(Axis::X)
        );

        let ray = Ray::new(Vector3::new(5.0, 4.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let point = controller.pointer_move(&ray, &mut scene).unwrap();
        assert!(close(point, Vector3::new(5.0, 0.0, 0.0)));
        assert!(close(scene.object("box").unwrap().position, point));
        assert!(close(scene.connector("root", "box").unwrap().end, point));
        assert!(close(controller.anchor(), point));

        let commit = controller.pointer_up(&scene).unwrap();
        assert_eq!(controller.state(), DragState::Idle);
        assert_eq!(commit.node_id, "box");
        assert_eq!(commit.axis, Axis::X);

        let model = RefCell::new(model);
        let mut bus = ChangeBus::<ChangePayload>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |payload: &ChangePayload| {
            sink.borrow_mut().push(payload.clone());
            Ok(())
        });

        assert!(commit.apply(&model, &mut bus));
        assert!(close(model.borrow().find("box").unwrap().position(), point));
        assert_eq!(
            *seen.borrow(),
            vec![ChangePayload::node_updated("box", NodeChanges::position(point.into()))]
        );
    }

    #[test]
    fn test_move_without_object_does_nothing() {
        let (_, mut scene) = scene_with_box();
        let mut controller = ManipulationController::default();
        controller.show_at(Vector3::new(0.0, 0.0, 0.0));
        controller.pointer_down(&ray_onto_x_shaft(Vector3::new(0.0, 0.0, 0.0)), Some("ghost"));

        let ray = Ray::new(Vector3::new(5.0, 4.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(controller.pointer_move(&ray, &mut scene), None);
        assert_eq!(controller.anchor(), Vector3::new(0.0, 0.0, 0.0));
        assert!(controller.pointer_up(&scene).is_none());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_commit_for_deleted_node_is_dropped() {
        let (model, scene) = scene_with_box();
        let mut controller = ManipulationController::default();
        let anchor = scene.object("box").unwrap().position;
        controller.show_at(anchor);
        controller.pointer_down(&ray_onto_x_shaft(anchor), Some("box"));
        let commit = controller.pointer_up(&scene).unwrap();

        let model = RefCell::new(model);
        crate::model::delete_by_id(&mut model.borrow_mut().root, "box");
        let mut bus = ChangeBus::<ChangePayload>::new();
        assert!(!commit.apply(&model, &mut bus));
    }
}
