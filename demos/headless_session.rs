//! A scripted editing session without a window: load the sample, drag a
//! component along X, add and delete nodes, and log what the scene did.
//!
//! Run with `RUST_LOG=debug` to see every dispatch decision.

use anyhow::{bail, Context};
use archgraph::prelude::*;

fn main() -> anyhow::Result<()> {
    archgraph::init_logging();

    let mut editor = DiagramEditor::new(EditorConfig::default().with_debounce_ms(0));
    editor.load_sample();
    editor.subscribe(|payload: &ChangePayload| {
        log::info!("observed {}", payload.encode()?);
        Ok(())
    });

    let component = editor
        .model()
        .root
        .children
        .first()
        .and_then(|module| module.children.first())
        .map(|node| node.id.clone())
        .context("sample has no components")?;

    editor.select(&component)?;
    let anchor = editor.gizmo_anchor();
    let grab = Ray::new(anchor + Vector3::new(0.5, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
    if editor.pointer_down(&grab) != Some(Axis::X) {
        bail!("expected to grab the X handle at {:?}", anchor);
    }
    for step in 1..=5 {
        let x = anchor.x + step as f32;
        let ray = Ray::new(
            Vector3::new(x, anchor.y + 4.0, anchor.z + 20.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        editor.pointer_move(&ray);
        editor.animate(1.0 / 60.0);
    }
    editor.pointer_up();

    let child = editor.add_child(&component)?;
    editor.rename(&child, "Sidecar")?;

    let root = editor.model().root.id.clone();
    if let Err(err) = editor.delete_node(&root) {
        log::warn!("{}", err);
    }

    let module = editor.model().root.children[1].id.clone();
    editor.delete_node(&module)?;

    log::info!(
        "{} objects, {} connectors; {}",
        editor.object_count(),
        editor.connector_count(),
        editor.sync_metrics().summary()
    );
    let instances = editor.instances();
    log::info!(
        "render export: {} instances ({} bytes), {} line vertices",
        instances.len(),
        std::mem::size_of_val(instances.as_slice()),
        editor.connector_vertices().len()
    );
    Ok(())
}
