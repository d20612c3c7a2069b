//! End-to-end editor flows: layer lifecycle, undo/redo, drags, masks,
//! adjustment grading, and export capture working together.

use ph_app_state::LayerPatch;
use ph_common::{Adjustment, CanvasSize, LevelsParams, PixelBuffer};
use ph_editor::{Editor, EditorError, MaskHandle};

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    buf.fill(rgba);
    buf
}

#[test]
fn add_update_undo_redo_roundtrip() {
    let mut editor = Editor::new(CanvasSize::new(32, 32));
    let id = editor
        .import_image("Background", solid(32, 32, [40, 80, 120, 255]))
        .unwrap();
    assert_eq!(editor.history().undo_depth(), 1);
    assert_eq!(editor.document().selected_layer_id(), Some(&id));

    editor
        .update_layer(&id, &LayerPatch::position([10.0, 0.0]))
        .unwrap();
    assert_eq!(editor.history().undo_depth(), 2);
    assert_eq!(
        editor.document().find_layer(&id).unwrap().position(),
        Some([10.0, 0.0])
    );

    editor.undo().unwrap();
    assert_eq!(
        editor.document().find_layer(&id).unwrap().position(),
        Some([0.0, 0.0])
    );

    editor.redo().unwrap();
    assert_eq!(
        editor.document().find_layer(&id).unwrap().position(),
        Some([10.0, 0.0])
    );
}

#[test]
fn levels_adjustment_bakes_into_export() {
    let mut editor = Editor::new(CanvasSize::new(8, 8));
    editor
        .import_image("Gray", solid(8, 8, [50, 128, 200, 255]))
        .unwrap();
    editor
        .add_adjustment_layer(
            "Punch",
            Adjustment::Levels(LevelsParams {
                input_shadow: 50.0,
                input_highlight: 200.0,
                ..LevelsParams::default()
            }),
        )
        .unwrap();

    let out = editor.flatten_image(1).unwrap();
    let px = out.pixel(4, 4);
    // Shadow input crushed to 0, highlight input pushed to 255.
    assert_eq!(px[0], 0);
    assert_eq!(px[2], 255);
    assert_eq!(px[3], 255);
}

#[test]
fn opacity_clamp_holds_through_patch_and_export() {
    let mut editor = Editor::new(CanvasSize::new(4, 4));
    let id = editor
        .import_image("Layer", solid(4, 4, [255, 255, 255, 255]))
        .unwrap();

    editor
        .update_layer(
            &id,
            &LayerPatch {
                opacity: Some(1.5),
                ..LayerPatch::default()
            },
        )
        .unwrap();
    assert_eq!(editor.document().find_layer(&id).unwrap().opacity(), 1.0);

    editor
        .update_layer(
            &id,
            &LayerPatch {
                opacity: Some(-0.5),
                ..LayerPatch::default()
            },
        )
        .unwrap();
    assert_eq!(editor.document().find_layer(&id).unwrap().opacity(), 0.0);

    // A zero-opacity layer contributes nothing to the export.
    let out = editor.flatten_image(1).unwrap();
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn drag_at_zoom_records_single_history_entry() {
    let mut editor = Editor::new(CanvasSize::new(64, 64));
    let id = editor
        .import_image("Photo", solid(16, 16, [10, 20, 30, 255]))
        .unwrap();
    editor.set_zoom(2.0).unwrap();

    let depth_before = editor.history().undo_depth();
    editor.begin_layer_drag(&id, [200.0, 200.0]).unwrap();
    editor.update_drag([210.0, 204.0]);
    editor.update_drag([220.0, 210.0]);
    editor.end_drag();

    assert_eq!(editor.history().undo_depth(), depth_before + 1);
    assert_eq!(
        editor.document().find_layer(&id).unwrap().position(),
        Some([10.0, 5.0])
    );

    // One undo reverts the whole drag.
    editor.undo().unwrap();
    assert_eq!(
        editor.document().find_layer(&id).unwrap().position(),
        Some([0.0, 0.0])
    );
}

#[test]
fn mask_region_follows_layer_scale_and_clamps() {
    let mut editor = Editor::new(CanvasSize::new(128, 128));
    let id = editor
        .import_image("Photo", solid(64, 64, [200, 200, 200, 255]))
        .unwrap();

    editor
        .begin_mask_drag(&id, MaskHandle::Body, [32.0, 32.0])
        .unwrap();
    editor.update_drag([1000.0, 1000.0]);
    editor.end_drag();

    let region = editor.mask_region(&id).unwrap();
    assert_eq!(region.x + region.width, 64.0);
    assert_eq!(region.y + region.height, 64.0);
}

#[test]
fn stacked_adjustments_scope_to_layers_beneath() {
    let mut editor = Editor::new(CanvasSize::new(8, 8));
    editor
        .import_image("Base", solid(8, 8, [255, 0, 0, 255]))
        .unwrap();
    editor
        .add_adjustment_layer("Mono", Adjustment::Grayscale(100.0))
        .unwrap();
    let top = editor
        .import_image("Badge", solid(2, 2, [255, 0, 0, 255]))
        .unwrap();
    editor
        .update_layer(&top, &LayerPatch::position([6.0, 6.0]))
        .unwrap();

    let out = editor.flatten_image(1).unwrap();
    // Beneath the adjustment: gray.
    let below = out.pixel(0, 0);
    assert_eq!(below[0], below[1]);
    // Above the adjustment: untouched red.
    let above = out.pixel(7, 7);
    assert_eq!(above[0], 255);
    assert_eq!(above[1], 0);
}

#[test]
fn export_lock_rejects_drags_and_releases_cleanly() {
    let mut editor = Editor::new(CanvasSize::new(16, 16));
    let id = editor
        .import_image("Photo", solid(16, 16, [5, 5, 5, 255]))
        .unwrap();

    editor.begin_export(2).unwrap();
    assert!(matches!(
        editor.begin_layer_drag(&id, [0.0, 0.0]),
        Err(EditorError::CaptureInProgress)
    ));

    let result = loop {
        if let Some(r) = editor.poll_export() {
            break r;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    };
    let out = result.unwrap();
    assert_eq!(out.width(), 32);
    assert_eq!(out.height(), 32);

    // Lock released: drags work again.
    editor.begin_layer_drag(&id, [0.0, 0.0]).unwrap();
    editor.end_drag();
}

#[test]
fn visibility_toggle_survives_undo() {
    let mut editor = Editor::new(CanvasSize::new(4, 4));
    let id = editor
        .import_image("Photo", solid(4, 4, [9, 9, 9, 255]))
        .unwrap();

    editor
        .update_layer(
            &id,
            &LayerPatch {
                visible: Some(false),
                ..LayerPatch::default()
            },
        )
        .unwrap();
    assert!(!editor.document().find_layer(&id).unwrap().visible);

    let out = editor.flatten_image(1).unwrap();
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);

    editor.undo().unwrap();
    assert!(editor.document().find_layer(&id).unwrap().visible);
}

#[test]
fn remove_layer_then_undo_restores_render() {
    let mut editor = Editor::new(CanvasSize::new(4, 4));
    let id = editor
        .import_image("Photo", solid(4, 4, [77, 0, 0, 255]))
        .unwrap();

    editor.remove_layer(&id).unwrap();
    assert_eq!(editor.document().layer_count(), 0);

    editor.undo().unwrap();
    // The source map kept the pixels, so the restored layer renders.
    let out = editor.flatten_image(1).unwrap();
    assert_eq!(out.pixel(0, 0), [77, 0, 0, 255]);
}
