// Browser tests for the DOM adapter. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use snap_puzzle::dom::{PuzzleHandle, mount, start_puzzle};
use snap_puzzle::{PuzzleConfig, PuzzleSession};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, PointerEvent, PointerEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn add_mount_points(ids: &[&str]) -> web_sys::Document {
    let doc = web_sys::window().unwrap().document().unwrap();
    let body = doc.body().unwrap();
    for id in ids {
        if doc.get_element_by_id(id).is_none() {
            let el = doc.create_element("div").unwrap();
            el.set_id(id);
            body.append_child(&el).unwrap();
        }
    }
    doc
}

#[wasm_bindgen_test]
fn mount_renders_both_boards() {
    let config = PuzzleConfig {
        source_container: "t1-source".into(),
        destination_container: "t1-destination".into(),
        play_field: "t1-playfield".into(),
        seed: Some(1),
        ..PuzzleConfig::default()
    };
    let doc = add_mount_points(&["t1-source", "t1-destination", "t1-playfield"]);
    let session = PuzzleSession::from_config(config).unwrap();
    let handle = mount(session, &doc).unwrap();
    assert_eq!(handle.tile_count(), 12);
    assert_eq!(handle.locked_count(), 0);
    assert!(!handle.is_solved());

    let dest = doc.get_element_by_id("t1-destination").unwrap();
    assert_eq!(dest.query_selector_all(".well").unwrap().length(), 12);
    assert_eq!(dest.query_selector_all(".row").unwrap().length(), 3);
    let src = doc.get_element_by_id("t1-source").unwrap();
    assert_eq!(src.query_selector_all(".box--0_0").unwrap().length(), 1);
    assert!(src.query_selector(".col-xs-offset-2").unwrap().is_some());
    assert!(
        doc.get_element_by_id("t1-playfield")
            .unwrap()
            .class_list()
            .contains("puzzle--active")
    );
}

#[wasm_bindgen_test]
fn missing_mount_point_is_an_error() {
    let config = PuzzleConfig {
        source_container: "t2-nowhere".into(),
        ..PuzzleConfig::default()
    };
    let config = serde_wasm_bindgen::to_value(&config).unwrap();
    assert!(start_puzzle(config).is_err());
}

#[wasm_bindgen_test]
fn invalid_config_is_an_error() {
    add_mount_points(&["puzzle--source", "puzzle--destination", "puzzle-playfield"]);
    let config = PuzzleConfig {
        rows: 0,
        ..PuzzleConfig::default()
    };
    let config = serde_wasm_bindgen::to_value(&config).unwrap();
    let err: JsValue = start_puzzle(config).err().unwrap();
    assert!(!err.is_undefined());
}

/// Mounts a seeded puzzle under `prefix`-named containers and returns the
/// handle, the `box--0_0` tile and its destination cell.
fn mounted(prefix: &str) -> (PuzzleHandle, HtmlElement, HtmlElement) {
    let ids = [
        format!("{prefix}-source"),
        format!("{prefix}-destination"),
        format!("{prefix}-playfield"),
    ];
    let doc = add_mount_points(&[ids[0].as_str(), ids[1].as_str(), ids[2].as_str()]);
    let config = PuzzleConfig {
        source_container: ids[0].clone(),
        destination_container: ids[1].clone(),
        play_field: ids[2].clone(),
        seed: Some(3),
        ..PuzzleConfig::default()
    };
    let handle = mount(PuzzleSession::from_config(config).unwrap(), &doc).unwrap();
    let cell = |id: &str| -> HtmlElement {
        doc.get_element_by_id(id)
            .unwrap()
            .query_selector(".box--0_0")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap()
    };
    let tile = cell(&ids[0]);
    let target = cell(&ids[1]);
    (handle, tile, target)
}

fn pointer(el: &HtmlElement, kind: &str, x: i32, y: i32) {
    let init = PointerEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_pointer_id(1);
    init.set_client_x(x);
    init.set_client_y(y);
    let evt = PointerEvent::new_with_event_init_dict(kind, &init).unwrap();
    el.dispatch_event(&evt).unwrap();
}

fn origin(el: &HtmlElement) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    (rect.left(), rect.top())
}

fn assert_near(actual: (f64, f64), expected: (f64, f64)) {
    assert!(
        (actual.0 - expected.0).abs() < 0.5 && (actual.1 - expected.1).abs() < 0.5,
        "{actual:?} != {expected:?}"
    );
}

#[wasm_bindgen_test]
fn failed_drop_reverts_to_drag_start() {
    let (handle, tile, _) = mounted("t4");
    let start = origin(&tile);

    pointer(&tile, "pointerdown", 10, 10);
    pointer(&tile, "pointermove", 3010, 2010);
    assert_near(origin(&tile), (start.0 + 3000.0, start.1 + 2000.0));

    pointer(&tile, "pointerup", 3010, 2010);
    assert_near(origin(&tile), start);
    assert_eq!(handle.locked_count(), 0);
    assert!(!tile.class_list().contains("puzzle-tile--locked"));
}

#[wasm_bindgen_test]
fn drag_onto_destination_snaps_and_locks() {
    let (handle, tile, target) = mounted("t5");
    let start = origin(&tile);
    let goal = origin(&target);

    // land a few pixels off; the snap radius pulls the tile the rest of the way
    pointer(&tile, "pointerdown", 0, 0);
    let dx = (goal.0 - start.0).round() as i32 + 3;
    let dy = (goal.1 - start.1).round() as i32 - 4;
    pointer(&tile, "pointermove", dx, dy);

    assert!(tile.class_list().contains("puzzle-tile--locked"));
    assert_eq!(handle.locked_count(), 1);
    assert_near(origin(&tile), goal);

    // no revert on drop, and the locked tile no longer drags
    pointer(&tile, "pointerup", dx, dy);
    assert_near(origin(&tile), goal);
    pointer(&tile, "pointerdown", dx, dy);
    pointer(&tile, "pointermove", dx + 400, dy + 400);
    pointer(&tile, "pointerup", dx + 400, dy + 400);
    assert_near(origin(&tile), goal);
    assert_eq!(handle.locked_count(), 1);
}
