#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde_json::json;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

use netgrid::types::{CellValue, Row, SelectionState};
use netgrid::WasmGrid;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> HtmlElement {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
}

fn to_js(value: &serde_json::Value) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap()
}

/// Grid whose `onChange` payloads land in the returned cell.
fn grid_with_sink() -> (WasmGrid, Rc<RefCell<Vec<Vec<Row>>>>, Closure<dyn FnMut(JsValue)>) {
    let sink = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&sink);
    let closure = Closure::wrap(Box::new(move |rows: JsValue| {
        let rows: Vec<Row> = serde_wasm_bindgen::from_value(rows).unwrap();
        captured.borrow_mut().push(rows);
    }) as Box<dyn FnMut(JsValue)>);
    let callback: Function = closure.as_ref().unchecked_ref::<Function>().clone();

    let grid = WasmGrid::new(container(), JsValue::UNDEFINED, Some(callback)).unwrap();
    grid.set_columns(to_js(&json!([
        {"accessorKey": "id", "disabled": true},
        {"accessorKey": "demand", "kind": "number"},
        {"accessorKey": "tag"}
    ])))
    .unwrap();
    grid.set_data(to_js(&json!([
        {"id": "J1", "demand": 1.5, "tag": "a"},
        {"id": "J2", "demand": 2.5, "tag": "b"}
    ])))
    .unwrap();
    (grid, sink, closure)
}

#[wasm_bindgen_test]
fn set_data_does_not_echo() {
    let (_grid, sink, _closure) = grid_with_sink();
    assert!(sink.borrow().is_empty());
}

#[wasm_bindgen_test]
fn pointer_selection_round_trips_through_state() {
    let (grid, _sink, _closure) = grid_with_sink();
    assert!(grid.pointer_down(1, 0, false));
    assert!(grid.pointer_enter(2, 1));
    assert!(grid.is_dragging());
    let mouse_up = web_sys::MouseEvent::new("mouseup").unwrap();
    let document = web_sys::window().unwrap().document().unwrap();
    document.dispatch_event(&mouse_up).unwrap();
    assert!(!grid.is_dragging());
    assert_eq!(grid.get_selection(), Some(vec![1, 0, 2, 1]));

    let state: SelectionState = serde_wasm_bindgen::from_value(grid.state().unwrap()).unwrap();
    assert_eq!(state.active_cell.map(|p| (p.col, p.row)), Some((2, 1)));
    assert!(!state.is_editing);
}

#[wasm_bindgen_test]
fn commit_value_emits_new_rows() {
    let (grid, sink, _closure) = grid_with_sink();
    assert!(grid
        .commit_value(1, 1, JsValue::from_f64(9.0))
        .unwrap());
    let emitted = sink.borrow();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0][1]["demand"], CellValue::Number(9.0));
}

#[wasm_bindgen_test]
fn set_selection_validates_bounds() {
    let (grid, _sink, _closure) = grid_with_sink();
    assert!(grid.set_selection(Some(vec![0, 0, 5, 5])).unwrap());
    assert_eq!(grid.get_selection(), Some(vec![0, 0, 2, 1]));
    assert!(grid.set_selection(Some(vec![1, 2])).is_err());
    assert!(grid.set_selection(None).unwrap());
    assert_eq!(grid.get_selection(), None);
}

#[wasm_bindgen_test]
fn editor_buffer_commit_on_blur() {
    let (grid, sink, _closure) = grid_with_sink();
    assert!(grid.double_click(2, 0));
    assert_eq!(grid.edit_mode(), "full");
    grid.set_edit_buffer("zz");
    assert!(grid.on_editor_blur());
    assert_eq!(grid.edit_mode(), "none");
    assert_eq!(sink.borrow()[0][0]["tag"], CellValue::from("zz"));
}
