//! `WasmGrid` - the JavaScript entry point.
//!
//! The UI shell renders the cells itself and forwards DOM events here:
//! - `onKeyDown` with the raw `KeyboardEvent` (default prevented as needed)
//! - pointer down / enter / double-click on cells and headers
//! - editor buffer changes, commits and blur
//!
//! Row changes come back through the `onChange` callback with a fresh array;
//! selection changes through `onSelectionChange`.

mod host;

pub use host::{DocumentListener, JsHost};

use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, KeyboardEvent};

use crate::clipboard::{BrowserClipboard, Clipboard};
use crate::config::{columns_from_configs, ColumnConfig, GridOptions};
use crate::controller::{ClipboardRequest, GridController};
use crate::edit::EditMode;
use crate::navigation::KeyInput;
use crate::types::{CellPosition, CellValue, GridSelection, Row};
use host::{to_js, SharedGrid};

/// Run `op` on the controller, then deliver the side effects it queued.
pub(crate) fn dispatch<R>(grid: &SharedGrid, op: impl FnOnce(&mut GridController<JsHost>) -> R) -> R {
    let (result, pending) = {
        let mut controller = grid.borrow_mut();
        let result = op(&mut controller);
        (result, controller.host_mut().take_pending())
    };
    for notice in pending {
        notice.deliver();
    }
    result
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmGrid {
    grid: SharedGrid,
}

#[wasm_bindgen]
impl WasmGrid {
    /// Create a grid bound to `container` (the focusable grid element).
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        options: JsValue,
        on_change: Option<Function>,
    ) -> Result<WasmGrid, JsValue> {
        console_error_panic_hook::set_once();
        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(js_err)?
        };
        let grid = Rc::new_cyclic(|weak| {
            std::cell::RefCell::new(GridController::new(
                JsHost::new(container, on_change, weak.clone()),
                Vec::new(),
                options,
            ))
        });
        Ok(WasmGrid { grid })
    }

    #[wasm_bindgen(js_name = "setColumns")]
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let configs: Vec<ColumnConfig> = serde_wasm_bindgen::from_value(columns).map_err(js_err)?;
        let columns = columns_from_configs(configs)?;
        dispatch(&self.grid, |g| g.set_columns(columns));
        Ok(())
    }

    #[wasm_bindgen(js_name = "setOptions")]
    pub fn set_options(&self, options: JsValue) -> Result<(), JsValue> {
        let options: GridOptions = serde_wasm_bindgen::from_value(options).map_err(js_err)?;
        dispatch(&self.grid, |g| g.set_options(options));
        Ok(())
    }

    /// Hand the grid the current row array. Does not fire `onChange`.
    #[wasm_bindgen(js_name = "setData")]
    pub fn set_data(&self, data: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Row> = serde_wasm_bindgen::from_value(data).map_err(js_err)?;
        dispatch(&self.grid, |g| {
            g.host_mut().set_rows(rows);
            g.rows_changed();
        });
        Ok(())
    }

    #[wasm_bindgen(js_name = "setOnChange")]
    pub fn set_on_change(&self, callback: Option<Function>) {
        self.grid.borrow_mut().host_mut().set_on_change(callback);
    }

    #[wasm_bindgen(js_name = "setOnSelectionChange")]
    pub fn set_on_selection_change(&self, callback: Option<Function>) {
        self.grid
            .borrow_mut()
            .host_mut()
            .set_on_selection_change(callback);
    }

    /// Rows that fit in the viewport (PageUp/PageDown step).
    #[wasm_bindgen(js_name = "setVisibleRowCount")]
    pub fn set_visible_row_count(&self, rows: Option<u32>) {
        self.grid.borrow_mut().host_mut().set_visible_rows(rows);
    }

    /// Returns true when the grid consumed the key.
    #[wasm_bindgen(js_name = "onKeyDown")]
    pub fn on_key_down(&self, event: KeyboardEvent) -> bool {
        let input = KeyInput::from_dom(
            &event.key(),
            event.shift_key(),
            event.ctrl_key(),
            event.alt_key(),
            event.meta_key(),
        );
        let outcome = dispatch(&self.grid, |g| g.handle_key(input));
        if outcome.prevent_default {
            event.prevent_default();
        }
        match outcome.clipboard {
            Some(ClipboardRequest::Copy) => {
                wasm_bindgen_futures::spawn_local(copy_selection(Rc::clone(&self.grid), false));
            }
            Some(ClipboardRequest::Cut) => {
                wasm_bindgen_futures::spawn_local(copy_selection(Rc::clone(&self.grid), true));
            }
            Some(ClipboardRequest::Paste) => {
                wasm_bindgen_futures::spawn_local(paste_clipboard(Rc::clone(&self.grid)));
            }
            None => {}
        }
        outcome.handled
    }

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&self, col: u32, row: u32, shift: bool) -> bool {
        dispatch(&self.grid, |g| g.pointer_down(CellPosition::new(col, row), shift))
    }

    #[wasm_bindgen(js_name = "pointerEnter")]
    pub fn pointer_enter(&self, col: u32, row: u32) -> bool {
        dispatch(&self.grid, |g| g.pointer_enter(CellPosition::new(col, row)))
    }

    #[wasm_bindgen(js_name = "doubleClick")]
    pub fn double_click(&self, col: u32, row: u32) -> bool {
        dispatch(&self.grid, |g| g.double_activate(CellPosition::new(col, row)))
    }

    #[wasm_bindgen(js_name = "rowHeaderDown")]
    pub fn row_header_down(&self, row: u32, shift: bool) -> bool {
        dispatch(&self.grid, |g| g.row_header_down(row, shift))
    }

    #[wasm_bindgen(js_name = "columnHeaderDown")]
    pub fn column_header_down(&self, col: u32, shift: bool) -> bool {
        dispatch(&self.grid, |g| g.column_header_down(col, shift))
    }

    #[wasm_bindgen(js_name = "cornerDown")]
    pub fn corner_down(&self) -> bool {
        dispatch(&self.grid, GridController::corner_down)
    }

    #[wasm_bindgen(js_name = "setActiveCell")]
    pub fn set_active_cell(&self, col: Option<u32>, row: Option<u32>) -> bool {
        let pos = col.zip(row).map(|(col, row)| CellPosition::new(col, row));
        dispatch(&self.grid, |g| g.set_active_cell(pos))
    }

    /// `[minCol, minRow, maxCol, maxRow]`, or an empty argument to clear.
    #[wasm_bindgen(js_name = "setSelection")]
    pub fn set_selection(&self, bounds: Option<Vec<u32>>) -> Result<bool, JsValue> {
        let rect = match bounds.as_deref() {
            None | Some([]) => None,
            Some(&[min_col, min_row, max_col, max_row]) => Some(GridSelection::from_corners(
                CellPosition::new(min_col, min_row),
                CellPosition::new(max_col, max_row),
            )),
            Some(_) => return Err(JsValue::from_str("selection needs 4 numbers")),
        };
        Ok(dispatch(&self.grid, |g| g.set_selection(rect)))
    }

    #[wasm_bindgen(js_name = "getSelection")]
    pub fn get_selection(&self) -> Option<Vec<u32>> {
        let selection = self.grid.borrow().selection()?;
        let (min, max) = (selection.min(), selection.max());
        Some(vec![min.col, min.row, max.col, max.row])
    }

    /// `{ activeCell, anchor, isEditing }`
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.grid.borrow().state();
        to_js(&state)
    }

    #[wasm_bindgen(js_name = "isDragging")]
    pub fn is_dragging(&self) -> bool {
        self.grid.borrow().is_dragging()
    }

    #[wasm_bindgen(js_name = "editMode")]
    pub fn edit_mode(&self) -> String {
        match self.grid.borrow().edit_mode() {
            EditMode::None => "none",
            EditMode::Quick => "quick",
            EditMode::Full => "full",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = "editBuffer")]
    pub fn edit_buffer(&self) -> Option<String> {
        self.grid.borrow().edit_buffer().map(str::to_string)
    }

    /// Render data for one cell.
    #[wasm_bindgen(js_name = "cellView")]
    pub fn cell_view(&self, col: u32, row: u32) -> Result<JsValue, JsValue> {
        let view = self.grid.borrow().cell_view(CellPosition::new(col, row));
        match view {
            Some(view) => to_js(&serde_json::json!({
                "value": view.value,
                "isActive": view.is_active,
                "isSelected": view.is_selected,
                "editMode": view.edit_mode,
                "editText": view.edit_text,
                "readOnly": view.read_only,
            })),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = "setEditBuffer")]
    pub fn set_edit_buffer(&self, text: &str) {
        self.grid.borrow_mut().set_edit_buffer(text);
    }

    /// A custom cell editor committed a value directly.
    #[wasm_bindgen(js_name = "commitValue")]
    pub fn commit_value(&self, col: u32, row: u32, value: JsValue) -> Result<bool, JsValue> {
        let value: CellValue = serde_wasm_bindgen::from_value(value).map_err(js_err)?;
        Ok(dispatch(&self.grid, |g| {
            g.commit_value(CellPosition::new(col, row), value)
        }))
    }

    #[wasm_bindgen(js_name = "stopEditing")]
    pub fn stop_editing(&self) -> bool {
        dispatch(&self.grid, GridController::stop_editing)
    }

    #[wasm_bindgen(js_name = "onEditorBlur")]
    pub fn on_editor_blur(&self) -> bool {
        dispatch(&self.grid, GridController::on_editor_blur)
    }

    /// Drop the selection and release focus (click outside the grid).
    pub fn clear(&self) -> bool {
        dispatch(&self.grid, GridController::clear)
    }

    pub fn copy(&self) -> Promise {
        let grid = Rc::clone(&self.grid);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(JsValue::from_bool(copy_selection(grid, false).await))
        })
    }

    pub fn cut(&self) -> Promise {
        let grid = Rc::clone(&self.grid);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(JsValue::from_bool(copy_selection(grid, true).await))
        })
    }

    pub fn paste(&self) -> Promise {
        let grid = Rc::clone(&self.grid);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(JsValue::from_bool(paste_clipboard(grid).await))
        })
    }
}

// The controller's own async copy/cut/paste would hold the borrow across the
// clipboard await, so the browser path splits them around it.

async fn copy_selection(grid: SharedGrid, cut: bool) -> bool {
    let Some(text) = grid.borrow().copy_text() else {
        return false;
    };
    if let Err(e) = BrowserClipboard.write_text(&text).await {
        tracing::warn!("copy failed: {e}");
        return false;
    }
    if cut {
        dispatch(&grid, GridController::delete_selected);
    }
    true
}

async fn paste_clipboard(grid: SharedGrid) -> bool {
    if grid.borrow().selection().is_none() {
        return false;
    }
    match BrowserClipboard.read_text().await {
        Ok(text) => dispatch(&grid, |g| g.paste_text(&text)),
        Err(e) => {
            tracing::warn!("paste failed: {e}");
            false
        }
    }
}
