//! Browser implementation of [`GridHost`].
//!
//! Nothing here calls into JavaScript or the DOM while the controller is
//! borrowed. Side effects are queued as [`Notice`]s and delivered by
//! [`super::WasmGrid`] once the borrow is released, so a callback that
//! re-enters the grid never hits a `RefCell` conflict.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

use crate::controller::{GridController, GridHost};
use crate::types::{Row, SelectionState};

pub(crate) type SharedGrid = Rc<RefCell<GridController<JsHost>>>;

/// A side effect waiting for the borrow to end.
pub(crate) enum Notice {
    Call(Function, JsValue),
    Focus(HtmlElement),
    Blur(HtmlElement),
}

impl Notice {
    pub(crate) fn deliver(self) {
        match self {
            Self::Call(callback, arg) => {
                if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                    tracing::warn!("grid callback threw: {e:?}");
                }
            }
            Self::Focus(element) => {
                let _ = element.focus();
            }
            Self::Blur(element) => {
                let _ = element.blur();
            }
        }
    }
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub struct JsHost {
    rows: Vec<Row>,
    container: HtmlElement,
    on_change: Option<Function>,
    on_selection_change: Option<Function>,
    visible_rows: Option<u32>,
    grid: Weak<RefCell<GridController<JsHost>>>,
    pending: Vec<Notice>,
}

impl JsHost {
    pub(crate) fn new(
        container: HtmlElement,
        on_change: Option<Function>,
        grid: Weak<RefCell<GridController<JsHost>>>,
    ) -> Self {
        Self {
            rows: Vec::new(),
            container,
            on_change,
            on_selection_change: None,
            visible_rows: None,
            grid,
            pending: Vec::new(),
        }
    }

    /// Adopt rows coming from JavaScript without echoing them back.
    pub(crate) fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    pub(crate) fn set_on_change(&mut self, callback: Option<Function>) {
        self.on_change = callback;
    }

    pub(crate) fn set_on_selection_change(&mut self, callback: Option<Function>) {
        self.on_selection_change = callback;
    }

    pub(crate) fn set_visible_rows(&mut self, rows: Option<u32>) {
        self.visible_rows = rows;
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

impl GridHost for JsHost {
    type PointerUpGuard = DocumentListener;

    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn replace_rows(&mut self, rows: Vec<Row>) {
        if let Some(callback) = self.on_change.clone() {
            match to_js(&rows) {
                Ok(value) => self.pending.push(Notice::Call(callback, value)),
                Err(e) => tracing::warn!("failed to serialize rows: {e:?}"),
            }
        }
        self.rows = rows;
    }

    fn visible_row_count(&self) -> Option<u32> {
        self.visible_rows
    }

    fn focus_grid(&mut self) {
        self.pending.push(Notice::Focus(self.container.clone()));
    }

    fn blur_grid(&mut self) {
        self.pending.push(Notice::Blur(self.container.clone()));
    }

    fn subscribe_pointer_up(&mut self) -> DocumentListener {
        DocumentListener::mouse_up(self.grid.clone())
    }

    fn selection_changed(&mut self, state: &SelectionState) {
        if let Some(callback) = self.on_selection_change.clone() {
            match to_js(state) {
                Ok(value) => self.pending.push(Notice::Call(callback, value)),
                Err(e) => tracing::warn!("failed to serialize selection: {e:?}"),
            }
        }
    }
}

/// Document-level `mouseup` listener that ends the current drag. Dropping it
/// removes the listener.
pub struct DocumentListener {
    document: Option<web_sys::Document>,
    closure: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl DocumentListener {
    fn mouse_up(grid: Weak<RefCell<GridController<JsHost>>>) -> Self {
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            if let Some(grid) = grid.upgrade() {
                super::dispatch(&grid, GridController::pointer_up);
            }
        }) as Box<dyn FnMut(MouseEvent)>);

        let document = web_sys::window().and_then(|w| w.document());
        if let Some(document) = document.as_ref() {
            document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())
                .ok();
        }
        Self {
            document,
            closure: Some(closure),
        }
    }
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        let Some(closure) = self.closure.take() else {
            return;
        };
        if let Some(document) = self.document.as_ref() {
            document
                .remove_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())
                .ok();
        }
        // The listener may be the caller (mouseup ends the drag), so the
        // closure outlives this call.
        wasm_bindgen_futures::spawn_local(async move {
            drop(closure);
        });
    }
}
