//! Grid controller - the composition root of the engine.
//!
//! `GridController` wires the selection model, navigation, the edit state
//! machine and the clipboard codec together and exposes them to a host:
//! - Imperative surface: active cell, selection, resize, clear
//! - Keyboard and pointer handlers (see `events.rs`)
//! - Copy / cut / paste, with platform failures absorbed
//!
//! The host owns the row array. The controller only reads it and asks for a
//! whole-array replacement through [`GridHost::replace_rows`].

mod drag;
mod events;

pub use drag::{DragKind, DragSession};
pub use events::{ClipboardRequest, KeyOutcome};

use crate::clipboard::{self, Clipboard};
use crate::column::GridColumn;
use crate::config::GridOptions;
use crate::edit::{can_begin, EditMode, EditSession, PendingCommit};
use crate::mutation;
use crate::selection::SelectionModel;
use crate::types::{CellPosition, CellValue, GridSelection, Row, SelectionState};

/// Services the embedding UI provides to the controller.
pub trait GridHost {
    /// Keeps the document-level pointer-up listener alive; dropping it must
    /// unsubscribe.
    type PointerUpGuard;

    fn rows(&self) -> &[Row];

    /// Adopt a new row array. Called once per mutation, never with a diff.
    fn replace_rows(&mut self, rows: Vec<Row>);

    /// Blank record used when a paste runs past the last row.
    fn create_row(&self) -> Row {
        Row::new()
    }

    /// Rows that fit in the viewport, used as the PageUp/PageDown step.
    fn visible_row_count(&self) -> Option<u32> {
        None
    }

    fn focus_grid(&mut self) {}

    fn blur_grid(&mut self) {}

    /// Subscribe to pointer-up anywhere in the document. The returned guard
    /// is held for the duration of a drag.
    fn subscribe_pointer_up(&mut self) -> Self::PointerUpGuard;

    fn selection_changed(&mut self, _state: &SelectionState) {}
}

/// What a cell renderer needs to draw one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub value: CellValue,
    pub row: u32,
    pub col: u32,
    pub is_active: bool,
    pub is_selected: bool,
    /// Edit mode of this cell (`None` unless it is the one being edited).
    pub edit_mode: EditMode,
    /// Text the editor should show while editing.
    pub edit_text: Option<String>,
    pub read_only: bool,
}

pub struct GridController<H: GridHost> {
    host: H,
    columns: Vec<GridColumn>,
    options: GridOptions,
    selection: SelectionModel,
    edit: EditSession,
    drag: DragSession<H::PointerUpGuard>,
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl<H: GridHost> GridController<H> {
    pub fn new(host: H, columns: Vec<GridColumn>, options: GridOptions) -> Self {
        let selection = SelectionModel::new(count(host.rows().len()), count(columns.len()));
        Self {
            host,
            columns,
            options,
            selection,
            edit: EditSession::default(),
            drag: DragSession::default(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) {
        self.options = options;
    }

    /// Swap the column set. Any edit in progress is cancelled.
    pub fn set_columns(&mut self, columns: Vec<GridColumn>) {
        if self.edit.is_editing() {
            self.end_edit(false);
        }
        self.columns = columns;
        self.sync_size();
    }

    pub fn selection(&self) -> Option<GridSelection> {
        self.selection.selection()
    }

    pub fn active_cell(&self) -> Option<CellPosition> {
        self.selection.active_cell()
    }

    pub fn state(&self) -> SelectionState {
        SelectionState {
            active_cell: self.selection.active_cell(),
            anchor: self.selection.anchor(),
            is_editing: self.edit.is_editing(),
        }
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit.mode()
    }

    /// Text currently held by the editor, if editing.
    pub fn edit_buffer(&self) -> Option<&str> {
        self.edit.is_editing().then(|| self.edit.buffer())
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn drag_kind(&self) -> Option<DragKind> {
        self.drag.kind()
    }

    pub fn cell_view(&self, pos: CellPosition) -> Option<CellView> {
        let column = self.columns.get(pos.col as usize)?;
        let row = self.host.rows().get(pos.row as usize)?;
        let editing_here = self.edit.cell() == Some(pos);
        Some(CellView {
            value: column.value(row).clone(),
            row: pos.row,
            col: pos.col,
            is_active: self.selection.active_cell() == Some(pos),
            is_selected: self
                .selection
                .selection()
                .is_some_and(|sel| sel.contains(pos)),
            edit_mode: if editing_here {
                self.edit.mode()
            } else {
                EditMode::None
            },
            edit_text: editing_here.then(|| self.edit.buffer().to_string()),
            read_only: column.is_disabled(),
        })
    }

    // ---- Imperative selection surface ----

    pub fn set_active_cell(&mut self, pos: Option<CellPosition>) -> bool {
        match pos {
            Some(pos) => self.change_selection(|s| s.select_single(pos)),
            None => self.clear(),
        }
    }

    pub fn set_selection(&mut self, rect: Option<GridSelection>) -> bool {
        match rect {
            Some(rect) => self.change_selection(|s| s.set_rectangle(Some(rect))),
            None => self.clear(),
        }
    }

    /// Drop the selection (ending any edit) and release grid focus.
    pub fn clear(&mut self) -> bool {
        if self.edit.is_editing() {
            self.end_edit(true);
        }
        self.drag.end();
        let changed = self.selection.clear();
        if changed {
            self.notify_selection();
        }
        self.host.blur_grid();
        changed
    }

    /// The host's data changed size.
    pub fn on_grid_resized(&mut self, row_count: u32, col_count: u32) -> bool {
        let mut next = self.selection.clone();
        let changed = next.on_grid_resized(row_count, col_count);
        if changed && self.edit.is_editing() {
            // The edited cell may be gone; nothing sensible to commit.
            self.end_edit(false);
        }
        self.selection = next;
        if changed {
            self.notify_selection();
        }
        changed
    }

    fn sync_size(&mut self) {
        let rows = count(self.host.rows().len());
        let cols = count(self.columns.len());
        if rows != self.selection.row_count() || cols != self.selection.col_count() {
            self.on_grid_resized(rows, cols);
        }
    }

    /// Apply `op` to the selection. An edit in progress is committed before
    /// the selection actually moves.
    fn change_selection(&mut self, op: impl Fn(&mut SelectionModel) -> bool) -> bool {
        let mut probe = self.selection.clone();
        if !op(&mut probe) {
            return false;
        }
        if self.edit.is_editing() {
            self.end_edit(true);
        }
        let changed = op(&mut self.selection);
        if changed {
            self.notify_selection();
        }
        changed
    }

    fn notify_selection(&mut self) {
        let state = self.state();
        self.host.selection_changed(&state);
    }

    // ---- Editing ----

    fn column_at(&self, pos: CellPosition) -> Option<&GridColumn> {
        self.columns.get(pos.col as usize)
    }

    fn value_at(&self, pos: CellPosition) -> Option<&CellValue> {
        let column = self.column_at(pos)?;
        let row = self.host.rows().get(pos.row as usize)?;
        Some(column.value(row))
    }

    fn can_edit_active(&self) -> Option<CellPosition> {
        let active = self.selection.active_cell()?;
        let selection = self.selection.selection();
        can_begin(selection.as_ref(), self.column_at(active)).then_some(active)
    }

    /// Open a full edit on the active cell.
    pub fn begin_full_edit(&mut self) -> bool {
        if self.edit.is_editing() {
            return false;
        }
        let Some(active) = self.can_edit_active() else {
            return false;
        };
        let (Some(column), Some(value)) = (self.column_at(active), self.value_at(active)) else {
            return false;
        };
        let text = column.edit_text(value);
        self.edit.begin_full(active, text)
    }

    /// Open a quick edit on the active cell, seeded with `typed`.
    pub fn begin_quick_edit(&mut self, typed: char) -> bool {
        if self.edit.is_editing() {
            return false;
        }
        let Some(active) = self.can_edit_active() else {
            return false;
        };
        let (Some(column), Some(value)) = (self.column_at(active), self.value_at(active)) else {
            return false;
        };
        let original = column.display_text(value);
        let seed = if self.options.quick_edit_seeds_value {
            format!("{original}{typed}")
        } else {
            typed.to_string()
        };
        self.edit.begin_quick(active, original, seed)
    }

    /// Pointer double-click or an equivalent host gesture.
    pub fn double_activate(&mut self, pos: CellPosition) -> bool {
        if self.edit.cell() == Some(pos) {
            return false;
        }
        self.drag.end();
        self.change_selection(|s| s.select_single(pos));
        self.begin_full_edit()
    }

    /// The cell editor's text changed.
    pub fn set_edit_buffer(&mut self, text: &str) {
        self.edit.set_buffer(text);
    }

    /// A renderer committed a ready-made value for `pos`.
    pub fn commit_value(&mut self, pos: CellPosition, value: CellValue) -> bool {
        if self.edit.cell() == Some(pos) {
            self.edit.cancel();
            self.host.focus_grid();
        }
        if !self.column_at(pos).is_some_and(|c| !c.is_disabled()) {
            return false;
        }
        let Some(rows) = mutation::set_cell_value(self.host.rows(), &self.columns, pos, value)
        else {
            return false;
        };
        self.replace_rows(rows);
        true
    }

    /// Zero-argument stop signal from a renderer: leave edit mode without
    /// committing the buffer.
    pub fn stop_editing(&mut self) -> bool {
        if !self.edit.is_editing() {
            return false;
        }
        self.end_edit(false);
        true
    }

    /// The editor lost focus to something outside the grid.
    pub fn on_editor_blur(&mut self) -> bool {
        match self.edit.on_blur() {
            Some(pending) => self.apply_commit(pending),
            None => false,
        }
    }

    /// Leave edit mode and hand the keyboard back to the grid.
    fn end_edit(&mut self, commit: bool) {
        if commit {
            if let Some(pending) = self.edit.commit() {
                self.apply_commit(pending);
            }
        } else {
            self.edit.cancel();
        }
        self.host.focus_grid();
    }

    fn apply_commit(&mut self, pending: PendingCommit) -> bool {
        let Some(column) = self.column_at(pending.cell) else {
            return false;
        };
        let Some(value) = column.parse(&pending.text) else {
            tracing::debug!(
                col = pending.cell.col,
                row = pending.cell.row,
                "edit text rejected by column, keeping previous value"
            );
            return false;
        };
        let Some(rows) =
            mutation::set_cell_value(self.host.rows(), &self.columns, pending.cell, value)
        else {
            return false;
        };
        self.replace_rows(rows);
        true
    }

    // ---- Mutations ----

    /// The host swapped its rows without going through the controller.
    pub fn rows_changed(&mut self) {
        self.sync_size();
    }

    fn replace_rows(&mut self, rows: Vec<Row>) {
        self.host.replace_rows(rows);
        self.sync_size();
    }

    /// Like `replace_rows`, but an identical array is not handed back.
    fn replace_if_changed(&mut self, rows: Vec<Row>) -> bool {
        if rows.as_slice() == self.host.rows() {
            return false;
        }
        self.replace_rows(rows);
        true
    }

    /// Row mutations may splice rows out from under the edited cell, so an
    /// open edit is dropped first.
    fn cancel_edit_for_mutation(&mut self) {
        if self.edit.is_editing() {
            tracing::debug!("row mutation cancels the open edit");
            self.end_edit(false);
        }
    }

    /// Delete / Backspace on the current selection.
    pub fn delete_selected(&mut self) -> bool {
        let Some(selection) = self.selection.selection() else {
            return false;
        };
        self.cancel_edit_for_mutation();
        let rows = mutation::delete_selection(
            &selection,
            self.host.rows(),
            &self.columns,
            !self.options.lock_rows,
        );
        tracing::debug!(
            rows = selection.height(),
            cols = selection.width(),
            "deleting selection"
        );
        self.replace_if_changed(rows)
    }

    /// Clipboard text for the current selection.
    pub fn copy_text(&self) -> Option<String> {
        let selection = self.selection.selection()?;
        Some(clipboard::serialize(
            &selection,
            self.host.rows(),
            &self.columns,
        ))
    }

    /// Paste `text` at the selection's top-left corner.
    pub fn paste_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let Some(selection) = self.selection.selection() else {
            return false;
        };
        self.cancel_edit_for_mutation();
        let rows = clipboard::deserialize(
            text,
            selection.min(),
            self.host.rows(),
            &self.columns,
            || self.host.create_row(),
        );
        tracing::debug!(
            col = selection.min().col,
            row = selection.min().row,
            bytes = text.len(),
            "pasting"
        );
        self.replace_if_changed(rows)
    }

    /// Copy the selection to `clipboard`. Failures are logged and ignored.
    pub async fn copy<C: Clipboard>(&self, clipboard: &C) -> bool {
        let Some(text) = self.copy_text() else {
            return false;
        };
        match clipboard.write_text(&text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("copy failed: {e}");
                false
            }
        }
    }

    /// Copy, then delete the selection once the clipboard accepted the text.
    pub async fn cut<C: Clipboard>(&mut self, clipboard: &C) -> bool {
        if !self.copy(clipboard).await {
            return false;
        }
        self.delete_selected()
    }

    /// Read `clipboard` and paste it. Failures are logged and ignored.
    pub async fn paste<C: Clipboard>(&mut self, clipboard: &C) -> bool {
        if self.selection.selection().is_none() {
            return false;
        }
        match clipboard.read_text().await {
            Ok(text) => self.paste_text(&text),
            Err(e) => {
                tracing::warn!("paste failed: {e}");
                false
            }
        }
    }
}
