//! Keyboard and pointer entry points of [`GridController`].

use super::{DragKind, GridController, GridHost};
use crate::edit::{AfterCommit, EditAction, EditMode};
use crate::navigation::{navigate, Key, KeyInput, NavContext, NavIntent};
use crate::selection::SelectionModel;
use crate::types::CellPosition;

/// Clipboard work a key press asks for. The host runs it against its
/// clipboard backend, because the platform clipboard is asynchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardRequest {
    Copy,
    Cut,
    Paste,
}

/// Result of [`GridController::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The grid consumed the key.
    pub handled: bool,
    /// The browser's default action should be suppressed.
    pub prevent_default: bool,
    pub clipboard: Option<ClipboardRequest>,
}

impl KeyOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            handled: true,
            prevent_default: true,
            clipboard: None,
        }
    }

    fn clipboard(request: ClipboardRequest) -> Self {
        Self {
            clipboard: Some(request),
            ..Self::consumed()
        }
    }
}

impl<H: GridHost> GridController<H> {
    fn nav_context(&self, edit_mode: EditMode) -> NavContext {
        NavContext {
            active_cell: self.selection.active_cell(),
            row_count: self.selection.row_count(),
            col_count: self.selection.col_count(),
            edit_mode,
            visible_row_count: self
                .host
                .visible_row_count()
                .unwrap_or(self.options.default_visible_rows),
        }
    }

    /// Route a key press through the edit state machine or, when not editing,
    /// through clipboard shortcuts, Escape, delete, edit entry and navigation.
    pub fn handle_key(&mut self, input: KeyInput) -> KeyOutcome {
        if self.edit.is_editing() {
            return self.handle_edit_key(input);
        }

        if input.primary() && !input.alt {
            let request = if input.is_primary_char('c') {
                Some(ClipboardRequest::Copy)
            } else if input.is_primary_char('x') {
                Some(ClipboardRequest::Cut)
            } else if input.is_primary_char('v') {
                Some(ClipboardRequest::Paste)
            } else {
                None
            };
            if let Some(request) = request {
                if self.selection.selection().is_none() {
                    return KeyOutcome::ignored();
                }
                return KeyOutcome::clipboard(request);
            }
        }

        match input.key {
            Key::Escape => return self.handle_escape(),
            Key::Delete | Key::Backspace if !input.primary() => {
                return if self.delete_selected() {
                    KeyOutcome::consumed()
                } else {
                    KeyOutcome::ignored()
                };
            }
            Key::Enter if !input.primary() && !input.alt => {
                if self.begin_full_edit() {
                    return KeyOutcome::consumed();
                }
            }
            _ => {}
        }

        if input.is_printable() {
            if let Some(typed) = input.text() {
                if self.begin_quick_edit(typed) {
                    return KeyOutcome::consumed();
                }
            }
        }

        let Some(outcome) = navigate(&self.nav_context(EditMode::None), &input) else {
            return KeyOutcome::ignored();
        };
        self.apply_intent(outcome.intent);
        KeyOutcome {
            handled: true,
            prevent_default: outcome.prevent_default,
            clipboard: None,
        }
    }

    fn handle_edit_key(&mut self, input: KeyInput) -> KeyOutcome {
        let mode = self.edit.mode();
        match self.edit.on_key(&input) {
            EditAction::Pass => KeyOutcome::ignored(),
            EditAction::Cancel => {
                self.end_edit(false);
                KeyOutcome::consumed()
            }
            EditAction::Commit(after) => {
                let committed_at = self.edit.cell();
                self.end_edit(true);
                self.after_commit(after, committed_at, mode, &input)
            }
        }
    }

    fn after_commit(
        &mut self,
        after: AfterCommit,
        committed_at: Option<CellPosition>,
        mode: EditMode,
        input: &KeyInput,
    ) -> KeyOutcome {
        match after {
            AfterCommit::Stay => KeyOutcome::consumed(),
            AfterCommit::MoveDown | AfterCommit::MoveUp => {
                if let Some(cell) = committed_at {
                    let row = if after == AfterCommit::MoveDown {
                        cell.row.saturating_add(1)
                    } else {
                        cell.row.saturating_sub(1)
                    };
                    let last_row = self.selection.row_count().saturating_sub(1);
                    let target = CellPosition::new(cell.col, row.min(last_row));
                    self.change_selection(|s| s.select_single(target));
                }
                KeyOutcome::consumed()
            }
            AfterCommit::Navigate => {
                let nav_mode = if mode == EditMode::Quick {
                    EditMode::Quick
                } else {
                    EditMode::None
                };
                match navigate(&self.nav_context(nav_mode), input) {
                    Some(outcome) => {
                        self.apply_intent(outcome.intent);
                        // The editor is gone; a browser Tab would only pull
                        // focus off the grid again.
                        KeyOutcome {
                            handled: true,
                            prevent_default: outcome.prevent_default || input.key == Key::Tab,
                            clipboard: None,
                        }
                    }
                    None => KeyOutcome::consumed(),
                }
            }
        }
    }

    /// Escape peels one layer: a range collapses to its active cell, a single
    /// cell is deselected and focus leaves the grid.
    fn handle_escape(&mut self) -> KeyOutcome {
        if self.selection.active_cell().is_none() {
            return KeyOutcome::ignored();
        }
        if self.selection.is_single_cell() {
            self.clear();
        } else {
            self.change_selection(SelectionModel::collapse_to_active);
        }
        KeyOutcome::consumed()
    }

    pub fn apply_intent(&mut self, intent: NavIntent) -> bool {
        match intent {
            NavIntent::Select(pos) => self.change_selection(|s| s.select_single(pos)),
            NavIntent::Extend(pos) => self.change_selection(|s| s.extend_to(pos)),
            NavIntent::SelectRow(row) => self.change_selection(|s| s.select_row(row, false)),
            NavIntent::SelectColumn(col) => self.change_selection(|s| s.select_column(col, false)),
            NavIntent::SelectAll => self.change_selection(SelectionModel::select_all),
            NavIntent::TabOut => {
                tracing::debug!("tab left the grid");
                self.clear()
            }
        }
    }

    // ---- Pointer ----

    /// Primary button pressed on a cell.
    pub fn pointer_down(&mut self, pos: CellPosition, shift: bool) -> bool {
        if self.edit.mode() == EditMode::Full && self.edit.cell() == Some(pos) {
            return false;
        }
        if shift && self.selection.active_cell().is_some() {
            return self.change_selection(|s| s.extend_to(pos));
        }
        let was_full_edit = self.edit.mode() == EditMode::Full;
        let changed = self.change_selection(|s| s.select_single(pos));
        // Shift-clicks never drag, even when there was nothing to extend.
        if !shift && !was_full_edit {
            self.start_drag(DragKind::Cells);
        }
        changed
    }

    /// Pointer moved over a cell, possibly while dragging.
    pub fn pointer_enter(&mut self, pos: CellPosition) -> bool {
        match self.drag.kind() {
            Some(DragKind::Cells) => self.change_selection(|s| s.extend_to(pos)),
            Some(DragKind::Rows) => self.change_selection(|s| s.select_row(pos.row, true)),
            Some(DragKind::Columns) => self.change_selection(|s| s.select_column(pos.col, true)),
            None => false,
        }
    }

    /// Pointer released anywhere in the document.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.end()
    }

    pub fn row_header_down(&mut self, row: u32, shift: bool) -> bool {
        let changed = self.change_selection(|s| s.select_row(row, shift));
        self.start_drag(DragKind::Rows);
        changed
    }

    pub fn column_header_down(&mut self, col: u32, shift: bool) -> bool {
        let changed = self.change_selection(|s| s.select_column(col, shift));
        self.start_drag(DragKind::Columns);
        changed
    }

    /// Pointer pressed on the top-left corner cell.
    pub fn corner_down(&mut self) -> bool {
        self.drag.end();
        self.change_selection(SelectionModel::select_all)
    }

    fn start_drag(&mut self, kind: DragKind) {
        if self.selection.active_cell().is_none() {
            return;
        }
        // Release the previous subscription before taking a new one.
        self.drag.end();
        let guard = self.host.subscribe_pointer_up();
        self.drag.start(kind, guard);
    }
}
