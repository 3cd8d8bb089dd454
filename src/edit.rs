//! Edit-mode state machine.
//!
//! `Idle -> Editing(Quick | Full) -> Idle`. The session holds the text the cell
//! editor is working on; turning that text into a value and writing it back is
//! the controller's job, so this module stays free of row data.

use serde::Serialize;

use crate::column::GridColumn;
use crate::navigation::{Key, KeyInput};
use crate::selection::is_single_cell_selection;
use crate::types::{CellPosition, GridSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    None,
    /// Entered by typing onto a selected cell.
    Quick,
    /// Entered with Enter or a double activation.
    Full,
}

/// What should happen after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterCommit {
    Stay,
    MoveDown,
    MoveUp,
    /// Hand the same key to navigation (Tab, and arrows in quick mode).
    Navigate,
}

/// Reaction of an active edit to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// The editor consumes the key.
    Pass,
    Commit(AfterCommit),
    Cancel,
}

/// Text produced by a finished edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub cell: CellPosition,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    mode: EditMode,
    cell: Option<CellPosition>,
    buffer: String,
    original: String,
    dirty: bool,
}

/// Editing may only start on exactly one selected cell of an editable column.
pub fn can_begin(selection: Option<&GridSelection>, column: Option<&GridColumn>) -> bool {
    let single = selection.is_some_and(is_single_cell_selection);
    single && column.is_some_and(GridColumn::can_enter_edit)
}

impl EditSession {
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode != EditMode::None
    }

    pub fn cell(&self) -> Option<CellPosition> {
        self.cell
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Start a full edit seeded with the raw editable text.
    pub fn begin_full(&mut self, cell: CellPosition, text: String) -> bool {
        if self.is_editing() {
            return false;
        }
        tracing::debug!(col = cell.col, row = cell.row, "full edit started");
        self.mode = EditMode::Full;
        self.cell = Some(cell);
        self.original.clone_from(&text);
        self.buffer = text;
        self.dirty = false;
        true
    }

    /// Start a quick edit. The seed already contains the typed character.
    pub fn begin_quick(&mut self, cell: CellPosition, original: String, seed: String) -> bool {
        if self.is_editing() {
            return false;
        }
        tracing::debug!(col = cell.col, row = cell.row, "quick edit started");
        self.mode = EditMode::Quick;
        self.cell = Some(cell);
        self.original = original;
        self.buffer = seed;
        self.dirty = true;
        true
    }

    /// Mirror the editor's transient buffer.
    pub fn set_buffer(&mut self, text: &str) {
        if !self.is_editing() {
            return;
        }
        self.dirty = self.dirty || text != self.original;
        self.buffer = text.to_string();
    }

    pub fn on_key(&self, input: &KeyInput) -> EditAction {
        if !self.is_editing() {
            return EditAction::Pass;
        }
        match input.key {
            Key::Escape => EditAction::Cancel,
            Key::Enter if input.alt => EditAction::Pass,
            Key::Enter if input.shift => EditAction::Commit(AfterCommit::MoveUp),
            Key::Enter => EditAction::Commit(AfterCommit::MoveDown),
            Key::Tab => EditAction::Commit(AfterCommit::Navigate),
            Key::ArrowUp
            | Key::ArrowDown
            | Key::ArrowLeft
            | Key::ArrowRight
            | Key::Home
            | Key::End
            | Key::PageUp
            | Key::PageDown
                if self.mode == EditMode::Quick =>
            {
                EditAction::Commit(AfterCommit::Navigate)
            }
            _ => EditAction::Pass,
        }
    }

    /// Leave edit mode, returning the text to commit.
    pub fn commit(&mut self) -> Option<PendingCommit> {
        let cell = self.cell?;
        let text = std::mem::take(&mut self.buffer);
        self.reset();
        tracing::debug!(col = cell.col, row = cell.row, "edit committed");
        Some(PendingCommit { cell, text })
    }

    /// Leave edit mode discarding the buffer.
    pub fn cancel(&mut self) -> Option<CellPosition> {
        let cell = self.cell?;
        self.reset();
        tracing::debug!(col = cell.col, row = cell.row, "edit cancelled");
        Some(cell)
    }

    /// Focus left the editor: commit when something was typed.
    pub fn on_blur(&mut self) -> Option<PendingCommit> {
        if self.dirty {
            self.commit()
        } else {
            self.cancel();
            None
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::column::SelectColumn;

    fn cell() -> CellPosition {
        CellPosition::new(1, 2)
    }

    #[test]
    fn test_full_edit_commit() {
        let mut session = EditSession::default();
        assert!(session.begin_full(cell(), "12".into()));
        assert_eq!(session.mode(), EditMode::Full);
        assert!(!session.is_dirty());
        session.set_buffer("13");
        assert!(session.is_dirty());
        let commit = session.commit().unwrap();
        assert_eq!(commit.text, "13");
        assert_eq!(commit.cell, cell());
        assert_eq!(session.mode(), EditMode::None);
    }

    #[test]
    fn test_cannot_begin_twice() {
        let mut session = EditSession::default();
        session.begin_full(cell(), String::new());
        assert!(!session.begin_quick(cell(), String::new(), "x".into()));
        assert_eq!(session.mode(), EditMode::Full);
    }

    #[test]
    fn test_cancel_discards() {
        let mut session = EditSession::default();
        session.begin_quick(cell(), "4".into(), "45".into());
        assert_eq!(session.cancel(), Some(cell()));
        assert_eq!(session, EditSession::default());
        assert_eq!(session.commit(), None);
    }

    #[test]
    fn test_blur_commits_only_when_dirty() {
        let mut session = EditSession::default();
        session.begin_full(cell(), "a".into());
        assert_eq!(session.on_blur(), None);
        assert!(!session.is_editing());

        session.begin_full(cell(), "a".into());
        session.set_buffer("b");
        assert_eq!(session.on_blur().map(|c| c.text), Some("b".to_string()));
    }

    #[test]
    fn test_key_reactions_full() {
        let mut session = EditSession::default();
        session.begin_full(cell(), String::new());
        assert_eq!(session.on_key(&KeyInput::new(Key::Escape)), EditAction::Cancel);
        assert_eq!(
            session.on_key(&KeyInput::new(Key::Enter)),
            EditAction::Commit(AfterCommit::MoveDown)
        );
        assert_eq!(
            session.on_key(&KeyInput::new(Key::Tab).shift()),
            EditAction::Commit(AfterCommit::Navigate)
        );
        // Cursor keys belong to the text editor
        assert_eq!(session.on_key(&KeyInput::new(Key::ArrowLeft)), EditAction::Pass);
        assert_eq!(session.on_key(&KeyInput::new(Key::Home)), EditAction::Pass);
    }

    #[test]
    fn test_key_reactions_quick() {
        let mut session = EditSession::default();
        session.begin_quick(cell(), String::new(), "5".into());
        assert_eq!(
            session.on_key(&KeyInput::new(Key::ArrowDown)),
            EditAction::Commit(AfterCommit::Navigate)
        );
        assert_eq!(session.on_key(&KeyInput::new(Key::Char('6'))), EditAction::Pass);
    }

    #[test]
    fn test_can_begin_gates() {
        let single = GridSelection::single(cell());
        let range = GridSelection::from_corners(cell(), CellPosition::new(2, 2));
        let text = GridColumn::text("id", "ID");
        let select = GridColumn::new("status", "Status", SelectColumn::new(["Open"]));
        let locked = GridColumn::text("id", "ID").disabled(true);

        assert!(can_begin(Some(&single), Some(&text)));
        assert!(!can_begin(Some(&range), Some(&text)));
        assert!(!can_begin(None, Some(&text)));
        assert!(!can_begin(Some(&single), Some(&select)));
        assert!(!can_begin(Some(&single), Some(&locked)));
        assert!(!can_begin(Some(&single), None));
    }
}
