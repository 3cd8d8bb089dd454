//! Keyboard navigation.
//!
//! [`navigate`] is a pure mapping from the current grid context and a key press
//! to a selection intent. It never touches a [`SelectionModel`]; the controller
//! applies the returned intent.
//!
//! [`SelectionModel`]: crate::selection::SelectionModel

use crate::edit::EditMode;
use crate::types::CellPosition;

/// Logical key, decoded from a DOM `KeyboardEvent.key` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Enter,
    Escape,
    Delete,
    Backspace,
    Space,
    Char(char),
    Other,
}

impl Key {
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Delete" | "Del" => Self::Delete,
            "Backspace" => Self::Backspace,
            " " | "Spacebar" => Self::Space,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// A key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn from_dom(key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        Self {
            key: Key::from_dom(key),
            shift,
            ctrl,
            alt,
            meta,
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Browsers report AltGr as Ctrl+Alt.
    pub fn is_alt_gr(&self) -> bool {
        self.ctrl && self.alt && !self.meta
    }

    /// A lone character that should start a quick edit.
    pub fn is_printable(&self) -> bool {
        if !self.is_alt_gr() && (self.primary() || self.alt) {
            return false;
        }
        match self.key {
            Key::Char(_) => true,
            Key::Space => !self.shift,
            _ => false,
        }
    }

    /// The character typed, for printable keys.
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c),
            Key::Space => Some(' '),
            _ => None,
        }
    }

    pub fn is_primary_char(&self, c: char) -> bool {
        self.primary() && matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Everything navigation needs to know about the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavContext {
    pub active_cell: Option<CellPosition>,
    pub row_count: u32,
    pub col_count: u32,
    pub edit_mode: EditMode,
    /// Rows per page, supplied by the host from its viewport height.
    pub visible_row_count: u32,
}

/// Selection change proposed by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    /// Move the active cell, dropping the anchor.
    Select(CellPosition),
    /// Move the active cell, keeping the anchor.
    Extend(CellPosition),
    SelectRow(u32),
    SelectColumn(u32),
    SelectAll,
    /// Clear the selection and hand focus back to the document.
    TabOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavOutcome {
    pub intent: NavIntent,
    /// Whether the browser's default handling should be suppressed.
    pub prevent_default: bool,
}

/// Map a key press onto a navigation intent.
///
/// Returns `None` when the key is not a navigation key, when the grid is
/// empty, or while a full edit owns the keyboard.
pub fn navigate(ctx: &NavContext, input: &KeyInput) -> Option<NavOutcome> {
    if ctx.edit_mode == EditMode::Full || ctx.row_count == 0 || ctx.col_count == 0 {
        return None;
    }
    let intent = intent_for(ctx, input)?;
    Some(NavOutcome {
        intent,
        // Quick edits still need the key to reach the editor's commit path.
        prevent_default: ctx.edit_mode != EditMode::Quick,
    })
}

fn move_or_extend(target: CellPosition, extend: bool) -> NavIntent {
    if extend {
        NavIntent::Extend(target)
    } else {
        NavIntent::Select(target)
    }
}

fn intent_for(ctx: &NavContext, input: &KeyInput) -> Option<NavIntent> {
    let last_col = ctx.col_count - 1;
    let last_row = ctx.row_count - 1;

    // Grid-global moves work without an active cell.
    if input.primary() {
        let corner = match input.key {
            Key::Home => Some(CellPosition::new(0, 0)),
            Key::End => Some(CellPosition::new(last_col, last_row)),
            _ => None,
        };
        if let Some(corner) = corner {
            return Some(move_or_extend(
                corner,
                input.shift && ctx.active_cell.is_some(),
            ));
        }
        if input.is_primary_char('a') {
            return Some(NavIntent::SelectAll);
        }
    }

    let active = ctx.active_cell?;
    let (col, row) = (active.col, active.row);
    let page = ctx.visible_row_count.max(1);

    let target = match input.key {
        Key::ArrowUp if input.primary() => CellPosition::new(col, 0),
        Key::ArrowDown if input.primary() => CellPosition::new(col, last_row),
        Key::ArrowLeft if input.primary() => CellPosition::new(0, row),
        Key::ArrowRight if input.primary() => CellPosition::new(last_col, row),
        Key::ArrowUp => CellPosition::new(col, row.saturating_sub(1)),
        Key::ArrowDown => CellPosition::new(col, (row + 1).min(last_row)),
        Key::ArrowLeft => CellPosition::new(col.saturating_sub(1), row),
        Key::ArrowRight => CellPosition::new((col + 1).min(last_col), row),
        Key::PageUp => CellPosition::new(col, row.saturating_sub(page)),
        Key::PageDown => CellPosition::new(col, row.saturating_add(page).min(last_row)),
        Key::Home => CellPosition::new(0, row),
        Key::End => CellPosition::new(last_col, row),
        Key::Tab if input.shift => {
            if col == 0 {
                return Some(NavIntent::TabOut);
            }
            return Some(NavIntent::Select(CellPosition::new(col - 1, row)));
        }
        Key::Tab => {
            if col == last_col {
                return Some(NavIntent::TabOut);
            }
            return Some(NavIntent::Select(CellPosition::new(col + 1, row)));
        }
        Key::Space if input.primary() => return Some(NavIntent::SelectColumn(col)),
        Key::Space if input.shift => return Some(NavIntent::SelectRow(row)),
        _ => return None,
    };
    Some(move_or_extend(target, input.shift))
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
    use test_case::test_case;

    fn ctx(col: u32, row: u32) -> NavContext {
        NavContext {
            active_cell: Some(CellPosition::new(col, row)),
            row_count: 10,
            col_count: 4,
            edit_mode: EditMode::None,
            visible_row_count: 3,
        }
    }

    fn intent(ctx: &NavContext, input: KeyInput) -> Option<NavIntent> {
        navigate(ctx, &input).map(|o| o.intent)
    }

    #[test_case("ArrowUp", Key::ArrowUp)]
    #[test_case("Esc", Key::Escape)]
    #[test_case(" ", Key::Space)]
    #[test_case("a", Key::Char('a'))]
    #[test_case("Ä", Key::Char('Ä'))]
    #[test_case("Shift", Key::Other)]
    #[test_case("F2", Key::Other)]
    fn test_key_from_dom(dom: &str, expected: Key) {
        assert_eq!(Key::from_dom(dom), expected);
    }

    #[test_case(Key::ArrowUp, 1, 4)]
    #[test_case(Key::ArrowDown, 1, 6)]
    #[test_case(Key::ArrowLeft, 0, 5)]
    #[test_case(Key::ArrowRight, 2, 5)]
    #[test_case(Key::PageUp, 1, 2)]
    #[test_case(Key::PageDown, 1, 8)]
    #[test_case(Key::Home, 0, 5)]
    #[test_case(Key::End, 3, 5)]
    fn test_moves_from_middle(key: Key, col: u32, row: u32) {
        assert_eq!(
            intent(&ctx(1, 5), KeyInput::new(key)),
            Some(NavIntent::Select(CellPosition::new(col, row)))
        );
    }

    #[test_case(Key::ArrowUp, 0, 0)]
    #[test_case(Key::ArrowLeft, 0, 0)]
    #[test_case(Key::PageUp, 0, 0)]
    fn test_clamps_at_top_left(key: Key, col: u32, row: u32) {
        assert_eq!(
            intent(&ctx(0, 0), KeyInput::new(key)),
            Some(NavIntent::Select(CellPosition::new(col, row)))
        );
    }

    #[test]
    fn test_clamps_at_bottom_right() {
        let c = ctx(3, 9);
        let bottom_right = Some(NavIntent::Select(CellPosition::new(3, 9)));
        assert_eq!(intent(&c, KeyInput::new(Key::ArrowDown)), bottom_right);
        assert_eq!(intent(&c, KeyInput::new(Key::ArrowRight)), bottom_right);
        assert_eq!(intent(&c, KeyInput::new(Key::PageDown)), bottom_right);
    }

    #[test]
    fn test_shift_extends() {
        assert_eq!(
            intent(&ctx(1, 1), KeyInput::new(Key::ArrowDown).shift()),
            Some(NavIntent::Extend(CellPosition::new(1, 2)))
        );
        assert_eq!(
            intent(&ctx(1, 1), KeyInput::new(Key::End).shift()),
            Some(NavIntent::Extend(CellPosition::new(3, 1)))
        );
    }

    #[test]
    fn test_ctrl_arrow_jumps_to_edge() {
        assert_eq!(
            intent(&ctx(1, 5), KeyInput::new(Key::ArrowDown).ctrl()),
            Some(NavIntent::Select(CellPosition::new(1, 9)))
        );
        assert_eq!(
            intent(&ctx(1, 5), KeyInput::new(Key::ArrowLeft).meta().shift()),
            Some(NavIntent::Extend(CellPosition::new(0, 5)))
        );
    }

    #[test]
    fn test_ctrl_home_end_without_active_cell() {
        let mut c = ctx(0, 0);
        c.active_cell = None;
        assert_eq!(
            intent(&c, KeyInput::new(Key::End).ctrl()),
            Some(NavIntent::Select(CellPosition::new(3, 9)))
        );
        assert_eq!(
            intent(&c, KeyInput::new(Key::Home).meta().shift()),
            Some(NavIntent::Select(CellPosition::new(0, 0)))
        );
        // Plain moves need an active cell
        assert_eq!(intent(&c, KeyInput::new(Key::ArrowDown)), None);
    }

    #[test]
    fn test_tab_moves_and_tabs_out() {
        assert_eq!(
            intent(&ctx(1, 2), KeyInput::new(Key::Tab)),
            Some(NavIntent::Select(CellPosition::new(2, 2)))
        );
        assert_eq!(
            intent(&ctx(1, 2), KeyInput::new(Key::Tab).shift()),
            Some(NavIntent::Select(CellPosition::new(0, 2)))
        );
        assert_eq!(
            intent(&ctx(3, 2), KeyInput::new(Key::Tab)),
            Some(NavIntent::TabOut)
        );
        assert_eq!(
            intent(&ctx(0, 2), KeyInput::new(Key::Tab).shift()),
            Some(NavIntent::TabOut)
        );
    }

    #[test]
    fn test_space_chords() {
        assert_eq!(
            intent(&ctx(2, 7), KeyInput::new(Key::Space).shift()),
            Some(NavIntent::SelectRow(7))
        );
        assert_eq!(
            intent(&ctx(2, 7), KeyInput::new(Key::Space).ctrl()),
            Some(NavIntent::SelectColumn(2))
        );
        assert_eq!(intent(&ctx(2, 7), KeyInput::new(Key::Space)), None);
        assert_eq!(
            intent(&ctx(2, 7), KeyInput::new(Key::Char('A')).meta()),
            Some(NavIntent::SelectAll)
        );
    }

    #[test]
    fn test_full_edit_suppresses_everything() {
        let mut c = ctx(1, 1);
        c.edit_mode = EditMode::Full;
        for key in [Key::ArrowDown, Key::Home, Key::Tab, Key::PageDown] {
            assert_eq!(navigate(&c, &KeyInput::new(key)), None);
        }
    }

    #[test]
    fn test_quick_edit_keeps_default_handling() {
        let mut c = ctx(1, 1);
        c.edit_mode = EditMode::Quick;
        let outcome = navigate(&c, &KeyInput::new(Key::ArrowDown)).unwrap();
        assert_eq!(outcome.intent, NavIntent::Select(CellPosition::new(1, 2)));
        assert!(!outcome.prevent_default);

        c.edit_mode = EditMode::None;
        assert!(navigate(&c, &KeyInput::new(Key::ArrowDown)).unwrap().prevent_default);
    }

    #[test]
    fn test_empty_grid() {
        let mut c = ctx(0, 0);
        c.row_count = 0;
        assert_eq!(navigate(&c, &KeyInput::new(Key::End).ctrl()), None);
    }

    #[test]
    fn test_printable() {
        assert!(KeyInput::new(Key::Char('5')).is_printable());
        assert!(KeyInput::new(Key::Char('Q')).shift().is_printable());
        assert!(KeyInput::new(Key::Space).is_printable());
        assert!(!KeyInput::new(Key::Space).shift().is_printable());
        assert!(!KeyInput::new(Key::Char('c')).ctrl().is_printable());
        assert!(!KeyInput::new(Key::Enter).is_printable());
    }

    #[test]
    fn test_alt_gr_characters_are_printable() {
        let alt_gr_at = KeyInput::from_dom("@", false, true, true, false);
        assert!(alt_gr_at.is_alt_gr());
        assert!(alt_gr_at.is_printable());
        assert_eq!(alt_gr_at.text(), Some('@'));
        assert!(!KeyInput::from_dom("q", false, false, true, false).is_printable());
        assert!(!KeyInput::from_dom("q", false, true, true, true).is_printable());
    }
}
