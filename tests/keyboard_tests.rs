//! Keyboard routing through the controller: navigation, shortcuts and
//! default-action suppression.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, pos};
use netgrid::controller::ClipboardRequest;
use netgrid::navigation::{Key, KeyInput};
use netgrid::types::GridSelection;
use test_case::test_case;

#[test_case(Key::ArrowDown, 1, 3)]
#[test_case(Key::ArrowUp, 1, 1)]
#[test_case(Key::ArrowRight, 2, 2)]
#[test_case(Key::Home, 0, 2)]
#[test_case(Key::End, 3, 2)]
fn test_arrow_family_moves_active_cell(key: Key, col: u32, row: u32) {
    let mut g = grid(6);
    g.set_active_cell(Some(pos(1, 2)));
    let outcome = g.handle_key(KeyInput::new(key));
    assert!(outcome.handled);
    assert!(outcome.prevent_default);
    assert_eq!(g.selection(), Some(GridSelection::single(pos(col, row))));
}

#[test]
fn test_page_keys_use_host_viewport() {
    let mut g = grid(20);
    g.host_mut().visible_rows = Some(7);
    g.set_active_cell(Some(pos(0, 0)));
    g.handle_key(KeyInput::new(Key::PageDown));
    assert_eq!(g.active_cell(), Some(pos(0, 7)));
    g.handle_key(KeyInput::new(Key::PageDown));
    g.handle_key(KeyInput::new(Key::PageDown));
    assert_eq!(g.active_cell(), Some(pos(0, 19)));
    g.handle_key(KeyInput::new(Key::PageUp));
    assert_eq!(g.active_cell(), Some(pos(0, 12)));
}

#[test]
fn test_page_keys_fall_back_to_default_page() {
    let mut g = grid(30);
    g.set_active_cell(Some(pos(0, 0)));
    g.handle_key(KeyInput::new(Key::PageDown));
    assert_eq!(
        g.active_cell(),
        Some(pos(0, g.options().default_visible_rows))
    );
}

#[test]
fn test_ctrl_home_end_seed_without_active_cell() {
    let mut g = grid(5);
    assert!(g.handle_key(KeyInput::new(Key::End).ctrl()).handled);
    assert_eq!(g.active_cell(), Some(pos(3, 4)));
    g.handle_key(KeyInput::new(Key::Home).meta());
    assert_eq!(g.active_cell(), Some(pos(0, 0)));
}

#[test]
fn test_ctrl_shift_end_extends() {
    let mut g = grid(5);
    g.set_active_cell(Some(pos(1, 1)));
    g.handle_key(KeyInput::new(Key::End).ctrl().shift());
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(1, 1), pos(3, 4)))
    );
}

#[test]
fn test_shift_arrows_keep_anchor() {
    let mut g = grid(5);
    g.set_active_cell(Some(pos(2, 2)));
    g.handle_key(KeyInput::new(Key::ArrowUp).shift());
    g.handle_key(KeyInput::new(Key::ArrowLeft).shift());
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(1, 1), pos(2, 2)))
    );
    g.handle_key(KeyInput::new(Key::ArrowDown));
    assert_eq!(g.selection(), Some(GridSelection::single(pos(1, 2))));
}

#[test]
fn test_space_variants_select_row_and_column() {
    let mut g = grid(5);
    g.set_active_cell(Some(pos(2, 3)));
    g.handle_key(KeyInput::new(Key::Space).shift());
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(0, 3), pos(3, 3)))
    );

    g.set_active_cell(Some(pos(2, 3)));
    g.handle_key(KeyInput::new(Key::Space).ctrl());
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(2, 0), pos(2, 4)))
    );
}

#[test]
fn test_ctrl_a_selects_all() {
    let mut g = grid(5);
    g.handle_key(KeyInput::new(Key::Char('a')).ctrl());
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(0, 0), pos(3, 4)))
    );
    assert_eq!(g.active_cell(), Some(pos(3, 4)));
}

#[test]
fn test_shift_tab_at_first_column_tabs_out() {
    let mut g = grid(3);
    g.set_active_cell(Some(pos(0, 1)));
    let outcome = g.handle_key(KeyInput::new(Key::Tab).shift());
    assert!(outcome.handled);
    assert_eq!(g.selection(), None);
    assert_eq!(g.host().blur_calls, 1);
}

#[test]
fn test_tab_moves_without_wrapping() {
    let mut g = grid(3);
    g.set_active_cell(Some(pos(2, 1)));
    g.handle_key(KeyInput::new(Key::Tab));
    assert_eq!(g.active_cell(), Some(pos(3, 1)));
    g.handle_key(KeyInput::new(Key::Tab).shift());
    assert_eq!(g.active_cell(), Some(pos(2, 1)));
}

#[test_case('c', ClipboardRequest::Copy)]
#[test_case('x', ClipboardRequest::Cut)]
#[test_case('V', ClipboardRequest::Paste)]
fn test_clipboard_shortcuts(c: char, expected: ClipboardRequest) {
    let mut g = grid(3);
    assert!(!g.handle_key(KeyInput::new(Key::Char(c)).ctrl()).handled);

    g.set_active_cell(Some(pos(1, 1)));
    let outcome = g.handle_key(KeyInput::new(Key::Char(c)).meta());
    assert!(outcome.handled);
    assert_eq!(outcome.clipboard, Some(expected));
    // The request is only a signal; no data was touched yet.
    assert!(g.host().replacements.is_empty());
}

#[test]
fn test_unmapped_key_is_not_handled() {
    let mut g = grid(3);
    g.set_active_cell(Some(pos(1, 1)));
    let outcome = g.handle_key(KeyInput::new(Key::Other));
    assert!(!outcome.handled);
    assert!(!outcome.prevent_default);
    assert_eq!(outcome.clipboard, None);
}

#[test]
fn test_shift_space_does_not_start_edit() {
    let mut g = grid(3);
    g.set_active_cell(Some(pos(3, 0)));
    g.handle_key(KeyInput::new(Key::Space).shift());
    assert!(!g.state().is_editing);
}

#[test]
fn test_alt_gr_character_starts_quick_edit() {
    let mut g = grid(3);
    g.set_active_cell(Some(pos(3, 0)));
    let outcome = g.handle_key(KeyInput::from_dom("@", false, true, true, false));
    assert!(outcome.handled);
    assert_eq!(outcome.clipboard, None);
    assert_eq!(g.edit_buffer(), Some("t0@"));
}
