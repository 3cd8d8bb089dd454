//! Pointer gestures and the drag session's pointer-up subscription.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::rc::Rc;

use common::{grid, pos};
use netgrid::controller::DragKind;
use netgrid::edit::EditMode;
use netgrid::navigation::{Key, KeyInput};
use netgrid::types::GridSelection;

#[test]
fn test_drag_extends_and_releases_subscription() {
    let mut g = grid(6);
    assert!(g.pointer_down(pos(1, 1), false));
    assert!(g.is_dragging());
    assert_eq!(g.host().live_listeners.get(), 1);

    g.pointer_enter(pos(2, 2));
    g.pointer_enter(pos(3, 4));
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(1, 1), pos(3, 4)))
    );

    assert!(g.pointer_up());
    assert!(!g.is_dragging());
    assert_eq!(g.host().live_listeners.get(), 0);

    // Hovering after release changes nothing.
    assert!(!g.pointer_enter(pos(0, 0)));
    assert!(!g.pointer_up());
}

#[test]
fn test_repeated_pointer_down_keeps_one_subscription() {
    let mut g = grid(4);
    g.pointer_down(pos(0, 0), false);
    g.pointer_down(pos(1, 1), false);
    g.pointer_down(pos(1, 1), false);
    assert_eq!(g.host().subscriptions, 3);
    assert_eq!(g.host().live_listeners.get(), 1);
}

#[test]
fn test_teardown_releases_subscription() {
    let mut g = grid(4);
    g.pointer_down(pos(2, 2), false);
    let live = Rc::clone(&g.host().live_listeners);
    assert_eq!(live.get(), 1);
    drop(g);
    assert_eq!(live.get(), 0);
}

#[test]
fn test_clear_ends_drag() {
    let mut g = grid(4);
    g.pointer_down(pos(2, 2), false);
    g.clear();
    assert!(!g.is_dragging());
    assert_eq!(g.host().live_listeners.get(), 0);
}

#[test]
fn test_shift_pointer_down_extends_without_drag() {
    let mut g = grid(5);
    g.pointer_down(pos(0, 0), false);
    g.pointer_up();
    assert!(g.pointer_down(pos(2, 3), true));
    assert!(!g.is_dragging());
    assert_eq!(g.host().subscriptions, 1);
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(0, 0), pos(2, 3)))
    );
}

#[test]
fn test_shift_pointer_down_without_active_cell_selects_without_drag() {
    let mut g = grid(4);
    assert!(g.pointer_down(pos(1, 1), true));
    assert_eq!(g.active_cell(), Some(pos(1, 1)));
    assert!(!g.is_dragging());
    assert_eq!(g.host().subscriptions, 0);
    assert_eq!(g.host().live_listeners.get(), 0);
}

#[test]
fn test_pointer_down_commits_full_edit_without_drag() {
    let mut g = grid(5);
    g.set_active_cell(Some(pos(3, 0)));
    g.handle_key(KeyInput::new(Key::Enter));
    g.set_edit_buffer("moved");

    // Clicking inside the editor is the editor's business.
    assert!(!g.pointer_down(pos(3, 0), false));
    assert_eq!(g.edit_mode(), EditMode::Full);

    assert!(g.pointer_down(pos(1, 2), false));
    assert_eq!(g.edit_mode(), EditMode::None);
    assert_eq!(g.active_cell(), Some(pos(1, 2)));
    assert!(!g.is_dragging());
    assert_eq!(
        g.host().rows[0]["tag"],
        netgrid::types::CellValue::from("moved")
    );
}

#[test]
fn test_row_header_drag_selects_row_span() {
    let mut g = grid(6);
    g.row_header_down(4, false);
    assert_eq!(g.drag_kind(), Some(DragKind::Rows));
    g.pointer_enter(pos(1, 2));
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(0, 2), pos(3, 4)))
    );
    g.pointer_up();
    assert_eq!(g.host().live_listeners.get(), 0);
}

#[test]
fn test_column_header_drag_selects_column_span() {
    let mut g = grid(6);
    g.column_header_down(1, false);
    g.pointer_enter(pos(3, 0));
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(1, 0), pos(3, 5)))
    );
    assert_eq!(g.active_cell(), Some(pos(3, 5)));
}

#[test]
fn test_corner_selects_all() {
    let mut g = grid(3);
    assert!(g.corner_down());
    assert_eq!(
        g.selection(),
        Some(GridSelection::from_corners(pos(0, 0), pos(3, 2)))
    );
    assert!(!g.is_dragging());
}

#[test]
fn test_pointer_on_empty_grid_is_noop() {
    let mut g = grid(0);
    assert!(!g.pointer_down(pos(0, 0), false));
    assert!(!g.is_dragging());
    assert_eq!(g.host().subscriptions, 0);
}
