//! Selection model: active cell + anchor over a `row_count` x `col_count` grid.
//!
//! Every mutating operation returns `true` when the observable state changed,
//! so callers only notify the host on real transitions. Operations on an empty
//! grid are silent no-ops.

use crate::types::{CellPosition, GridSelection};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    active_cell: Option<CellPosition>,
    anchor: Option<CellPosition>,
    row_count: u32,
    col_count: u32,
}

impl SelectionModel {
    pub fn new(row_count: u32, col_count: u32) -> Self {
        Self {
            row_count,
            col_count,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    pub fn active_cell(&self) -> Option<CellPosition> {
        self.active_cell
    }

    pub fn anchor(&self) -> Option<CellPosition> {
        self.anchor
    }

    pub fn is_empty_grid(&self) -> bool {
        self.row_count == 0 || self.col_count == 0
    }

    /// Current rectangle, `None` when nothing is selected.
    pub fn selection(&self) -> Option<GridSelection> {
        let active = self.active_cell?;
        Some(GridSelection::from_corners(
            active,
            self.anchor.unwrap_or(active),
        ))
    }

    pub fn is_single_cell(&self) -> bool {
        self.selection().is_some_and(|s| is_single_cell_selection(&s))
    }

    fn set(&mut self, active: Option<CellPosition>, anchor: Option<CellPosition>) -> bool {
        // An anchor equal to the active cell carries no information.
        let anchor = anchor.filter(|a| Some(*a) != active);
        if self.active_cell == active && self.anchor == anchor {
            return false;
        }
        self.active_cell = active;
        self.anchor = anchor;
        true
    }

    fn clamp(&self, pos: CellPosition) -> CellPosition {
        pos.clamp_to(self.row_count, self.col_count)
    }

    fn last_col(&self) -> u32 {
        self.col_count.saturating_sub(1)
    }

    fn last_row(&self) -> u32 {
        self.row_count.saturating_sub(1)
    }

    pub fn select_single(&mut self, pos: CellPosition) -> bool {
        if self.is_empty_grid() {
            return false;
        }
        let pos = self.clamp(pos);
        self.set(Some(pos), None)
    }

    /// Move the active corner to `pos`, keeping (or seeding) the anchor.
    pub fn extend_to(&mut self, pos: CellPosition) -> bool {
        if self.is_empty_grid() {
            return false;
        }
        let Some(active) = self.active_cell else {
            return self.select_single(pos);
        };
        let anchor = self.anchor.unwrap_or(active);
        let pos = self.clamp(pos);
        self.set(Some(pos), Some(anchor))
    }

    /// Select a full row. With `extend`, the rows between the existing anchor
    /// and `row` are covered as well.
    pub fn select_row(&mut self, row: u32, extend: bool) -> bool {
        if self.is_empty_grid() {
            return false;
        }
        let row = row.min(self.last_row());
        let anchor_row = match (extend, self.anchor.or(self.active_cell)) {
            (true, Some(prev)) => prev.row,
            _ => row,
        };
        self.set(
            Some(CellPosition::new(self.last_col(), row)),
            Some(CellPosition::new(0, anchor_row)),
        )
    }

    /// Select a full column, extending from the existing anchor when asked.
    pub fn select_column(&mut self, col: u32, extend: bool) -> bool {
        if self.is_empty_grid() {
            return false;
        }
        let col = col.min(self.last_col());
        let anchor_col = match (extend, self.anchor.or(self.active_cell)) {
            (true, Some(prev)) => prev.col,
            _ => col,
        };
        self.set(
            Some(CellPosition::new(col, self.last_row())),
            Some(CellPosition::new(anchor_col, 0)),
        )
    }

    pub fn select_all(&mut self) -> bool {
        if self.is_empty_grid() {
            return false;
        }
        self.set(
            Some(CellPosition::new(self.last_col(), self.last_row())),
            Some(CellPosition::new(0, 0)),
        )
    }

    /// Replace the selection wholesale. `rect.min` becomes the anchor and
    /// `rect.max` the active cell.
    pub fn set_rectangle(&mut self, rect: Option<GridSelection>) -> bool {
        let Some(rect) = rect else {
            return self.clear();
        };
        if self.is_empty_grid() {
            return false;
        }
        let anchor = self.clamp(rect.min());
        let active = self.clamp(rect.max());
        self.set(Some(active), Some(anchor))
    }

    /// Shrink a range to its active cell.
    pub fn collapse_to_active(&mut self) -> bool {
        let active = self.active_cell;
        self.set(active, None)
    }

    pub fn clear(&mut self) -> bool {
        self.set(None, None)
    }

    /// React to a host-reported size change.
    pub fn on_grid_resized(&mut self, row_count: u32, col_count: u32) -> bool {
        self.row_count = row_count;
        self.col_count = col_count;
        if self.is_empty_grid() {
            return self.clear();
        }
        let active = self.active_cell.map(|p| self.clamp(p));
        let anchor = self.anchor.map(|p| self.clamp(p));
        self.set(active, anchor)
    }
}

/// Rectangle spans every column.
pub fn is_full_row_selected(rect: &GridSelection, col_count: u32) -> bool {
    col_count > 0 && rect.min().col == 0 && rect.max().col == col_count - 1
}

pub fn is_single_cell_selection(rect: &GridSelection) -> bool {
    rect.min() == rect.max()
}

pub fn is_cell_selected(rect: Option<&GridSelection>, pos: CellPosition) -> bool {
    rect.is_some_and(|r| r.contains(pos))
}

pub fn is_cell_active(active: Option<CellPosition>, pos: CellPosition) -> bool {
    active == Some(pos)
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

    fn pos(col: u32, row: u32) -> CellPosition {
        CellPosition::new(col, row)
    }

    fn rect(a: (u32, u32), b: (u32, u32)) -> GridSelection {
        GridSelection::from_corners(pos(a.0, a.1), pos(b.0, b.1))
    }

    #[test]
    fn test_select_single_every_position() {
        for rows in 1..4 {
            for cols in 1..4 {
                let mut model = SelectionModel::new(rows, cols);
                for row in 0..rows {
                    for col in 0..cols {
                        model.select_single(pos(col, row));
                        assert_eq!(model.selection(), Some(GridSelection::single(pos(col, row))));
                    }
                }
            }
        }
    }

    #[test]
    fn test_select_single_is_idempotent() {
        let mut model = SelectionModel::new(5, 3);
        assert!(model.select_single(pos(1, 1)));
        assert!(!model.select_single(pos(1, 1)));
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut model = SelectionModel::new(0, 3);
        assert!(!model.select_single(pos(0, 0)));
        assert!(!model.select_all());
        assert!(!model.select_row(0, false));
        assert!(!model.extend_to(pos(1, 1)));
        assert_eq!(model.selection(), None);
    }

    #[test]
    fn test_extend_without_active_selects_single() {
        let mut model = SelectionModel::new(5, 3);
        model.extend_to(pos(2, 2));
        assert_eq!(model.anchor(), None);
        assert_eq!(model.selection(), Some(GridSelection::single(pos(2, 2))));
    }

    #[test]
    fn test_extend_keeps_original_anchor() {
        let mut model = SelectionModel::new(10, 10);
        model.select_single(pos(1, 1));
        model.extend_to(pos(3, 3));
        model.extend_to(pos(0, 5));
        assert_eq!(model.anchor(), Some(pos(1, 1)));
        assert_eq!(model.selection(), Some(rect((0, 1), (1, 5))));
    }

    #[test]
    fn test_select_row_extend_unions_with_anchor() {
        let mut model = SelectionModel::new(5, 3);
        model.select_row(1, false);
        model.select_row(4, true);
        assert_eq!(model.selection(), Some(rect((0, 1), (2, 4))));
        assert_eq!(model.active_cell(), Some(pos(2, 4)));
    }

    #[test]
    fn test_three_row_extensions() {
        let mut model = SelectionModel::new(6, 3);
        model.select_row(1, false);
        model.select_row(2, true);
        model.select_row(4, true);
        assert_eq!(model.selection(), Some(rect((0, 1), (2, 4))));
    }

    #[test]
    fn test_select_column_lands_at_bottom() {
        let mut model = SelectionModel::new(5, 3);
        model.select_column(1, false);
        assert_eq!(model.active_cell(), Some(pos(1, 4)));
        assert_eq!(model.selection(), Some(rect((1, 0), (1, 4))));
        model.select_column(2, true);
        assert_eq!(model.selection(), Some(rect((1, 0), (2, 4))));
    }

    #[test]
    fn test_select_all() {
        let mut model = SelectionModel::new(5, 3);
        model.select_all();
        assert_eq!(model.active_cell(), Some(pos(2, 4)));
        let sel = model.selection().unwrap();
        assert!(is_full_row_selected(&sel, 3));
        assert_eq!(sel, rect((0, 0), (2, 4)));
    }

    #[test]
    fn test_set_rectangle_clamps() {
        let mut model = SelectionModel::new(5, 3);
        model.set_rectangle(Some(rect((1, 1), (9, 9))));
        assert_eq!(model.selection(), Some(rect((1, 1), (2, 4))));
        model.set_rectangle(None);
        assert_eq!(model.selection(), None);
    }

    #[test]
    fn test_resize_clamps_max() {
        let mut model = SelectionModel::new(10, 10);
        model.set_rectangle(Some(rect((2, 3), (8, 9))));
        assert!(model.on_grid_resized(5, 4));
        let sel = model.selection().unwrap();
        assert_eq!(sel.max(), pos(3, 4));
        assert_eq!(sel.min(), pos(2, 3));
    }

    #[test]
    fn test_resize_without_change_reports_false() {
        let mut model = SelectionModel::new(10, 10);
        model.select_single(pos(1, 1));
        assert!(!model.on_grid_resized(20, 20));
    }

    #[test]
    fn test_resize_to_zero_clears() {
        for (rows, cols) in [(0, 5), (5, 0), (0, 0)] {
            let mut model = SelectionModel::new(10, 10);
            model.select_all();
            model.on_grid_resized(rows, cols);
            assert_eq!(model.selection(), None);
            assert_eq!(model.active_cell(), None);
        }
    }

    #[test]
    fn test_clear_twice_is_safe() {
        let mut model = SelectionModel::new(3, 3);
        model.select_single(pos(0, 0));
        assert!(model.clear());
        assert!(!model.clear());
        assert_eq!(model, SelectionModel::new(3, 3));
    }

    #[test]
    fn test_collapse_to_active() {
        let mut model = SelectionModel::new(5, 5);
        model.select_single(pos(0, 0));
        model.extend_to(pos(2, 2));
        assert!(model.collapse_to_active());
        assert_eq!(model.selection(), Some(GridSelection::single(pos(2, 2))));
    }

    #[test]
    fn test_predicates() {
        let r = rect((0, 1), (2, 3));
        assert!(is_full_row_selected(&r, 3));
        assert!(!is_full_row_selected(&r, 4));
        assert!(is_cell_selected(Some(&r), pos(1, 2)));
        assert!(!is_cell_selected(Some(&r), pos(1, 4)));
        assert!(!is_cell_selected(None, pos(0, 0)));
        assert!(is_cell_active(Some(pos(1, 1)), pos(1, 1)));
        assert!(is_single_cell_selection(&GridSelection::single(pos(4, 4))));
    }
}
