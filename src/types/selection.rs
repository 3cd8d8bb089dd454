use serde::{Deserialize, Serialize};

/// Zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPosition {
    pub col: u32,
    pub row: u32,
}

impl CellPosition {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Clamp both components into a `row_count` x `col_count` grid.
    ///
    /// Callers must rule out empty grids first.
    pub fn clamp_to(self, row_count: u32, col_count: u32) -> Self {
        Self {
            col: self.col.min(col_count.saturating_sub(1)),
            row: self.row.min(row_count.saturating_sub(1)),
        }
    }
}

/// Axis-aligned selection rectangle.
///
/// Fields are private so `min <= max` holds on both axes; build one with
/// [`GridSelection::from_corners`] or [`GridSelection::single`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSelection", into = "RawSelection")]
pub struct GridSelection {
    min: CellPosition,
    max: CellPosition,
}

impl GridSelection {
    /// Bounding box of two arbitrary corners.
    pub fn from_corners(a: CellPosition, b: CellPosition) -> Self {
        Self {
            min: CellPosition::new(a.col.min(b.col), a.row.min(b.row)),
            max: CellPosition::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn single(pos: CellPosition) -> Self {
        Self { min: pos, max: pos }
    }

    pub fn min(&self) -> CellPosition {
        self.min
    }

    pub fn max(&self) -> CellPosition {
        self.max
    }

    /// Number of columns covered.
    pub fn width(&self) -> u32 {
        self.max.col - self.min.col + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> u32 {
        self.max.row - self.min.row + 1
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        pos.col >= self.min.col
            && pos.col <= self.max.col
            && pos.row >= self.min.row
            && pos.row <= self.max.row
    }

    /// Iterate every covered position in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPosition> {
        let (min, max) = (self.min, self.max);
        (min.row..=max.row)
            .flat_map(move |row| (min.col..=max.col).map(move |col| CellPosition::new(col, row)))
    }
}

/// Wire form of a selection; normalised when converted back.
#[derive(Serialize, Deserialize)]
struct RawSelection {
    min: CellPosition,
    max: CellPosition,
}

impl From<RawSelection> for GridSelection {
    fn from(raw: RawSelection) -> Self {
        Self::from_corners(raw.min, raw.max)
    }
}

impl From<GridSelection> for RawSelection {
    fn from(sel: GridSelection) -> Self {
        Self {
            min: sel.min,
            max: sel.max,
        }
    }
}

/// Snapshot of the grid's selection and editing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub active_cell: Option<CellPosition>,
    /// Fixed corner of a range; `None` means the range is just the active cell.
    pub anchor: Option<CellPosition>,
    pub is_editing: bool,
}

impl SelectionState {
    /// Rectangle spanned by the active cell and the anchor.
    pub fn selection(&self) -> Option<GridSelection> {
        let active = self.active_cell?;
        Some(GridSelection::from_corners(
            active,
            self.anchor.unwrap_or(active),
        ))
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

    #[test]
    fn test_from_corners_normalises() {
        let sel = GridSelection::from_corners(CellPosition::new(3, 1), CellPosition::new(0, 4));
        assert_eq!(sel.min(), CellPosition::new(0, 1));
        assert_eq!(sel.max(), CellPosition::new(3, 4));
        assert_eq!(sel.width(), 4);
        assert_eq!(sel.height(), 4);
    }

    #[test]
    fn test_cells_row_major() {
        let sel = GridSelection::from_corners(CellPosition::new(0, 0), CellPosition::new(1, 1));
        let cells: Vec<_> = sel.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellPosition::new(0, 0),
                CellPosition::new(1, 0),
                CellPosition::new(0, 1),
                CellPosition::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_deserialize_swapped_corners() {
        let sel: GridSelection =
            serde_json::from_str(r#"{"min":{"col":2,"row":5},"max":{"col":0,"row":1}}"#).unwrap();
        assert_eq!(sel.min(), CellPosition::new(0, 1));
        assert_eq!(sel.max(), CellPosition::new(2, 5));
    }

    #[test]
    fn test_state_without_anchor_is_single_cell() {
        let state = SelectionState {
            active_cell: Some(CellPosition::new(2, 3)),
            anchor: None,
            is_editing: false,
        };
        assert_eq!(
            state.selection(),
            Some(GridSelection::single(CellPosition::new(2, 3)))
        );
        assert_eq!(SelectionState::default().selection(), None);
    }
}
