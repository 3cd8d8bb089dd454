//! Row mutations.
//!
//! Every function takes the host's rows by reference and returns a brand-new
//! array; the host decides whether to adopt it.

use crate::column::GridColumn;
use crate::selection::is_full_row_selected;
use crate::types::{CellPosition, CellValue, GridSelection, Row};

/// Delete the selected cells.
///
/// A full-row selection removes the rows when `allow_row_delete` is set;
/// otherwise every selected, non-disabled cell is reset to its column's
/// delete value.
pub fn delete_selection(
    selection: &GridSelection,
    rows: &[Row],
    columns: &[GridColumn],
    allow_row_delete: bool,
) -> Vec<Row> {
    let col_count = u32::try_from(columns.len()).unwrap_or(u32::MAX);
    let (min, max) = (selection.min(), selection.max());

    if allow_row_delete && is_full_row_selected(selection, col_count) {
        return rows
            .iter()
            .enumerate()
            .filter(|(idx, _)| !(min.row as usize..=max.row as usize).contains(idx))
            .map(|(_, row)| row.clone())
            .collect();
    }

    let mut result = rows.to_vec();
    for row_idx in min.row..=max.row {
        let Some(row) = result.get_mut(row_idx as usize) else {
            break;
        };
        for col_idx in min.col..=max.col {
            let Some(column) = columns.get(col_idx as usize) else {
                break;
            };
            if column.is_disabled() {
                continue;
            }
            row.insert(column.accessor_key.clone(), column.delete_value());
        }
    }
    result
}

/// Write one value, returning `None` when nothing would change.
pub fn set_cell_value(
    rows: &[Row],
    columns: &[GridColumn],
    cell: CellPosition,
    value: CellValue,
) -> Option<Vec<Row>> {
    let column = columns.get(cell.col as usize)?;
    let current = rows.get(cell.row as usize)?;
    if column.value(current) == &value {
        return None;
    }
    let mut result = rows.to_vec();
    result
        .get_mut(cell.row as usize)?
        .insert(column.accessor_key.clone(), value);
    Some(result)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::column::DeleteValue;
    use crate::types::row_from;

    fn columns() -> Vec<GridColumn> {
        vec![
            GridColumn::text("id", "ID").disabled(true),
            GridColumn::number("demand", "Demand")
                .with_delete_value(DeleteValue::Literal(CellValue::Number(0.0))),
            GridColumn::text("tag", "Tag"),
        ]
    }

    fn rows() -> Vec<Row> {
        (0..4)
            .map(|i| {
                row_from([
                    ("id", CellValue::from(format!("J{i}"))),
                    ("demand", CellValue::Number(f64::from(i) * 1.5)),
                    ("tag", CellValue::from("x")),
                ])
            })
            .collect()
    }

    #[test]
    fn test_full_rows_spliced() {
        let sel = GridSelection::from_corners(CellPosition::new(0, 1), CellPosition::new(2, 2));
        let result = delete_selection(&sel, &rows(), &columns(), true);
        let ids: Vec<_> = result.iter().map(|r| r["id"].to_string()).collect();
        assert_eq!(ids, vec!["J0", "J3"]);
    }

    #[test]
    fn test_full_rows_locked_resets_values() {
        let sel = GridSelection::from_corners(CellPosition::new(0, 1), CellPosition::new(2, 1));
        let result = delete_selection(&sel, &rows(), &columns(), false);
        assert_eq!(result.len(), 4);
        assert_eq!(result[1]["id"], CellValue::from("J1"));
        assert_eq!(result[1]["demand"], CellValue::Number(0.0));
        assert_eq!(result[1]["tag"], CellValue::Null);
        assert_eq!(result[2]["tag"], CellValue::from("x"));
    }

    #[test]
    fn test_partial_rectangle_never_splices() {
        let sel = GridSelection::from_corners(CellPosition::new(1, 0), CellPosition::new(2, 3));
        let result = delete_selection(&sel, &rows(), &columns(), true);
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|r| r["tag"].is_null()));
    }

    #[test]
    fn test_set_cell_value() {
        let cols = columns();
        let data = rows();
        let updated = set_cell_value(&data, &cols, CellPosition::new(2, 3), "y".into()).unwrap();
        assert_eq!(updated[3]["tag"], CellValue::from("y"));
        assert!(set_cell_value(&data, &cols, CellPosition::new(2, 3), "x".into()).is_none());
        assert!(set_cell_value(&data, &cols, CellPosition::new(2, 9), "x".into()).is_none());
    }
}
