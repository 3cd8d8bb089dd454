//! Clipboard codec and clipboard backends.
//!
//! The wire format is plain tab-separated text: cells joined by `\t`, rows by
//! `\n`, which is what spreadsheet applications put on the clipboard.

use std::cell::{Cell, RefCell};
use std::future::Future;

use crate::column::GridColumn;
use crate::error::{GridError, Result};
use crate::types::{CellPosition, GridSelection, Row};

/// Pasted text split into rows of cells.
pub type ClipboardMatrix = Vec<Vec<String>>;

/// Serialize the selected rectangle to clipboard text.
///
/// Rows past the end of `rows` and columns past the end of `columns` are
/// skipped.
pub fn serialize(selection: &GridSelection, rows: &[Row], columns: &[GridColumn]) -> String {
    let (min, max) = (selection.min(), selection.max());
    let mut result = String::new();
    for row_idx in min.row..=max.row {
        let Some(row) = rows.get(row_idx as usize) else {
            break;
        };
        if row_idx > min.row {
            result.push('\n');
        }
        for col_idx in min.col..=max.col {
            let Some(column) = columns.get(col_idx as usize) else {
                break;
            };
            if col_idx > min.col {
                result.push('\t');
            }
            result.push_str(&column.serialize(column.value(row)));
        }
    }
    result
}

/// Split clipboard text into a matrix.
///
/// `\r\n` line endings are accepted, and the single trailing line terminator
/// spreadsheet applications append does not count as an extra row.
pub fn parse_matrix(text: &str) -> ClipboardMatrix {
    if text.is_empty() {
        return Vec::new();
    }
    let normalized = text.replace("\r\n", "\n");
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
    body.split('\n')
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Apply pasted text at `origin`, returning the replacement row array.
///
/// Rows are appended with `row_factory` until the pasted block fits; columns
/// are never added, so clipboard cells past the last column are dropped.
/// Disabled columns keep their value but still consume a clipboard cell.
pub fn deserialize<F>(
    text: &str,
    origin: CellPosition,
    rows: &[Row],
    columns: &[GridColumn],
    mut row_factory: F,
) -> Vec<Row>
where
    F: FnMut() -> Row,
{
    let matrix = parse_matrix(text);
    let mut result = rows.to_vec();
    if matrix.is_empty() {
        return result;
    }

    let needed = origin.row as usize + matrix.len();
    while result.len() < needed {
        result.push(row_factory());
    }

    for (row_offset, cells) in matrix.iter().enumerate() {
        let Some(row) = result.get_mut(origin.row as usize + row_offset) else {
            continue;
        };
        for (col_offset, raw) in cells.iter().enumerate() {
            let Some(column) = columns.get(origin.col as usize + col_offset) else {
                break;
            };
            if column.is_disabled() {
                continue;
            }
            if let Some(value) = column.parse(raw) {
                row.insert(column.accessor_key.clone(), value);
            }
        }
    }
    result
}

/// Asynchronous access to the platform clipboard.
pub trait Clipboard {
    fn read_text(&self) -> impl Future<Output = Result<String>>;
    fn write_text(&self, text: &str) -> impl Future<Output = Result<()>>;
}

/// In-process clipboard for native hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: RefCell<String>,
    denied: Cell<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            denied: Cell::new(false),
        }
    }

    /// Make every subsequent access fail as if permission were refused.
    pub fn deny(&self, denied: bool) {
        self.denied.set(denied);
    }

    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }

    fn check(&self) -> Result<()> {
        if self.denied.get() {
            return Err(GridError::Clipboard("permission denied".into()));
        }
        Ok(())
    }
}

impl Clipboard for MemoryClipboard {
    async fn read_text(&self) -> Result<String> {
        self.check()?;
        Ok(self.contents())
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        self.check()?;
        *self.text.borrow_mut() = text.to_string();
        Ok(())
    }
}

/// `navigator.clipboard` backed implementation.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClipboard;

#[cfg(target_arch = "wasm32")]
impl BrowserClipboard {
    fn clipboard() -> Result<web_sys::Clipboard> {
        let window =
            web_sys::window().ok_or_else(|| GridError::Clipboard("no window".into()))?;
        Ok(window.navigator().clipboard())
    }

    fn js_error(err: &wasm_bindgen::JsValue) -> GridError {
        GridError::Clipboard(
            err.as_string()
                .unwrap_or_else(|| format!("{err:?}")),
        )
    }
}

#[cfg(target_arch = "wasm32")]
impl Clipboard for BrowserClipboard {
    async fn read_text(&self) -> Result<String> {
        let promise = Self::clipboard()?.read_text();
        let value = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| Self::js_error(&e))?;
        value
            .as_string()
            .ok_or_else(|| GridError::Clipboard("clipboard did not return text".into()))
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let promise = Self::clipboard()?.write_text(text);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| Self::js_error(&e))?;
        Ok(())
    }
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
    use crate::types::{row_from, CellValue};

    fn columns() -> Vec<GridColumn> {
        vec![
            GridColumn::text("id", "ID"),
            GridColumn::number("length", "Length"),
            GridColumn::number("diameter", "Diameter"),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            row_from([
                ("id", CellValue::from("P1")),
                ("length", CellValue::Number(120.5)),
                ("diameter", CellValue::Number(300.0)),
            ]),
            row_from([("id", CellValue::from("P2")), ("length", CellValue::Null)]),
        ]
    }

    #[test]
    fn test_serialize_rectangle() {
        let sel = GridSelection::from_corners(CellPosition::new(0, 0), CellPosition::new(2, 1));
        assert_eq!(serialize(&sel, &rows(), &columns()), "P1\t120.5\t300\nP2\t\t");
    }

    #[test]
    fn test_serialize_single_cell() {
        let sel = GridSelection::single(CellPosition::new(1, 0));
        assert_eq!(serialize(&sel, &rows(), &columns()), "120.5");
    }

    #[test]
    fn test_parse_matrix_line_endings() {
        assert_eq!(
            parse_matrix("a\tb\r\nc\td\r\n"),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
        assert_eq!(parse_matrix("x\n\n"), vec![vec!["x"], vec![""]]);
        assert!(parse_matrix("").is_empty());
    }

    #[test]
    fn test_deserialize_round_trip() {
        let cols = columns();
        let original = rows();
        let sel = GridSelection::from_corners(CellPosition::new(1, 0), CellPosition::new(2, 0));
        let text = serialize(&sel, &original, &cols);
        let pasted = deserialize(&text, sel.min(), &original, &cols, Row::new);
        assert_eq!(pasted, original);
    }

    #[test]
    fn test_deserialize_drops_extra_columns() {
        let cols = columns();
        let result = deserialize("9\t8\t7\t6", CellPosition::new(1, 1), &rows(), &cols, Row::new);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1]["length"], CellValue::Number(9.0));
        assert_eq!(result[1]["diameter"], CellValue::Number(8.0));
        assert_eq!(result[1].len(), 3);
    }

    #[test]
    fn test_deserialize_parse_failure_keeps_value() {
        let result = deserialize("wide", CellPosition::new(1, 0), &rows(), &columns(), Row::new);
        assert_eq!(result[0]["length"], CellValue::Number(120.5));
    }

    #[test]
    fn test_deserialize_grows_with_factory() {
        let mut made = 0;
        let result = deserialize(
            "a\nb\nc",
            CellPosition::new(0, 1),
            &rows(),
            &columns(),
            || {
                made += 1;
                row_from([("id", "new")])
            },
        );
        assert_eq!(made, 2);
        assert_eq!(result.len(), 4);
        assert_eq!(result[3]["id"], CellValue::from("c"));
    }

    #[test]
    fn test_memory_clipboard_denied() {
        let clipboard = MemoryClipboard::with_text("x");
        clipboard.deny(true);
        let read = futures::executor::block_on(clipboard.read_text());
        assert!(matches!(read, Err(GridError::Clipboard(_))));
        clipboard.deny(false);
        futures::executor::block_on(clipboard.write_text("y")).unwrap();
        assert_eq!(clipboard.contents(), "y");
    }
}
