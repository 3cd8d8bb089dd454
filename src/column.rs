//! Per-column capabilities.
//!
//! Every grid operation that touches a cell value goes through a
//! [`GridColumn`]: clipboard serialization, paste parsing, edit commits,
//! delete values and the read-only / keyboard-entry gates. The behavior itself
//! is a small trait so column types plug in without runtime duck-typing.

use std::fmt;
use std::rc::Rc;

use crate::types::{CellValue, Row};

static NULL_VALUE: CellValue = CellValue::Null;

/// Capabilities implemented per column type.
pub trait ColumnBehavior {
    /// Clipboard form of a value.
    fn serialize(&self, value: &CellValue) -> String {
        value.to_string()
    }

    /// Parse pasted or typed text. `None` means the text is unusable and the
    /// previous value must be kept.
    fn parse(&self, text: &str) -> Option<CellValue> {
        Some(CellValue::Text(text.to_string()))
    }

    /// Formatted text shown in the cell (seed for quick edits).
    fn display_text(&self, value: &CellValue) -> String {
        self.serialize(value)
    }

    /// Raw editable text (seed for full edits).
    fn edit_text(&self, value: &CellValue) -> String {
        self.serialize(value)
    }

    fn delete_value(&self) -> CellValue {
        CellValue::Null
    }

    fn is_disabled(&self) -> bool {
        false
    }

    /// `false` for columns whose editor manages its own open/close.
    fn allows_key_entry(&self) -> bool {
        true
    }
}

/// Plain text column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextColumn;

impl ColumnBehavior for TextColumn {}

/// Numeric column. `decimals` only affects the displayed text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberColumn {
    pub decimals: Option<usize>,
}

impl NumberColumn {
    pub fn with_decimals(decimals: usize) -> Self {
        Self {
            decimals: Some(decimals),
        }
    }
}

impl ColumnBehavior for NumberColumn {
    fn parse(&self, text: &str) -> Option<CellValue> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(CellValue::Null);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(CellValue::Number)
    }

    fn display_text(&self, value: &CellValue) -> String {
        match (value, self.decimals) {
            (CellValue::Number(n), Some(decimals)) => format!("{n:.decimals$}"),
            _ => self.serialize(value),
        }
    }
}

/// Column restricted to a fixed option list.
///
/// Its dropdown opens on click and owns Escape/Tab, so keyboard entry is off.
#[derive(Debug, Clone, Default)]
pub struct SelectColumn {
    pub options: Vec<String>,
}

impl SelectColumn {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

impl ColumnBehavior for SelectColumn {
    fn parse(&self, text: &str) -> Option<CellValue> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Some(CellValue::Null);
        }
        self.options
            .iter()
            .find(|opt| opt.eq_ignore_ascii_case(trimmed))
            .map(|opt| CellValue::Text(opt.clone()))
    }

    fn allows_key_entry(&self) -> bool {
        false
    }
}

type CopyFn = Rc<dyn Fn(&CellValue) -> String>;
type PasteFn = Rc<dyn Fn(&str) -> Option<CellValue>>;

/// Column assembled from optional closures; missing ones fall back to the
/// default text behavior.
#[derive(Clone, Default)]
pub struct CustomColumn {
    copy_value: Option<CopyFn>,
    paste_value: Option<PasteFn>,
}

impl CustomColumn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_value(mut self, f: impl Fn(&CellValue) -> String + 'static) -> Self {
        self.copy_value = Some(Rc::new(f));
        self
    }

    pub fn paste_value(mut self, f: impl Fn(&str) -> Option<CellValue> + 'static) -> Self {
        self.paste_value = Some(Rc::new(f));
        self
    }
}

impl ColumnBehavior for CustomColumn {
    fn serialize(&self, value: &CellValue) -> String {
        match &self.copy_value {
            Some(f) => f(value),
            None => value.to_string(),
        }
    }

    fn parse(&self, text: &str) -> Option<CellValue> {
        match &self.paste_value {
            Some(f) => f(text),
            None => Some(CellValue::Text(text.to_string())),
        }
    }
}

impl fmt::Debug for CustomColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomColumn")
            .field("copy_value", &self.copy_value.is_some())
            .field("paste_value", &self.paste_value.is_some())
            .finish()
    }
}

/// Value written into a cell when it is deleted.
#[derive(Clone)]
pub enum DeleteValue {
    Literal(CellValue),
    /// Evaluated on every delete.
    Thunk(Rc<dyn Fn() -> CellValue>),
}

impl DeleteValue {
    pub fn thunk(f: impl Fn() -> CellValue + 'static) -> Self {
        Self::Thunk(Rc::new(f))
    }

    pub fn resolve(&self) -> CellValue {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Thunk(f) => f(),
        }
    }
}

impl fmt::Debug for DeleteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Thunk(_) => f.write_str("Thunk"),
        }
    }
}

/// A grid column: identity, layout hints and behavior.
#[derive(Clone)]
pub struct GridColumn {
    pub accessor_key: String,
    pub header: String,
    /// Width hint in CSS pixels.
    pub size: Option<u32>,
    /// Renderer id the host maps to a concrete cell component.
    pub cell_renderer: Option<String>,
    behavior: Rc<dyn ColumnBehavior>,
    disabled: Option<bool>,
    disable_keys: Option<bool>,
    delete_value: Option<DeleteValue>,
}

impl GridColumn {
    pub fn new(
        accessor_key: impl Into<String>,
        header: impl Into<String>,
        behavior: impl ColumnBehavior + 'static,
    ) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            header: header.into(),
            size: None,
            cell_renderer: None,
            behavior: Rc::new(behavior),
            disabled: None,
            disable_keys: None,
            delete_value: None,
        }
    }

    pub fn text(accessor_key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(accessor_key, header, TextColumn)
    }

    pub fn number(accessor_key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(accessor_key, header, NumberColumn::default())
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.cell_renderer = Some(renderer.into());
        self
    }

    /// Read-only: skipped by paste and delete, still reachable by keyboard.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Refuse Enter / double-activation edits.
    pub fn disable_keys(mut self, disable_keys: bool) -> Self {
        self.disable_keys = Some(disable_keys);
        self
    }

    pub fn with_delete_value(mut self, value: DeleteValue) -> Self {
        self.delete_value = Some(value);
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or_else(|| self.behavior.is_disabled())
    }

    pub fn allows_key_entry(&self) -> bool {
        match self.disable_keys {
            Some(disable_keys) => !disable_keys,
            None => self.behavior.allows_key_entry(),
        }
    }

    /// Whether Enter, double-activation or typing may open an editor here.
    pub fn can_enter_edit(&self) -> bool {
        !self.is_disabled() && self.allows_key_entry()
    }

    pub fn serialize(&self, value: &CellValue) -> String {
        self.behavior.serialize(value)
    }

    pub fn parse(&self, text: &str) -> Option<CellValue> {
        self.behavior.parse(text)
    }

    pub fn display_text(&self, value: &CellValue) -> String {
        self.behavior.display_text(value)
    }

    pub fn edit_text(&self, value: &CellValue) -> String {
        self.behavior.edit_text(value)
    }

    pub fn delete_value(&self) -> CellValue {
        match &self.delete_value {
            Some(v) => v.resolve(),
            None => self.behavior.delete_value(),
        }
    }

    /// This column's value in `row` (null when absent).
    pub fn value<'a>(&self, row: &'a Row) -> &'a CellValue {
        row.get(&self.accessor_key).unwrap_or(&NULL_VALUE)
    }
}

impl fmt::Debug for GridColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridColumn")
            .field("accessor_key", &self.accessor_key)
            .field("header", &self.header)
            .field("size", &self.size)
            .field("cell_renderer", &self.cell_renderer)
            .field("disabled", &self.is_disabled())
            .field("allows_key_entry", &self.allows_key_entry())
            .finish_non_exhaustive()
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
    use std::cell::Cell;

    #[test]
    fn test_number_parse() {
        let col = NumberColumn::default();
        assert_eq!(col.parse(" 123.45 "), Some(CellValue::Number(123.45)));
        assert_eq!(col.parse(""), Some(CellValue::Null));
        assert_eq!(col.parse("abc"), None);
        assert_eq!(col.parse("inf"), None);
    }

    #[test]
    fn test_number_display_decimals() {
        let col = NumberColumn::with_decimals(2);
        assert_eq!(col.display_text(&CellValue::Number(12.3456)), "12.35");
        // Clipboard form stays exact
        assert_eq!(col.serialize(&CellValue::Number(12.3456)), "12.3456");
    }

    #[test]
    fn test_select_parse_matches_options() {
        let col = SelectColumn::new(["Open", "Closed", "CV"]);
        assert_eq!(col.parse("closed"), Some(CellValue::from("Closed")));
        assert_eq!(col.parse("Half"), None);
        assert!(!col.allows_key_entry());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let col = GridColumn::new("status", "Status", SelectColumn::new(["Open"]))
            .disable_keys(false)
            .disabled(true);
        assert!(col.allows_key_entry());
        assert!(col.is_disabled());
        assert!(!col.can_enter_edit());
    }

    #[test]
    fn test_delete_value_thunk_evaluated_each_time() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let col = GridColumn::number("demand", "Demand").with_delete_value(DeleteValue::thunk(
            move || {
                counter.set(counter.get() + 1);
                CellValue::Number(0.0)
            },
        ));
        assert_eq!(col.delete_value(), CellValue::Number(0.0));
        assert_eq!(col.delete_value(), CellValue::Number(0.0));
        assert_eq!(calls.get(), 2);
        assert_eq!(GridColumn::text("id", "ID").delete_value(), CellValue::Null);
    }

    #[test]
    fn test_custom_column_closures() {
        let col = GridColumn::new(
            "roughness",
            "Roughness",
            CustomColumn::new()
                .copy_value(|v| format!("~{v}"))
                .paste_value(|s| s.strip_prefix('~').map(CellValue::from)),
        );
        assert_eq!(col.serialize(&CellValue::from("x")), "~x");
        assert_eq!(col.parse("~y"), Some(CellValue::from("y")));
        assert_eq!(col.parse("y"), None);
    }
}
