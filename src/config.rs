//! Host-supplied grid configuration.
//!
//! Both structs deserialize from camelCase JSON, which is what the UI shell
//! hands over (as a JSON string natively, as a JS object in the browser).

use serde::{Deserialize, Serialize};

use crate::column::{DeleteValue, GridColumn, NumberColumn, SelectColumn, TextColumn};
use crate::error::{GridError, Result};
use crate::types::CellValue;

/// Grid-wide behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Rows cannot be removed; deleting a full-row selection resets the cells
    /// instead.
    pub lock_rows: bool,
    /// Page size for PageUp/PageDown until the host reports its viewport.
    pub default_visible_rows: u32,
    /// Quick edits start from the cell's formatted value followed by the typed
    /// character. When off, the typed character replaces the value.
    pub quick_edit_seeds_value: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            lock_rows: false,
            default_visible_rows: 10,
            quick_edit_seeds_value: true,
        }
    }
}

impl GridOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Select,
}

/// Declarative description of a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub accessor_key: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub cell_renderer: Option<String>,
    /// Display precision for number columns.
    #[serde(default)]
    pub decimals: Option<usize>,
    /// Allowed values for select columns.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub disable_keys: Option<bool>,
    #[serde(default)]
    pub delete_value: Option<CellValue>,
}

impl ColumnConfig {
    pub fn into_column(self) -> Result<GridColumn> {
        if self.accessor_key.is_empty() {
            return Err(GridError::Config("column without accessorKey".into()));
        }
        if self.kind == ColumnKind::Select && self.options.is_empty() {
            return Err(GridError::Config(format!(
                "select column '{}' has no options",
                self.accessor_key
            )));
        }
        let header = self
            .header
            .unwrap_or_else(|| self.accessor_key.clone());
        let mut column = match self.kind {
            ColumnKind::Text => GridColumn::new(self.accessor_key, header, TextColumn),
            ColumnKind::Number => GridColumn::new(
                self.accessor_key,
                header,
                NumberColumn {
                    decimals: self.decimals,
                },
            ),
            ColumnKind::Select => {
                GridColumn::new(self.accessor_key, header, SelectColumn::new(self.options))
            }
        };
        column = column.disabled(self.disabled);
        if let Some(disable_keys) = self.disable_keys {
            column = column.disable_keys(disable_keys);
        }
        if let Some(size) = self.size {
            column = column.with_size(size);
        }
        if let Some(renderer) = self.cell_renderer {
            column = column.with_renderer(renderer);
        }
        if let Some(value) = self.delete_value {
            column = column.with_delete_value(DeleteValue::Literal(value));
        }
        Ok(column)
    }
}

/// Build columns from a JSON array of [`ColumnConfig`], rejecting duplicate
/// accessor keys.
pub fn columns_from_configs(configs: Vec<ColumnConfig>) -> Result<Vec<GridColumn>> {
    let mut seen = std::collections::HashSet::new();
    configs
        .into_iter()
        .map(|config| {
            if !seen.insert(config.accessor_key.clone()) {
                return Err(GridError::Config(format!(
                    "duplicate accessorKey '{}'",
                    config.accessor_key
                )));
            }
            config.into_column()
        })
        .collect()
}

pub fn columns_from_json(json: &str) -> Result<Vec<GridColumn>> {
    let configs: Vec<ColumnConfig> = serde_json::from_str(json)?;
    columns_from_configs(configs)
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

    #[test]
    fn test_options_defaults() {
        let opts = GridOptions::from_json("{}").unwrap();
        assert_eq!(opts, GridOptions::default());
        let opts = GridOptions::from_json(r#"{"lockRows":true}"#).unwrap();
        assert!(opts.lock_rows);
        assert_eq!(opts.default_visible_rows, 10);
    }

    #[test]
    fn test_columns_from_json() {
        let cols = columns_from_json(
            r#"[
                {"accessorKey":"id","header":"ID","disabled":true},
                {"accessorKey":"elevation","kind":"number","decimals":2,"size":90,"deleteValue":0},
                {"accessorKey":"status","kind":"select","options":["Open","Closed"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(cols.len(), 3);
        assert!(cols[0].is_disabled());
        assert_eq!(cols[1].size, Some(90));
        assert_eq!(cols[1].delete_value(), CellValue::Number(0.0));
        assert_eq!(cols[1].display_text(&CellValue::Number(1.0)), "1.00");
        assert_eq!(cols[2].header, "status");
        assert!(!cols[2].allows_key_entry());
    }

    #[test]
    fn test_invalid_columns() {
        assert!(matches!(
            columns_from_json(r#"[{"accessorKey":"a"},{"accessorKey":"a"}]"#),
            Err(GridError::Config(_))
        ));
        assert!(matches!(
            columns_from_json(r#"[{"accessorKey":"s","kind":"select"}]"#),
            Err(GridError::Config(_))
        ));
        assert!(matches!(
            columns_from_json("not json"),
            Err(GridError::Json(_))
        ));
    }
}
