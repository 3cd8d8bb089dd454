//! Shared fixtures for controller integration tests.
//!
//! `RecordingHost` is an in-memory [`GridHost`] that records every callback
//! the controller makes, plus a junction table builder.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::Cell;
use std::rc::Rc;

use netgrid::column::DeleteValue;
use netgrid::types::{row_from, CellPosition, CellValue, Row, SelectionState};
use netgrid::{GridColumn, GridController, GridHost, GridOptions};

/// Pointer-up subscription; bumps the live counter while it exists.
pub struct ListenerGuard(Rc<Cell<i32>>);

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[derive(Default)]
pub struct RecordingHost {
    pub rows: Vec<Row>,
    pub replacements: Vec<Vec<Row>>,
    pub selections: Vec<SelectionState>,
    pub focus_calls: u32,
    pub blur_calls: u32,
    pub visible_rows: Option<u32>,
    pub live_listeners: Rc<Cell<i32>>,
    pub subscriptions: u32,
}

impl RecordingHost {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

impl GridHost for RecordingHost {
    type PointerUpGuard = ListenerGuard;

    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn replace_rows(&mut self, rows: Vec<Row>) {
        self.replacements.push(rows.clone());
        self.rows = rows;
    }

    fn create_row(&self) -> Row {
        row_from([("id", CellValue::from("new"))])
    }

    fn visible_row_count(&self) -> Option<u32> {
        self.visible_rows
    }

    fn focus_grid(&mut self) {
        self.focus_calls += 1;
    }

    fn blur_grid(&mut self) {
        self.blur_calls += 1;
    }

    fn subscribe_pointer_up(&mut self) -> ListenerGuard {
        self.subscriptions += 1;
        self.live_listeners.set(self.live_listeners.get() + 1);
        ListenerGuard(Rc::clone(&self.live_listeners))
    }

    fn selection_changed(&mut self, state: &SelectionState) {
        self.selections.push(*state);
    }
}

/// id (read-only), elevation (number, deletes to 0), demand (number), tag (text).
pub fn junction_columns() -> Vec<GridColumn> {
    vec![
        GridColumn::text("id", "ID").disabled(true),
        GridColumn::number("elevation", "Elevation")
            .with_delete_value(DeleteValue::Literal(CellValue::Number(0.0))),
        GridColumn::number("demand", "Demand"),
        GridColumn::text("tag", "Tag"),
    ]
}

pub fn junction_rows(count: u32) -> Vec<Row> {
    (0..count)
        .map(|i| {
            row_from([
                ("id", CellValue::from(format!("J{}", i + 1))),
                ("elevation", CellValue::Number(f64::from(i) * 10.0)),
                ("demand", CellValue::Number(f64::from(i) + 0.5)),
                ("tag", CellValue::from(format!("t{i}"))),
            ])
        })
        .collect()
}

pub fn grid(rows: u32) -> GridController<RecordingHost> {
    GridController::new(
        RecordingHost::with_rows(junction_rows(rows)),
        junction_columns(),
        GridOptions::default(),
    )
}

pub fn pos(col: u32, row: u32) -> CellPosition {
    CellPosition::new(col, row)
}

pub fn cell(g: &GridController<RecordingHost>, col: u32, row: u32) -> CellValue {
    let key = &g.columns()[col as usize].accessor_key;
    g.host().rows[row as usize]
        .get(key)
        .cloned()
        .unwrap_or(CellValue::Null)
}
