//! netgrid - spreadsheet-style data grid engine for network model tables
//!
//! Selection, keyboard navigation, in-cell editing and clipboard exchange for
//! the junction / pipe / valve tables of a hydraulic modelling UI:
//! - Rectangular selection with anchor + active cell, row and column selection
//! - Excel-like keyboard navigation (arrows, Tab, Home/End, PageUp/PageDown)
//! - Quick and full edit modes with commit / cancel semantics
//! - Tab-separated copy, cut and paste through per-column capabilities
//!
//! The engine is host-agnostic: [`controller::GridController`] talks to the
//! embedding UI through [`controller::GridHost`]. In the browser,
//! [`bindings::WasmGrid`] provides that host.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGrid } from 'netgrid';
//! await init();
//! const grid = new WasmGrid(container, { lockRows: false }, rows => setRows(rows));
//! grid.setColumns([{ accessorKey: 'id', disabled: true }, { accessorKey: 'demand', kind: 'number' }]);
//! grid.setData(rows);
//! container.addEventListener('keydown', e => grid.onKeyDown(e));
//! ```

pub mod clipboard;
pub mod column;
pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod mutation;
pub mod navigation;
pub mod selection;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use bindings::WasmGrid;
pub use column::{ColumnBehavior, GridColumn};
pub use config::{ColumnConfig, GridOptions};
pub use controller::{GridController, GridHost};
pub use error::{GridError, Result};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
