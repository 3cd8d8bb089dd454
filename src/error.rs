//! Structured error types for netgrid.
//!
//! Grid interactions never surface errors to the host: geometry problems are
//! no-ops and parse failures keep the previous value. The errors here cover the
//! boundaries that can genuinely fail (clipboard access, host configuration).

/// All errors that can occur at the netgrid boundaries.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Clipboard read/write failed (permission denied, API unavailable, ...).
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    /// Host supplied an unusable grid or column configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
