use thiserror::Error;

/// Failures on the write path of the persistent stores.
/// Read paths never fail; they fall back to defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode stored value: {0}")]
    Json(#[from] serde_json::Error),
}
