use std::time::Duration;

use thiserror::Error;

/// Hard failures of the layout engine, raised before anything is placed.
/// Everything else is a `Diagnostic`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid layout config: {0}")]
    InvalidConfig(String),
}

/// Errors surfaced by the export seam around the engine.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Layout timed out after {0:?}")]
    Timeout(Duration),

    #[error("Layout worker failed: {0}")]
    Worker(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ExportError {
    /// Stable machine-readable code for logs and callers.
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Layout(LayoutError::InvalidGeometry(_)) => "INVALID_GEOMETRY",
            ExportError::Layout(LayoutError::InvalidConfig(_)) => "INVALID_CONFIG",
            ExportError::Timeout(_) => "LAYOUT_TIMEOUT",
            ExportError::Worker(_) => "LAYOUT_WORKER_ERROR",
            ExportError::Encoding(_) => "ENCODING_ERROR",
            ExportError::Storage(_) => "STORAGE_ERROR",
            ExportError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_converts_into_export_error() {
        let err: ExportError = LayoutError::InvalidGeometry("margin too large".into()).into();
        assert_eq!(err.code(), "INVALID_GEOMETRY");
        assert_eq!(
            err.to_string(),
            "Layout error: Invalid page geometry: margin too large"
        );
    }

    #[test]
    fn test_invalid_config_has_own_code() {
        let err: ExportError = LayoutError::InvalidConfig("block_spacing".into()).into();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_timeout_message_includes_duration() {
        let err = ExportError::Timeout(Duration::from_millis(250));
        assert_eq!(err.code(), "LAYOUT_TIMEOUT");
        assert!(err.to_string().contains("250ms"));
    }
}
