//! Error handling for TouchMCU
//!
//! Every failure is fatal to the build: errors propagate to the binary,
//! which exits non-zero without writing any output.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for TouchMCU operations
pub type Result<T> = std::result::Result<T, TouchMcuError>;

/// Broad failure classes used when reporting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid overlay or script resource
    Configuration,
    /// Broken tree invariants (names, frames, properties)
    Structural,
    /// Resource read/write failures
    Io,
}

/// Main error type for TouchMCU operations
#[derive(Error, Debug)]
pub enum TouchMcuError {
    // Configuration Errors
    #[error("Overlay not found: {name} (searched {searched})")]
    OverlayNotFound { name: String, searched: PathBuf },

    #[error("Invalid overlay '{name}': {reason}")]
    OverlaySchema { name: String, reason: String },

    #[error("Missing overlay key: {key}")]
    MissingKey { key: String },

    #[error("Script not found: {name}")]
    ScriptNotFound { name: String },

    #[error("No factory registered for '{kind}'")]
    UnknownFactory { kind: String },

    #[error("Unknown color id: {id}")]
    UnknownColor { id: String },

    // Structural Errors
    #[error("Duplicate node name '{name}' under '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("Invalid frame dimensions: w={w}, h={h}")]
    InvalidFrame { w: f32, h: f32 },

    #[error("Node '{path}' ({kind}) is missing required property '{key}'")]
    MissingProperty {
        path: String,
        kind: String,
        key: String,
    },

    #[error("Invalid property '{key}' on '{path}': {reason}")]
    InvalidProperty {
        path: String,
        key: String,
        reason: String,
    },

    #[error("Node '{path}' cannot hold a {kind}")]
    InvalidParent { path: String, kind: String },

    #[error("Unknown node id: {id}")]
    UnknownNode { id: usize },

    #[error("Document has already been saved and can no longer change")]
    DocumentSealed,

    // I/O Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: String },
}

impl TouchMcuError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TouchMcuError::OverlayNotFound { .. } => "OVERLAY_NOT_FOUND",
            TouchMcuError::OverlaySchema { .. } => "OVERLAY_SCHEMA",
            TouchMcuError::MissingKey { .. } => "MISSING_KEY",
            TouchMcuError::ScriptNotFound { .. } => "SCRIPT_NOT_FOUND",
            TouchMcuError::UnknownFactory { .. } => "UNKNOWN_FACTORY",
            TouchMcuError::UnknownColor { .. } => "UNKNOWN_COLOR",
            TouchMcuError::DuplicateName { .. } => "DUPLICATE_NAME",
            TouchMcuError::InvalidFrame { .. } => "INVALID_FRAME",
            TouchMcuError::MissingProperty { .. } => "MISSING_PROPERTY",
            TouchMcuError::InvalidProperty { .. } => "INVALID_PROPERTY",
            TouchMcuError::InvalidParent { .. } => "INVALID_PARENT",
            TouchMcuError::UnknownNode { .. } => "UNKNOWN_NODE",
            TouchMcuError::DocumentSealed => "DOCUMENT_SEALED",
            TouchMcuError::FileReadError { .. } => "FILE_READ_ERROR",
            TouchMcuError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            TouchMcuError::Io(_) => "IO_ERROR",
            TouchMcuError::Json(_) => "JSON_ERROR",
            TouchMcuError::Xml(_) => "XML_ERROR",
            TouchMcuError::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
        }
    }

    /// Which class of failure this is
    pub fn category(&self) -> ErrorCategory {
        match self {
            TouchMcuError::OverlayNotFound { .. }
            | TouchMcuError::OverlaySchema { .. }
            | TouchMcuError::MissingKey { .. }
            | TouchMcuError::ScriptNotFound { .. }
            | TouchMcuError::UnknownFactory { .. }
            | TouchMcuError::UnknownColor { .. } => ErrorCategory::Configuration,
            TouchMcuError::DuplicateName { .. }
            | TouchMcuError::InvalidFrame { .. }
            | TouchMcuError::MissingProperty { .. }
            | TouchMcuError::InvalidProperty { .. }
            | TouchMcuError::InvalidParent { .. }
            | TouchMcuError::UnknownNode { .. }
            | TouchMcuError::DocumentSealed => ErrorCategory::Structural,
            TouchMcuError::FileReadError { .. }
            | TouchMcuError::FileWriteError { .. }
            | TouchMcuError::Io(_)
            | TouchMcuError::Json(_)
            | TouchMcuError::Xml(_)
            | TouchMcuError::MalformedDocument { .. } => ErrorCategory::Io,
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            TouchMcuError::OverlayNotFound { .. } => {
                Some("Run with --list to see the available overlays.")
            }
            TouchMcuError::OverlaySchema { .. } | TouchMcuError::MissingKey { .. } => {
                Some("Compare the overlay against overlays/default.json.")
            }
            TouchMcuError::ScriptNotFound { .. } => {
                Some("Check --scripts-dir or drop the override to use the bundled scripts.")
            }
            TouchMcuError::FileWriteError { .. } => {
                Some("Check that the output directory exists and is writable.")
            }
            _ => None,
        }
    }
}
