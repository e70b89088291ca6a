//! Error types for the diagnostic harness
//!
//! Per-check failures never surface as `Error` to the user: the engine
//! downgrades them to failed results. Only run-level faults (the renderer
//! could not be started or the document could not be loaded) reach `main`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Renderer Errors ===
    #[error("Render bridge '{name}' not found on PATH. Set [renderer] command or snapshot in the config file")]
    RendererNotFound { name: String },

    #[error("Render bridge failed to start: {0}")]
    RendererStartFailed(String),

    #[error("Render bridge exited unexpectedly")]
    RendererCrashed,

    #[error("Render protocol error: {0}")]
    RendererProtocol(String),

    #[error("Render request '{command}' failed: {message}")]
    RendererRequestFailed { command: String, message: String },

    #[error("Render request '{command}' timed out after {secs} seconds")]
    RendererTimeout { command: String, secs: u64 },

    #[error("Failed to load document '{path}': {reason}")]
    DocumentLoad { path: String, reason: String },

    #[error("Unknown element handle {0}")]
    UnknownElement(String),

    #[error("Computed style has no value for '{0}'")]
    MissingProperty(String),

    // === Value Parsing Errors ===
    #[error("Cannot parse colour value '{0}'")]
    ColorParse(String),

    #[error("Cannot parse snapshot '{path}': {reason}")]
    SnapshotParse { path: String, reason: String },

    #[error("Cannot parse manifest '{path}': {reason}")]
    ManifestParse { path: String, reason: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a render request failed error
    pub fn request_failed(command: &str, message: &str) -> Self {
        Self::RendererRequestFailed {
            command: command.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a document load error
    pub fn document_load(path: &str, reason: impl Into<String>) -> Self {
        Self::DocumentLoad {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a manifest parse error
    pub fn manifest_parse(path: &str, reason: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
