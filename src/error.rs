//! Error types for the command driver

use cellgraph_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running a command line
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid sheet id: {0}")]
    InvalidSheetId(String),

    #[error("Invalid row index: {0}")]
    InvalidRow(String),

    #[error("Invalid column {column}: {message}")]
    InvalidColumn { column: String, message: String },

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
