//! Error types for Cellgraph core.

use cellgraph_engine::engine::EvalError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::sheet::SheetId;

/// Errors that can occur while operating on sheets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Sheet not found: {id}")]
    SheetNotFound { id: SheetId },

    #[error("Column {column} not found in sheet schema")]
    ColumnNotFound { column: String },

    #[error("{0}")]
    InvalidType(String),

    #[error("{0}")]
    CircularReference(String),
}

impl From<EvalError> for SheetError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::InvalidType { .. } | EvalError::TypeMismatch { .. } => {
                SheetError::InvalidType(err.to_string())
            }
            EvalError::CircularReference { .. } => SheetError::CircularReference(err.to_string()),
        }
    }
}

impl SheetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SheetError::SheetNotFound { .. } => ErrorKind::SheetNotFound,
            SheetError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            SheetError::InvalidType(_) => ErrorKind::InvalidType,
            SheetError::CircularReference(_) => ErrorKind::CircularReference,
        }
    }
}

/// Stable failure tags reported to callers.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ErrorKind {
    SheetNotFound,
    ColumnNotFound,
    InvalidType,
    CircularReference,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::SheetNotFound => "SHEET_NOT_FOUND",
            ErrorKind::ColumnNotFound => "COLUMN_NOT_FOUND",
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::CircularReference => "CIRCULAR_REFERENCE",
        }
    }

    /// Suggested HTTP status for a transport layer.
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::SheetNotFound | ErrorKind::ColumnNotFound => 404,
            ErrorKind::InvalidType | ErrorKind::CircularReference => 400,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error payload: `{"code": "INVALID_TYPE", "message": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl From<&SheetError> for ErrorResponse {
    fn from(err: &SheetError) -> Self {
        ErrorResponse {
            code: err.kind().code(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
