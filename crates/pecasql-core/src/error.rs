use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by a generation pass. The first one aborts the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input table is unreadable, empty, or has ragged rows.
    #[error("malformed input{}: {reason}", describe_location(.path, .line))]
    MalformedInput {
        path: Option<PathBuf>,
        line: Option<u64>,
        reason: String,
    },
    /// A field failed its normalization rule.
    #[error("invalid value in column {column} at row {row}: {reason}")]
    FieldFormat {
        row: usize,
        column: String,
        reason: String,
    },
    /// The generated text could not be persisted.
    #[error("failed to write {}: {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error category exposed to callers rendering structured errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    FieldFormat,
    IoWrite,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MalformedInput { .. } => ErrorKind::MalformedInput,
            PipelineError::FieldFormat { .. } => ErrorKind::FieldFormat,
            PipelineError::IoWrite { .. } => ErrorKind::IoWrite,
        }
    }

    /// Data row index (0-based) the error refers to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            PipelineError::FieldFormat { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Column name the error refers to, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            PipelineError::FieldFormat { column, .. } => Some(column),
            _ => None,
        }
    }

    pub(crate) fn malformed(
        path: Option<&Path>,
        line: Option<u64>,
        reason: impl Into<String>,
    ) -> Self {
        PipelineError::MalformedInput {
            path: path.map(|p| p.to_path_buf()),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn field(row: usize, column: &str, reason: impl Into<String>) -> Self {
        PipelineError::FieldFormat {
            row,
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

fn describe_location(path: &Option<PathBuf>, line: &Option<u64>) -> String {
    match (path, line) {
        (Some(path), Some(line)) => format!(" in {} at line {line}", path.display()),
        (Some(path), None) => format!(" in {}", path.display()),
        (None, Some(line)) => format!(" at line {line}"),
        (None, None) => String::new(),
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
