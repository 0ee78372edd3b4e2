// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for grid ingestion and generation

use std::fmt;

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// A non-rectangular row or frame found while ingesting a grid.
///
/// Reported and tolerated by default: the first row/frame sets the canonical size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeIssue {
    RaggedRow {
        frame: usize,
        row: usize,
        expected: usize,
        actual: usize,
    },
    RaggedFrame {
        frame: usize,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeIssue::RaggedRow {
                frame,
                row,
                expected,
                actual,
            } => write!(
                f,
                "frame {}: row {} has {} columns, expected {}",
                frame, row, actual, expected
            ),
            ShapeIssue::RaggedFrame {
                frame,
                expected,
                actual,
            } => write!(
                f,
                "frame {} has {} rows, expected {}",
                frame, actual, expected
            ),
        }
    }
}

/// Errors that can occur while reading or producing grids
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Non-zero/one character {found:?} at frame {frame} row {row} col {col}")]
    Parse {
        frame: usize,
        row: usize,
        col: usize,
        found: char,
    },

    #[error("Grid shape error: {0}")]
    Shape(ShapeIssue),

    #[error("Trouble parsing event line: {0}")]
    EventLine(String),

    #[error("Invalid grid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to read grid: {0}")]
    Io(#[from] std::io::Error),
}
