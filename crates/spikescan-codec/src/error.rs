// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error and issue types for spike encoding and decoding

use spikescan_grid::GridError;
use spikescan_topology::TopologyError;
use std::fmt;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Fatal codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Non-fatal problem met while decoding a spike log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    /// Line that is not a Core/Border spike record
    UnknownLine(String),
    /// Spike counts cannot be placed in time outside single-frame flat runs
    AmbiguousCount(String),
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeIssue::UnknownLine(line) => write!(f, "Unknown line: {}", line),
            DecodeIssue::AmbiguousCount(line) => {
                write!(f, "Spike counts need a single-frame flat run: {}", line)
            }
        }
    }
}
