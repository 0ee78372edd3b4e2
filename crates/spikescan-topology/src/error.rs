// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for netlist construction

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while building a netlist
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Rejected parameters; raised before any neuron is declared
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown construction selector token
    #[error("Unknown construction variant: {0}")]
    UnknownSelector(String),

    /// The builder produced an inconsistent netlist
    #[error("Internal consistency error: {0}")]
    Internal(String),
}
