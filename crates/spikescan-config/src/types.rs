// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! These structs map to sections in `spikescan.toml`. Every section and
//! field is optional in the file; missing values take the defaults below.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikescanConfig {
    pub window: WindowConfig,
    pub netlist: NetlistConfig,
    pub encoder: EncoderConfig,
    pub logging: LoggingConfig,
}

/// Default DBSCAN window, used when a tool is not given explicit values
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub epsilon: u32,
    /// Only used by 3D variants
    pub epsilon_t: u32,
    pub min_pts: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            epsilon: 1,
            epsilon_t: 1,
            min_pts: 4,
        }
    }
}

/// Netlist output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetlistConfig {
    /// Base network template named on the `FJ` line
    pub base_network: String,
}

impl Default for NetlistConfig {
    fn default() -> Self {
        Self {
            base_network: "empty.json".to_string(),
        }
    }
}

/// Spike encoder settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Treat ragged grid rows/frames as fatal instead of repairing them
    pub strict_shape: bool,
    /// `events` (`AS` lines), `flat` (alias of events) or `raster` (`ASR` lines)
    pub format: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            strict_shape: false,
            format: "events".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
