// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikescan-observability
//!
//! Logging setup shared by the spikescan tools, with per-crate debug flag
//! support.
//!
//! Console output always goes to stderr: the tools print netlists, spike
//! injections and labelled grids on stdout.
//!
//! ## Features
//! - `file-logging`: per-run log files under `./logs` (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Crate names accepted by `--debug-<crate>`
pub const KNOWN_CRATES: &[&str] = &[
    "spikescan",
    "spikescan-grid",
    "spikescan-topology",
    "spikescan-codec",
    "spikescan-config",
];
