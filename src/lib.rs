// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikescan
//!
//! Compiles windowed DBSCAN over binary event grids into spiking neural
//! network netlists, and turns the simulator's spike logs back into labeled
//! grids.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spikescan::prelude::*;
//!
//! let params = BuildParams::new(
//!     GridShape::new(1, 5, 5),
//!     Window::spatial(1, 5),
//!     "FLAT".parse()?,
//! );
//! let netlist = build(&params)?;
//! print!("{}", netlist);
//!
//! let grid = parse_grid("11100\n11100\n11100\n00000\n00001\n", false)?.grid;
//! let injection = encode(&grid, &params)?;
//! print!("{}", injection.render(InjectionFormat::Events)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crates
//! - [`grid`]: grids, grid files, the reference classifier, test data
//! - [`topology`]: construction variants and the netlist compiler
//! - [`codec`]: spike injection encoder and spike log decoder
//! - [`config`]: `spikescan.toml` loading
//! - [`observability`]: logging setup
//!
//! ## Feature Flags
//! - **`file-logging`**: per-run log files under `./logs`

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use spikescan_codec as codec;
pub use spikescan_config as config;
pub use spikescan_grid as grid;
pub use spikescan_observability as observability;
pub use spikescan_topology as topology;

pub mod tool;

/// Commonly used types and functions
pub mod prelude {
    pub use spikescan_codec::{
        decode, encode, CodecError, Decoded, DecodeIssue, Injection, InjectionFormat, Schedule,
    };
    pub use spikescan_grid::{
        dbscan, parse_grid, Grid, GridError, GridShape, Label, LabeledGrid, Region, Window,
    };
    pub use spikescan_topology::{
        build, BuildParams, Netlist, Role, Selector, TopologyBuilder, TopologyError,
    };
}
