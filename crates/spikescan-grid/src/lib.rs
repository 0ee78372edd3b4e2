// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Spikescan Grid

Data model shared by the netlist compiler and the spike codec:
- Binary occupancy grids (single frame or a frame sequence)
- DBSCAN window parameters (`epsilon`, optional `epsilon_t`, `min_pts`)
- Labeled output grids (`.`, `C`, `B`)
- Grid text parsing with shape-error reporting
- Brute-force windowed DBSCAN used as the reference classifier
- Test data: seeded random grids and event-camera CSV binarisation

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod events;
pub mod generate;
pub mod oracle;
pub mod parse;
pub mod types;

pub use error::{GridError, GridResult, ShapeIssue};
pub use events::frames_from_events;
pub use generate::random_grid;
pub use oracle::dbscan;
pub use parse::{parse_grid, ParsedGrid};
pub use types::{Grid, GridShape, Label, LabeledGrid, Region, Window};
