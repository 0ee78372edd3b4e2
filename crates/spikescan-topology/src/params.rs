// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Compile parameters and their validation.

Validation runs before any neuron is declared, so a rejected configuration
never yields a partial netlist.
*/

use crate::error::{TopologyError, TopologyResult};
use crate::selector::{Addressing, Selector};
use serde::{Deserialize, Serialize};
use spikescan_grid::{GridShape, Region, Window};

/// Base network template written on the `FJ` line when none is configured
pub const DEFAULT_BASE_NETWORK: &str = "empty.json";

/// Everything a compile needs. Fixed for the whole compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParams {
    /// Grid dimensions; the frame count does not affect the netlist
    pub shape: GridShape,
    pub window: Window,
    pub selector: Selector,
    /// Tile origin and extent. Partial variants use both; stream variants
    /// only use the extent. Ignored for full-frame variants.
    pub tile: Option<Region>,
    pub base_network: String,
}

impl BuildParams {
    pub fn new(shape: GridShape, window: Window, selector: Selector) -> Self {
        Self {
            shape,
            window,
            selector,
            tile: None,
            base_network: DEFAULT_BASE_NETWORK.to_string(),
        }
    }

    pub fn with_tile(mut self, tile: Region) -> Self {
        self.tile = Some(tile);
        self
    }

    pub fn with_base_network(mut self, base_network: impl Into<String>) -> Self {
        self.base_network = base_network.into();
        self
    }

    /// Spatial radius in cells
    pub fn epsilon(&self) -> usize {
        self.window.epsilon as usize
    }

    /// Number of memory layers (0 for 2D variants)
    pub fn memory_depth(&self) -> usize {
        if self.selector.is_spatiotemporal() {
            self.window.temporal_depth() as usize
        } else {
            0
        }
    }

    /// Tile used by tiled variants. Only valid after [`validate`](Self::validate).
    pub fn tile_region(&self) -> Region {
        match (self.selector.addressing, self.tile) {
            (Addressing::Full, _) | (_, None) => Region::whole(self.shape),
            (_, Some(tile)) => tile,
        }
    }

    /// Reject configurations the circuit cannot realize
    pub fn validate(&self) -> TopologyResult<()> {
        let window = &self.window;
        if self.shape.rows == 0 || self.shape.cols == 0 {
            return Err(TopologyError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.shape.rows, self.shape.cols
            )));
        }
        if window.min_pts <= 1 {
            return Err(TopologyError::Config(format!(
                "min_pts must be greater than 1, got {}",
                window.min_pts
            )));
        }
        if window.epsilon < 1 {
            return Err(TopologyError::Config("epsilon must be at least 1".to_string()));
        }

        match (self.selector.is_spatiotemporal(), window.epsilon_t) {
            (true, None) => {
                return Err(TopologyError::Config(format!(
                    "{} requires epsilon_t",
                    self.selector
                )))
            }
            (true, Some(0)) => {
                return Err(TopologyError::Config(
                    "epsilon_t must be at least 1".to_string(),
                ))
            }
            (false, Some(_)) => {
                return Err(TopologyError::Config(format!(
                    "epsilon_t only applies to 3D variants, not {}",
                    self.selector
                )))
            }
            _ => {}
        }

        if self.base_network.is_empty() || self.base_network.contains(char::is_whitespace) {
            return Err(TopologyError::Config(format!(
                "base network name {:?} must be a single non-empty token",
                self.base_network
            )));
        }

        self.validate_tile()
    }

    fn validate_tile(&self) -> TopologyResult<()> {
        let addressing = self.selector.addressing;
        if addressing == Addressing::Full {
            return Ok(());
        }
        let tile = self.tile.ok_or_else(|| {
            TopologyError::Config(format!("{} requires a tile shape", self.selector))
        })?;
        if tile.rows == 0 || tile.cols == 0 {
            return Err(TopologyError::Config(format!(
                "tile must be at least 1x1, got {}x{}",
                tile.rows, tile.cols
            )));
        }

        let (rows, cols) = (self.shape.rows, self.shape.cols);
        let fits = match addressing {
            Addressing::Partial => {
                tile.row.checked_add(tile.rows).is_some_and(|end| end <= rows)
                    && tile.col.checked_add(tile.cols).is_some_and(|end| end <= cols)
            }
            _ => tile.rows <= rows && tile.cols <= cols,
        };
        if !fits {
            return Err(TopologyError::Config(format!(
                "tile {}x{} at ({}, {}) does not fit in a {}x{} grid",
                tile.rows, tile.cols, tile.row, tile.col, rows, cols
            )));
        }
        Ok(())
    }
}
