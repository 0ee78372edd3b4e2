// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Mapping between grid coordinates, physical neurons and simulated time.

Both the encoder and the decoder go through a [`Schedule`], which is derived
from the same [`Timing`] and [`Geometry`] the netlist builder used.
*/

use crate::error::{CodecError, CodecResult};
use spikescan_grid::GridShape;
use spikescan_topology::{Addressing, BuildParams, Geometry, Role, TimeSlot, Timing};

#[derive(Debug, Clone)]
pub struct Schedule {
    pub params: BuildParams,
    pub geometry: Geometry,
    pub timing: Timing,
}

impl Schedule {
    /// Validate `params` and derive the schedule
    pub fn new(params: &BuildParams) -> CodecResult<Self> {
        params.validate()?;
        Ok(Self {
            params: params.clone(),
            geometry: Geometry::new(params),
            timing: Timing::new(params),
        })
    }

    fn halo(&self) -> i64 {
        self.geometry.halo as i64
    }

    /// Grid coordinate of physical row 0 / column (or raster column) 0 of a tile
    pub fn tile_origin(&self, tile_row: usize, tile_col: usize) -> (i64, i64) {
        let tile = self.params.tile_region();
        let halo = self.halo();
        match self.params.selector.addressing {
            Addressing::Full => (0, 0),
            Addressing::Partial => (tile.row as i64 - halo, tile.col as i64 - halo),
            Addressing::PartialStream => {
                let row = (tile_row * tile.rows) as i64 - halo;
                let col = if self.geometry.is_systolic() {
                    -halo
                } else {
                    (tile_col * tile.cols) as i64 - halo
                };
                (row, col)
            }
        }
    }

    /// Raster columns swept per tile on systolic layouts
    pub fn raster_width(&self) -> usize {
        let e4 = 4 * self.geometry.epsilon;
        match self.params.selector.addressing {
            Addressing::Full => self.params.shape.cols,
            Addressing::Partial => self.params.tile_region().cols + e4,
            Addressing::PartialStream => self.params.shape.cols + e4,
        }
    }

    /// Shape of the decoded label grid: the tile for partial runs, else the frame
    pub fn output_shape(&self, frames: usize) -> GridShape {
        match self.params.selector.addressing {
            Addressing::Partial => {
                let tile = self.params.tile_region();
                GridShape::new(frames, tile.rows, tile.cols)
            }
            _ => GridShape::new(frames, self.params.shape.rows, self.params.shape.cols),
        }
    }

    /// Output cell of a labelling neuron's spike, `None` outside the output area
    pub fn output_cell(
        &self,
        role: Role,
        row: usize,
        col: usize,
        slot: &TimeSlot,
    ) -> Option<(usize, usize)> {
        if !self.geometry.is_output(role, row, col) {
            return None;
        }
        let tile = self.params.tile_region();
        let local_row = row - self.geometry.halo;
        let local_col = if self.geometry.is_systolic() {
            slot.offset
        } else {
            col - self.geometry.halo
        };
        let (out_row, out_col) = match self.params.selector.addressing {
            Addressing::Full | Addressing::Partial => (local_row, local_col),
            Addressing::PartialStream if self.geometry.is_systolic() => {
                (slot.tile_row * tile.rows + local_row, local_col)
            }
            Addressing::PartialStream => (
                slot.tile_row * tile.rows + local_row,
                slot.tile_col * tile.cols + local_col,
            ),
        };

        let shape = self.output_shape(1);
        (out_row < shape.rows && out_col < shape.cols).then_some((out_row, out_col))
    }

    /// Spike counts can only be placed for flat runs of exactly one tile and frame
    pub fn counts_decodable(&self, frames: usize) -> bool {
        !self.geometry.is_systolic() && frames == 1 && self.timing.tiles_per_frame() == 1
    }

    /// Confirm a grid matches the compiled dimensions
    pub fn check_shape(&self, shape: GridShape) -> CodecResult<()> {
        let expected = self.params.shape;
        if shape.rows != expected.rows || shape.cols != expected.cols {
            return Err(CodecError::Config(format!(
                "grid is {}x{} but the network was compiled for {}x{}",
                shape.rows, shape.cols, expected.rows, expected.cols
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikescan_grid::{Region, Window};

    fn schedule(token: &str) -> Schedule {
        let params = BuildParams::new(GridShape::new(1, 7, 9), Window::spatial(1, 3), token.parse().unwrap())
            .with_tile(Region::new(2, 3, 3, 4));
        Schedule::new(&params).unwrap()
    }

    #[test]
    fn test_tile_origins() {
        assert_eq!(schedule("FLAT").tile_origin(0, 0), (0, 0));
        assert_eq!(schedule("FLAT_PARTIAL").tile_origin(0, 0), (0, 1));
        assert_eq!(schedule("FLAT_STREAM").tile_origin(1, 2), (1, 6));
        assert_eq!(schedule("SYSTOLIC_STREAM").tile_origin(2, 0), (4, -2));
    }

    #[test]
    fn test_raster_widths() {
        assert_eq!(schedule("SYSTOLIC").raster_width(), 9);
        assert_eq!(schedule("SYSTOLIC_PARTIAL").raster_width(), 8);
        assert_eq!(schedule("SYSTOLIC_STREAM").raster_width(), 13);
    }

    #[test]
    fn test_output_cell_for_flat_stream_tile() {
        let s = schedule("FLAT_STREAM");
        let slot = TimeSlot {
            frame: 0,
            tile_row: 1,
            tile_col: 1,
            offset: 0,
        };
        // Physical (2, 2) is the tile's first output cell
        assert_eq!(s.output_cell(Role::Core, 2, 2, &slot), Some((3, 4)));
        // Halo cell is never reported
        assert_eq!(s.output_cell(Role::Core, 1, 2, &slot), None);
        // Last tile row spills beyond the 7-row grid
        let last = TimeSlot { tile_row: 2, ..slot };
        assert_eq!(s.output_cell(Role::Core, 4, 2, &last), None);
    }
}
