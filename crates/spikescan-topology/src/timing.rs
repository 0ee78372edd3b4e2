// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Pipeline latency and time-multiplexing model.

The netlist builder takes its memory-chain delay from here, and the codec
takes its injection offsets and decode arithmetic from here, so the two
sides can never drift apart.

Simulated time is laid out as

```text
t = frame * frame_period + tile * tile_period + offset + latency(role)
```

where `tile = tile_row * col_tiles + tile_col` and `offset` is the raster
column for systolic layouts (always 0 for flat layouts).

| variant            | core   | border | frame period        | tile period |
|--------------------|--------|--------|---------------------|-------------|
| flat full/partial  | 2      | 4      | 1                   | 1           |
| flat stream        | 2      | 4      | row_tiles*col_tiles | 1           |
| systolic full      | e+2    | 2e+4   | C+2e+4              | frame       |
| systolic partial   | 3e+2   | 4e+4   | Q+4e+4              | frame       |
| systolic stream    | 3e+2   | 4e+4   | row_tiles*(C+4e)    | C+4e        |

Systolic latencies include the lane depth, and tiled systolic latencies also
absorb the 2e halo so that `offset` is the column inside the output area.
*/

use crate::params::BuildParams;
use crate::role::Role;
use crate::selector::{Addressing, Layout};
use serde::{Deserialize, Serialize};

/// Circuit depth from input spike to Core firing
pub const CORE_CIRCUIT_LATENCY: usize = 2;
/// Circuit depth from input spike to Border firing
pub const BORDER_CIRCUIT_LATENCY: usize = 4;

/// Where a canonical time lands in the multiplexing schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub frame: usize,
    pub tile_row: usize,
    pub tile_col: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub core_latency: usize,
    pub border_latency: usize,
    /// Steps between consecutive frames; also the memory-chain delay
    pub frame_period: usize,
    /// Steps between consecutive tiles of one frame
    pub tile_period: usize,
    pub row_tiles: usize,
    pub col_tiles: usize,
}

impl Timing {
    /// Derive the schedule for validated parameters
    pub fn new(params: &BuildParams) -> Self {
        let e = params.epsilon();
        let (rows, cols) = (params.shape.rows, params.shape.cols);
        let tile = params.tile_region();

        match (params.selector.layout, params.selector.addressing) {
            (Layout::Flat, Addressing::Full) | (Layout::Flat, Addressing::Partial) => Self {
                core_latency: CORE_CIRCUIT_LATENCY,
                border_latency: BORDER_CIRCUIT_LATENCY,
                frame_period: 1,
                tile_period: 1,
                row_tiles: 1,
                col_tiles: 1,
            },
            (Layout::Flat, Addressing::PartialStream) => {
                let row_tiles = rows.div_ceil(tile.rows);
                let col_tiles = cols.div_ceil(tile.cols);
                Self {
                    core_latency: CORE_CIRCUIT_LATENCY,
                    border_latency: BORDER_CIRCUIT_LATENCY,
                    frame_period: row_tiles * col_tiles,
                    tile_period: 1,
                    row_tiles,
                    col_tiles,
                }
            }
            (Layout::Systolic, Addressing::Full) => {
                let period = cols + 2 * e + BORDER_CIRCUIT_LATENCY;
                Self {
                    core_latency: e + CORE_CIRCUIT_LATENCY,
                    border_latency: 2 * e + BORDER_CIRCUIT_LATENCY,
                    frame_period: period,
                    tile_period: period,
                    row_tiles: 1,
                    col_tiles: 1,
                }
            }
            (Layout::Systolic, Addressing::Partial) => {
                let period = tile.cols + 4 * e + BORDER_CIRCUIT_LATENCY;
                Self {
                    core_latency: 3 * e + CORE_CIRCUIT_LATENCY,
                    border_latency: 4 * e + BORDER_CIRCUIT_LATENCY,
                    frame_period: period,
                    tile_period: period,
                    row_tiles: 1,
                    col_tiles: 1,
                }
            }
            (Layout::Systolic, Addressing::PartialStream) => {
                // Stripes span the full width, so only the tile height matters
                let row_tiles = rows.div_ceil(tile.rows);
                let stripe = cols + 4 * e;
                Self {
                    core_latency: 3 * e + CORE_CIRCUIT_LATENCY,
                    border_latency: 4 * e + BORDER_CIRCUIT_LATENCY,
                    frame_period: row_tiles * stripe,
                    tile_period: stripe,
                    row_tiles,
                    col_tiles: 1,
                }
            }
        }
    }

    pub fn tiles_per_frame(&self) -> usize {
        self.row_tiles * self.col_tiles
    }

    /// Latency of a labelling role, `None` for internal roles
    pub fn latency(&self, role: Role) -> Option<usize> {
        match role {
            Role::Core => Some(self.core_latency),
            Role::BorderOutput => Some(self.border_latency),
            _ => None,
        }
    }

    /// First injection step of a (frame, tile) pair
    pub fn tile_start(&self, frame: usize, tile_row: usize, tile_col: usize) -> usize {
        frame * self.frame_period + (tile_row * self.col_tiles + tile_col) * self.tile_period
    }

    /// Steps a simulator must run so every output of `frames` frames has fired
    pub fn run_time(&self, frames: usize) -> usize {
        frames * self.frame_period + self.border_latency + 1
    }

    /// Invert a spike time of a labelling role into its schedule slot.
    ///
    /// Returns `None` when the spike precedes the role's latency, which only
    /// happens for halo neurons outside the output area.
    pub fn locate(&self, time: usize, role: Role) -> Option<TimeSlot> {
        let canonical = time.checked_sub(self.latency(role)?)?;
        let frame = canonical / self.frame_period;
        let rem = canonical % self.frame_period;
        let tile = rem / self.tile_period;
        Some(TimeSlot {
            frame,
            tile_row: tile / self.col_tiles,
            tile_col: tile % self.col_tiles,
            offset: rem % self.tile_period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Dimensionality, Selector};
    use spikescan_grid::{GridShape, Region, Window};

    fn params(layout: Layout, addressing: Addressing) -> BuildParams {
        BuildParams::new(
            GridShape::new(2, 10, 12),
            Window::spatial(2, 3),
            Selector::new(layout, addressing, Dimensionality::Planar),
        )
        .with_tile(Region::new(0, 0, 4, 5))
    }

    #[test]
    fn test_flat_stream_period_is_tile_count() {
        let timing = Timing::new(&params(Layout::Flat, Addressing::PartialStream));
        assert_eq!((timing.row_tiles, timing.col_tiles), (3, 3));
        assert_eq!(timing.frame_period, 9);
        assert_eq!(timing.tile_start(1, 2, 1), 9 + 7);
    }

    #[test]
    fn test_systolic_periods() {
        let full = Timing::new(&params(Layout::Systolic, Addressing::Full));
        assert_eq!((full.core_latency, full.border_latency), (4, 8));
        assert_eq!(full.frame_period, 12 + 4 + 4);

        let partial = Timing::new(&params(Layout::Systolic, Addressing::Partial));
        assert_eq!((partial.core_latency, partial.border_latency), (8, 12));
        assert_eq!(partial.frame_period, 5 + 8 + 4);

        let stream = Timing::new(&params(Layout::Systolic, Addressing::PartialStream));
        assert_eq!(stream.tile_period, 20);
        assert_eq!(stream.frame_period, 3 * 20);
    }

    #[test]
    fn test_locate_inverts_tile_start() {
        let timing = Timing::new(&params(Layout::Flat, Addressing::PartialStream));
        let t = timing.tile_start(3, 1, 2) + timing.border_latency;
        assert_eq!(
            timing.locate(t, Role::BorderOutput),
            Some(TimeSlot {
                frame: 3,
                tile_row: 1,
                tile_col: 2,
                offset: 0
            })
        );
        assert_eq!(timing.locate(1, Role::Core), None);
        assert_eq!(timing.locate(10, Role::Count), None);
    }
}
