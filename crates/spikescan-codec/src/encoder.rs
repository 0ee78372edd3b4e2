// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Input encoder: occupancy grid → spike injections.

Each (frame, tile) pair owns a disjoint block of simulated time starting at
`frame * frame_period + tile * tile_period`. Flat layouts inject every
occupied physical cell at the block start. Systolic layouts sweep the tile's
raster one column per step into the lane-0 input of each physical row.

Cells of a haloed tile that fall outside the grid are injected as 0.
*/

use crate::error::{CodecError, CodecResult};
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use spikescan_grid::Grid;
use spikescan_topology::BuildParams;
use std::str::FromStr;
use tracing::debug;

/// Textual form of the injection list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjectionFormat {
    /// `AS <input> <time> 1` per spike
    Events,
    /// `ASR <row> <bits>` per systolic input row
    Raster,
}

impl FromStr for InjectionFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "events" | "flat" => Ok(InjectionFormat::Events),
            "raster" => Ok(InjectionFormat::Raster),
            other => Err(CodecError::Config(format!(
                "unknown injection format {:?} (expected events or raster)",
                other
            ))),
        }
    }
}

/// One spike applied to an input port
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpikeEvent {
    pub time: usize,
    pub input: usize,
}

/// Every spike to inject for a grid sequence, ordered by (time, input)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub events: Vec<SpikeEvent>,
    pub input_count: usize,
    /// Steps covered by the injected frames (`frames * frame_period`)
    pub span: usize,
    /// Steps to simulate so the last frame's outputs have fired
    pub run_time: usize,
    systolic: bool,
}

impl Injection {
    /// Render in the requested format. Raster form only exists for systolic layouts.
    pub fn render(&self, format: InjectionFormat) -> CodecResult<String> {
        let mut out = String::new();
        match format {
            InjectionFormat::Events => {
                for ev in &self.events {
                    out.push_str(&format!("AS {} {} 1\n", ev.input, ev.time));
                }
            }
            InjectionFormat::Raster => {
                if !self.systolic {
                    return Err(CodecError::Config(
                        "raster injection needs a systolic layout".to_string(),
                    ));
                }
                let mut rows = vec![vec![b'0'; self.span]; self.input_count];
                for ev in &self.events {
                    rows[ev.input][ev.time] = b'1';
                }
                for (row, bits) in rows.iter().enumerate() {
                    out.push_str(&format!("ASR {} {}\n", row, String::from_utf8_lossy(bits)));
                }
            }
        }
        Ok(out)
    }
}

/// Encode `grid` for the network compiled from `params`
pub fn encode(grid: &Grid, params: &BuildParams) -> CodecResult<Injection> {
    let schedule = Schedule::new(params)?;
    schedule.check_shape(grid.shape())?;

    let geometry = &schedule.geometry;
    let timing = &schedule.timing;
    let mut events = Vec::new();

    for frame in 0..grid.frames() {
        for tile_row in 0..timing.row_tiles {
            for tile_col in 0..timing.col_tiles {
                let start = timing.tile_start(frame, tile_row, tile_col);
                let (origin_row, origin_col) = schedule.tile_origin(tile_row, tile_col);
                let f = frame as i64;

                for pr in 0..geometry.rows {
                    let gr = origin_row + pr as i64;
                    if geometry.is_systolic() {
                        for j in 0..schedule.raster_width() {
                            if grid.get_signed(f, gr, origin_col + j as i64) {
                                events.push(SpikeEvent {
                                    time: start + j,
                                    input: geometry.input_index(pr, 0),
                                });
                            }
                        }
                    } else {
                        for pc in 0..geometry.cols {
                            if grid.get_signed(f, gr, origin_col + pc as i64) {
                                events.push(SpikeEvent {
                                    time: start,
                                    input: geometry.input_index(pr, pc),
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    events.sort_unstable();
    debug!(
        frames = grid.frames(),
        spikes = events.len(),
        frame_period = timing.frame_period,
        "Encoded grid"
    );

    Ok(Injection {
        events,
        input_count: geometry.input_count(),
        span: grid.frames() * timing.frame_period,
        run_time: timing.run_time(grid.frames()),
        systolic: geometry.is_systolic(),
    })
}
