// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Event camera binariser

Bins `time,x,y,polarity` CSV events into fixed-length time segments and
prints one occupancy frame per segment. Segments without events still
produce an empty frame, so frame index stays proportional to time.

Usage:
  spikescan-ebc-frames <EVENTS> <ROWS> <COLS> <SEGMENT_LEN>

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spikescan::grid::frames_from_events;
use spikescan::tool::{self, ConfigArgs};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "spikescan-ebc-frames",
    version,
    about = "Bin event camera CSV into occupancy frames",
    after_help = spikescan::observability::debug_flags_help()
)]
struct Cli {
    /// Event CSV (`-` for stdin)
    events: PathBuf,
    /// Sensor rows (y range)
    rows: usize,
    /// Sensor columns (x range)
    cols: usize,
    /// Time units per frame
    #[arg(allow_negative_numbers = true)]
    segment_len: i64,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    let (cli, debug_flags) = tool::parse_args::<Cli>();
    let config = cli.config.load(&HashMap::new())?;
    let _log_guard = tool::init_logging(&debug_flags, &config)?;

    let csv = tool::read_input(&cli.events)?;
    let grid = frames_from_events(&csv, cli.rows, cli.cols, cli.segment_len)?;
    info!(frames = grid.frames(), "Binarised events");
    print!("{}", grid.to_text());
    Ok(())
}
