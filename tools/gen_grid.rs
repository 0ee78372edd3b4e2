// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Random grid generator

Prints a seeded random grid in grid file format. The same arguments always
produce the same grid.

Usage:
  spikescan-gen-grid <ROWS> <COLS> <DENSITY> [SEED] [--frames N]

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use anyhow::Result;
use clap::Parser;
use spikescan::grid::{random_grid, GridShape};
use spikescan::tool::{self, ConfigArgs};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "spikescan-gen-grid",
    version,
    about = "Generate a random occupancy grid",
    after_help = spikescan::observability::debug_flags_help()
)]
struct Cli {
    rows: usize,
    cols: usize,
    /// Probability that a cell is occupied, in [0, 1]
    density: f64,
    #[arg(default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    frames: usize,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    let (cli, debug_flags) = tool::parse_args::<Cli>();
    let config = cli.config.load(&HashMap::new())?;
    let _log_guard = tool::init_logging(&debug_flags, &config)?;

    let grid = random_grid(
        GridShape::new(cli.frames, cli.rows, cli.cols),
        cli.density,
        cli.seed,
    )?;
    info!(occupied = grid.occupied(), "Generated grid");
    print!("{}", grid.to_text());
    Ok(())
}
