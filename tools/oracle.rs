// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Reference classifier

Brute-force windowed DBSCAN over a grid file. Its output is what a decoded
network run must reproduce.

Usage:
  spikescan-oracle <GRID> [EPSILON] [MIN_PTS] [--epsilon-t N] [--window ROW COL ROWS COLS]

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spikescan::grid::{dbscan, parse_grid, Label, Region};
use spikescan::tool::{self, ConfigArgs, WindowArgs};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "spikescan-oracle",
    version,
    about = "Label a grid with brute-force windowed DBSCAN",
    after_help = spikescan::observability::debug_flags_help()
)]
struct Cli {
    /// Grid file (`-` for stdin)
    grid: PathBuf,

    #[command(flatten)]
    window: WindowArgs,

    /// Only print this part of each frame; cells beyond the grid print `.`
    #[arg(long = "window", num_args = 4, value_names = ["ROW", "COL", "ROWS", "COLS"])]
    window_region: Option<Vec<usize>>,

    /// Treat ragged rows or frames as fatal
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    let (cli, debug_flags) = tool::parse_args::<Cli>();
    let mut overrides = cli.window.overrides();
    if cli.strict {
        overrides.insert("strict_shape".to_string(), "true".to_string());
    }
    let config = cli.config.load(&overrides)?;
    let _log_guard = tool::init_logging(&debug_flags, &config)?;

    let text = tool::read_input(&cli.grid)?;
    let parsed = parse_grid(&text, config.encoder.strict_shape)?;
    let window = cli.window.window(&config, false);
    let region = match cli.window_region.as_deref() {
        Some(&[row, col, rows, cols]) => Some(Region::new(row, col, rows, cols)),
        _ => None,
    };

    let labels = dbscan(&parsed.grid, &window, region);
    info!(
        cores = labels.count(Label::Core),
        borders = labels.count(Label::Border),
        "Classified grid"
    );
    print!("{}", labels.render());
    Ok(())
}
