// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Spike log decoder

Turns a simulator spike log back into labeled grids (`C` core, `B` border,
`.` noise). Lines that are not Core/Border spike records are echoed to
stderr and skipped.

Usage:
  spikescan-decode <LOG> <ROWS> <COLS> <VARIANT> [EPSILON] [MIN_PTS] [--epsilon-t N]
                   [--tile ROW COL ROWS COLS] [--frames N]

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spikescan::codec::decode;
use spikescan::grid::GridShape;
use spikescan::tool::{self, VariantArgs};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "spikescan-decode",
    version,
    about = "Decode a spike log into labeled grids",
    after_help = spikescan::observability::debug_flags_help()
)]
struct Cli {
    /// Spike log (`-` for stdin)
    log: PathBuf,
    /// Grid rows
    rows: usize,
    /// Grid columns
    cols: usize,

    #[command(flatten)]
    variant: VariantArgs,

    /// Frames that were injected
    #[arg(long, default_value_t = 1)]
    frames: usize,
}

fn main() -> Result<()> {
    let (cli, debug_flags) = tool::parse_args::<Cli>();
    let config = cli.variant.load_config()?;
    let _log_guard = tool::init_logging(&debug_flags, &config)?;

    let params = cli
        .variant
        .params(GridShape::new(cli.frames, cli.rows, cli.cols), &config);
    let log = tool::read_input(&cli.log)?;
    let decoded = decode(&log, &params, cli.frames)?;

    for issue in &decoded.issues {
        eprintln!("{}", issue);
    }
    info!(issues = decoded.issues.len(), "Decoded spike log");
    print!("{}", decoded.labels.render());
    Ok(())
}
