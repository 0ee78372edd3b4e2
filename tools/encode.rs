// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Spike injection encoder

Reads a grid file and prints the spike injections for the network compiled
with the same variant and window.

Usage:
  spikescan-encode <GRID> <VARIANT> [EPSILON] [MIN_PTS] [--epsilon-t N]
                   [--tile ROW COL ROWS COLS] [--format events|raster] [--strict]

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spikescan::codec::{encode, InjectionFormat};
use spikescan::grid::parse_grid;
use spikescan::tool::{self, VariantArgs};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "spikescan-encode",
    version,
    about = "Turn a grid file into spike injections",
    after_help = spikescan::observability::debug_flags_help()
)]
struct Cli {
    /// Grid file (`-` for stdin)
    grid: PathBuf,

    #[command(flatten)]
    variant: VariantArgs,

    /// events (AS lines) or raster (ASR lines, systolic only) [default: from config]
    #[arg(long)]
    format: Option<String>,

    /// Treat ragged rows or frames as fatal
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let (cli, debug_flags) = tool::parse_args::<Cli>();
    let mut overrides = cli.variant.window.overrides();
    if let Some(format) = &cli.format {
        overrides.insert("format".to_string(), format.clone());
    }
    if cli.strict {
        overrides.insert("strict_shape".to_string(), "true".to_string());
    }
    if let Some(base) = &cli.variant.base_network {
        overrides.insert("base_network".to_string(), base.clone());
    }
    let config = cli.variant.config.load(&overrides)?;
    let _log_guard = tool::init_logging(&debug_flags, &config)?;

    let format: InjectionFormat = config.encoder.format.parse()?;
    let text = tool::read_input(&cli.grid)?;
    // Shape issues are logged by the parser and tolerated unless strict
    let parsed = parse_grid(&text, config.encoder.strict_shape)?;

    let params = cli.variant.params(parsed.grid.shape(), &config);
    let injection = encode(&parsed.grid, &params)?;
    info!(
        events = injection.events.len(),
        inputs = injection.input_count,
        run_time = injection.run_time,
        "Encoded grid"
    );
    print!("{}", injection.render(format)?);
    Ok(())
}
