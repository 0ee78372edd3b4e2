// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Netlist compiler

Builds the spiking network for one construction variant and writes its
netlist text.

Usage:
  spikescan-compile <ROWS> <COLS> <VARIANT> [EPSILON] [MIN_PTS] [--epsilon-t N]
                    [--tile ROW COL ROWS COLS] [--stats] [-o netlist.txt]

Example:
  spikescan-compile 32 32 SYSTOLIC_STREAM 2 6 --tile 0 0 8 8 --stats

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spikescan::grid::GridShape;
use spikescan::tool::{self, VariantArgs};
use spikescan::topology::TopologyBuilder;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "spikescan-compile",
    version,
    about = "Compile windowed DBSCAN into a spiking network netlist",
    after_help = spikescan::observability::debug_flags_help()
)]
struct Cli {
    /// Grid rows
    rows: usize,
    /// Grid columns
    cols: usize,

    #[command(flatten)]
    variant: VariantArgs,

    /// Print netlist statistics as JSON on stderr
    #[arg(long)]
    stats: bool,

    /// Write the netlist here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let (cli, debug_flags) = tool::parse_args::<Cli>();
    let config = cli.variant.load_config()?;
    let _log_guard = tool::init_logging(&debug_flags, &config)?;

    let params = cli
        .variant
        .params(GridShape::new(1, cli.rows, cli.cols), &config);
    let builder = TopologyBuilder::new(params)?;
    // Built in memory first; a failed compile leaves no partial netlist behind
    let netlist = builder.build()?;
    let text = netlist.render();

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote netlist");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    if cli.stats {
        let timing = builder.timing();
        let report = serde_json::json!({
            "variant": builder.params().selector.to_string(),
            "netlist": netlist.stats(),
            "core_latency": timing.core_latency,
            "border_latency": timing.border_latency,
            "frame_period": timing.frame_period,
            "tile_period": timing.tile_period,
            "tiles_per_frame": timing.tiles_per_frame(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
