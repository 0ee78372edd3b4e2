// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Argument handling shared by the command-line tools.
//!
//! Every tool follows the same start-up order: strip `--debug-*` flags, parse
//! the rest with clap (usage errors exit with status 2), load and validate
//! `spikescan.toml` with the command line layered on top, then start logging.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser};
use spikescan_config::{load_config, load_config_or_default, validate_config, SpikescanConfig};
use spikescan_grid::{GridShape, Region, Window};
use spikescan_observability::{split_debug_args, CrateDebugFlags, LoggingGuard};
use spikescan_topology::{BuildParams, Selector};

/// Parse the process arguments, keeping debug flags aside
pub fn parse_args<P: Parser>() -> (P, CrateDebugFlags) {
    let (flags, rest) = split_debug_args(std::env::args());
    (P::parse_from(rest), flags)
}

/// Start logging at the configured level
pub fn init_logging(flags: &CrateDebugFlags, config: &SpikescanConfig) -> Result<LoggingGuard> {
    #[cfg(feature = "file-logging")]
    {
        spikescan_observability::init_logging_to_dir(flags, &config.logging.level, None, None)
    }
    #[cfg(not(feature = "file-logging"))]
    {
        spikescan_observability::init_logging(flags, &config.logging.level)
    }
}

/// Read a whole input file; `-` reads standard input
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Where to find `spikescan.toml`
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Configuration file [default: search for spikescan.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load and validate the configuration with `overrides` applied last
    pub fn load(&self, overrides: &HashMap<String, String>) -> Result<SpikescanConfig> {
        let config = match &self.config {
            Some(path) => load_config(Some(path), Some(overrides))?,
            None => load_config_or_default(Some(overrides))?,
        };
        validate_config(&config)?;
        Ok(config)
    }
}

/// DBSCAN window on the command line; unset values come from `[window]`
#[derive(Debug, Clone, Default, Args)]
pub struct WindowArgs {
    /// Spatial radius in cells
    pub epsilon: Option<u32>,
    /// Minimum neighbourhood count (cell included) for a core cell
    pub min_pts: Option<u32>,
    /// Temporal depth in frames (spatiotemporal variants)
    #[arg(long)]
    pub epsilon_t: Option<u32>,
}

impl WindowArgs {
    /// Values given on the command line, keyed for `apply_cli_overrides`
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(epsilon) = self.epsilon {
            map.insert("epsilon".to_string(), epsilon.to_string());
        }
        if let Some(min_pts) = self.min_pts {
            map.insert("min_pts".to_string(), min_pts.to_string());
        }
        if let Some(epsilon_t) = self.epsilon_t {
            map.insert("epsilon_t".to_string(), epsilon_t.to_string());
        }
        map
    }

    /// Resolved window. An explicit `--epsilon-t` always yields a
    /// spatiotemporal window, so a planar variant rejects it.
    pub fn window(&self, config: &SpikescanConfig, spatiotemporal: bool) -> Window {
        let w = &config.window;
        if spatiotemporal || self.epsilon_t.is_some() {
            Window::spatiotemporal(w.epsilon, w.epsilon_t, w.min_pts)
        } else {
            Window::spatial(w.epsilon, w.min_pts)
        }
    }
}

/// Construction variant plus everything a compile needs besides the grid size
#[derive(Debug, Clone, Args)]
pub struct VariantArgs {
    /// Construction variant, e.g. FLAT, SYSTOLIC_PARTIAL, 3D_SYSTOLIC_STREAM
    pub variant: Selector,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Tile origin and extent; stream variants only use the extent
    #[arg(long, num_args = 4, value_names = ["ROW", "COL", "ROWS", "COLS"])]
    pub tile: Option<Vec<usize>>,

    /// Base network named on the FJ line [default: from config]
    #[arg(long)]
    pub base_network: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl VariantArgs {
    pub fn load_config(&self) -> Result<SpikescanConfig> {
        let mut overrides = self.window.overrides();
        if let Some(base) = &self.base_network {
            overrides.insert("base_network".to_string(), base.clone());
        }
        self.config.load(&overrides)
    }

    pub fn tile_region(&self) -> Option<Region> {
        match self.tile.as_deref() {
            Some(&[row, col, rows, cols]) => Some(Region::new(row, col, rows, cols)),
            _ => None,
        }
    }

    /// Compile parameters for a grid of `shape`. Not yet validated.
    pub fn params(&self, shape: GridShape, config: &SpikescanConfig) -> BuildParams {
        let window = self
            .window
            .window(config, self.variant.is_spatiotemporal());
        let mut params = BuildParams::new(shape, window, self.variant)
            .with_base_network(config.netlist.base_network.clone());
        if let Some(tile) = self.tile_region() {
            params = params.with_tile(tile);
        }
        params
    }
}
