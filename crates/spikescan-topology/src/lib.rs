// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Spikescan Topology

Compiles windowed DBSCAN into a spiking network netlist.

Every construction variant realizes the same logical circuit:

```text
I ──► C (≥ min_pts-1 neighbours) ──► Core (AND own input) ──► B (core neighbour) ──► Border
```

## Architecture

- `selector`: which of the twelve variants to build
- `params`: validated compile parameters
- `geometry`: per-variant layout as data (footprints, taps, thresholds)
- `timing`: the latency and period model shared with the codec
- `arena`: neuron id allocation and the absent-aware position index
- `builder` / `wiring`: one builder for all variants
- `netlist`: text form, statistics and consistency checks

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod arena;
pub mod builder;
pub mod error;
pub mod geometry;
pub mod netlist;
pub mod neuron;
pub mod params;
pub mod role;
pub mod selector;
pub mod timing;
mod wiring;

pub use arena::NeuronArena;
pub use builder::{build, TopologyBuilder};
pub use error::{TopologyError, TopologyResult};
pub use geometry::{Footprint, Geometry, Tap};
pub use netlist::{Netlist, NetlistStats};
pub use neuron::{Neuron, NeuronId, Synapse};
pub use params::{BuildParams, DEFAULT_BASE_NETWORK};
pub use role::{NeuronName, Role};
pub use selector::{Addressing, Dimensionality, Layout, Selector};
pub use timing::{TimeSlot, Timing};
