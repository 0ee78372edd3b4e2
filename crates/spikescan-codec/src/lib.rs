// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Spikescan Codec

The two ends of a simulation run:
- `encoder`: occupancy grid → `AS`/`ASR` spike injections for a compiled network
- `decoder`: simulator spike log → labeled grid

Both derive their time arithmetic from the topology crate's latency model
through [`Schedule`], so a compiled network, its injections and its decoder
always agree.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod schedule;

pub use decoder::{decode, parse_log_line, Decoded, LogLine, SpikeRecord};
pub use encoder::{encode, Injection, InjectionFormat, SpikeEvent};
pub use error::{CodecError, CodecResult, DecodeIssue};
pub use schedule::Schedule;
