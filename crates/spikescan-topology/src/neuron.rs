// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron and synapse records

use crate::role::{NeuronName, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Neuron ID (unique within one netlist, allocated in declaration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NeuronId(pub u32);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A declared neuron. Immutable once the builder has created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neuron {
    pub id: NeuronId,
    pub role: Role,
    /// Physical row
    pub row: usize,
    /// Physical column (flat) or lane (systolic)
    pub col: usize,
    pub threshold: u32,
    pub is_input: bool,
    pub is_output: bool,
}

impl Neuron {
    pub fn name(&self) -> NeuronName {
        NeuronName::new(self.role, self.row, self.col)
    }
}

/// Directed, delayed, ±1-weighted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synapse {
    pub from: NeuronId,
    pub to: NeuronId,
    pub delay: u32,
    pub weight: i8,
}
