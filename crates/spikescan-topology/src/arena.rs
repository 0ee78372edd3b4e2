// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Neuron arena: id allocation plus a dense, bounds-checked position index.

Each role gets one layer covering the whole physical layout. A slot is
`None` when the role is absent at that position, and lookups outside the
layout also return `None`, so wiring can ask for any neighbour without
special-casing the edges.
*/

use crate::error::{TopologyError, TopologyResult};
use crate::neuron::{Neuron, NeuronId};
use crate::role::{NeuronName, Role};
use ahash::AHashMap;

#[derive(Debug, Clone)]
struct Layer {
    rows: usize,
    cols: usize,
    slots: Vec<Option<NeuronId>>,
}

impl Layer {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            slots: vec![None; rows * cols],
        }
    }

    fn index(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

/// Owns every declared neuron and the id counter
#[derive(Debug, Clone, Default)]
pub struct NeuronArena {
    next_id: u32,
    neurons: Vec<Neuron>,
    layers: AHashMap<Role, Layer>,
}

impl NeuronArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an all-absent layer for a role
    pub fn add_layer(&mut self, role: Role, rows: usize, cols: usize) {
        self.layers.insert(role, Layer::new(rows, cols));
    }

    /// Allocate the next id and record the neuron at its position
    pub fn declare(
        &mut self,
        role: Role,
        row: usize,
        col: usize,
        threshold: u32,
        is_input: bool,
        is_output: bool,
    ) -> TopologyResult<NeuronId> {
        let name = NeuronName::new(role, row, col);
        let layer = self
            .layers
            .get_mut(&role)
            .ok_or_else(|| TopologyError::Internal(format!("no layer for {}", name)))?;
        let idx = layer
            .index(row as i64, col as i64)
            .ok_or_else(|| TopologyError::Internal(format!("{} is outside its layer", name)))?;
        if layer.slots[idx].is_some() {
            return Err(TopologyError::Internal(format!("{} declared twice", name)));
        }

        let id = NeuronId(self.next_id);
        self.next_id += 1;
        layer.slots[idx] = Some(id);
        self.neurons.push(Neuron {
            id,
            role,
            row,
            col,
            threshold,
            is_input,
            is_output,
        });
        Ok(id)
    }

    /// Neuron at a position, `None` if absent or out of range
    pub fn get(&self, role: Role, row: i64, col: i64) -> Option<NeuronId> {
        let layer = self.layers.get(&role)?;
        layer.index(row, col).and_then(|idx| layer.slots[idx])
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn into_neurons(self) -> Vec<Neuron> {
        self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_and_absent_slots_stay_none() {
        let mut arena = NeuronArena::new();
        arena.add_layer(Role::Core, 2, 3);
        let a = arena.declare(Role::Core, 0, 1, 2, false, true).unwrap();
        let b = arena.declare(Role::Core, 1, 2, 2, false, true).unwrap();
        assert!(a < b);
        assert_eq!(arena.get(Role::Core, 0, 1), Some(a));
        assert_eq!(arena.get(Role::Core, 0, 0), None);
        assert_eq!(arena.get(Role::Core, -1, 1), None);
        assert_eq!(arena.get(Role::Core, 0, 3), None);
        assert_eq!(arena.get(Role::Input, 0, 1), None);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_double_declaration_is_internal_error() {
        let mut arena = NeuronArena::new();
        arena.add_layer(Role::Input, 1, 1);
        arena.declare(Role::Input, 0, 0, 1, true, false).unwrap();
        assert!(matches!(
            arena.declare(Role::Input, 0, 0, 1, true, false),
            Err(TopologyError::Internal(_))
        ));
        assert!(arena.declare(Role::Input, 1, 0, 1, true, false).is_err());
    }
}
