// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Topology builder.

One parameterized builder serves every construction variant. It validates
the parameters, declares neurons role by role (inputs first, so an input's
declaration index is its injection index), wires them, and checks the result
before handing out a [`Netlist`].

Declaration order: I, C, Core, B, Border, then Mem_I layers, then Mem_Core
layers. Flat roles are declared row-major, systolic roles lane-major.
*/

use crate::arena::NeuronArena;
use crate::error::TopologyResult;
use crate::geometry::Geometry;
use crate::netlist::Netlist;
use crate::params::BuildParams;
use crate::role::Role;
use crate::timing::Timing;
use crate::wiring::Wiring;
use tracing::{debug, info};

pub struct TopologyBuilder {
    params: BuildParams,
    geometry: Geometry,
    timing: Timing,
}

impl TopologyBuilder {
    /// Validate parameters and derive the layout. Nothing is declared yet.
    pub fn new(params: BuildParams) -> TopologyResult<Self> {
        params.validate()?;
        let geometry = Geometry::new(&params);
        let timing = Timing::new(&params);
        Ok(Self {
            params,
            geometry,
            timing,
        })
    }

    pub fn params(&self) -> &BuildParams {
        &self.params
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Every role the selected variant uses, in declaration order
    pub fn roles(&self) -> Vec<Role> {
        let mut roles = vec![
            Role::Input,
            Role::Count,
            Role::Core,
            Role::Border,
            Role::BorderOutput,
        ];
        let depth = self.geometry.memory_depth as u32;
        roles.extend((0..depth).map(Role::MemInput));
        roles.extend((0..depth).map(Role::MemCore));
        roles
    }

    fn declare_neurons(&self) -> TopologyResult<NeuronArena> {
        let g = &self.geometry;
        let mut arena = NeuronArena::new();

        for role in self.roles() {
            arena.add_layer(role, g.rows, g.cols);
            let fp = g.footprint(role);
            let cells: Vec<(usize, usize)> = if g.is_systolic() {
                fp.cols
                    .clone()
                    .flat_map(|c| fp.rows.clone().map(move |r| (r, c)))
                    .collect()
            } else {
                fp.rows
                    .clone()
                    .flat_map(|r| fp.cols.clone().map(move |c| (r, c)))
                    .collect()
            };
            for &(r, c) in &cells {
                arena.declare(
                    role,
                    r,
                    c,
                    g.threshold(role, c),
                    g.is_input(role, c),
                    g.is_output(role, r, c),
                )?;
            }
            debug!(role = %role.tag(), neurons = cells.len(), "Declared neurons");
        }
        Ok(arena)
    }

    /// Declare, wire and verify the whole netlist
    pub fn build(&self) -> TopologyResult<Netlist> {
        let arena = self.declare_neurons()?;

        let period = self.timing.frame_period as u32;
        let (synapses, skipped) = Wiring::new(&self.geometry, &arena, period).run()?;
        debug!(
            synapses = synapses.len(),
            skipped_taps = skipped,
            "Wired synapses"
        );

        let netlist = Netlist {
            base_network: self.params.base_network.clone(),
            neurons: arena.into_neurons(),
            synapses,
        };
        netlist.verify(&[1, 2, 4, period])?;

        info!(
            variant = %self.params.selector,
            neurons = netlist.neurons.len(),
            synapses = netlist.synapses.len(),
            frame_period = self.timing.frame_period,
            "Built netlist"
        );
        Ok(netlist)
    }
}

/// Validate `params` and build its netlist in one step
pub fn build(params: &BuildParams) -> TopologyResult<Netlist> {
    TopologyBuilder::new(params.clone())?.build()
}
