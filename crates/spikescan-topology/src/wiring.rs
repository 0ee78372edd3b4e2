// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Synapse wiring for the count → core → border circuit.

| from → to                                  | delay        | weight |
|--------------------------------------------|--------------|--------|
| lane shift (I, Core, memories)             | 1            | +1     |
| I / Mem_I(k-1) → Mem_I(k)                  | frame period | +1     |
| Core / Mem_Core(k-1) → Mem_Core(k)         | frame period | +1     |
| I (window minus centre) → C                | 1            | +1     |
| Mem_I(k) (whole window) → C                | 1            | +1     |
| I (centre) → Core                          | 2            | +1     |
| C → Core                                   | 1            | +1     |
| Core (window minus centre) → B             | 1            | +1     |
| Mem_Core(k) (whole window) → B             | 1            | +1     |
| I (oldest) → Border                        | 4            | +1     |
| Core (centre) → Border                     | 2            | -1     |
| B → Border                                 | 1            | +1     |

Window taps whose source is absent (beyond the grid, or outside a role's
footprint) are skipped. Every other edge is required, and a missing endpoint
there means the layout itself is broken.
*/

use crate::arena::NeuronArena;
use crate::error::{TopologyError, TopologyResult};
use crate::geometry::Geometry;
use crate::neuron::{NeuronId, Synapse};
use crate::role::{NeuronName, Role};

const EXCITE: i8 = 1;
const INHIBIT: i8 = -1;

pub(crate) struct Wiring<'a> {
    geometry: &'a Geometry,
    arena: &'a NeuronArena,
    frame_period: u32,
    synapses: Vec<Synapse>,
    skipped: usize,
}

impl<'a> Wiring<'a> {
    pub(crate) fn new(geometry: &'a Geometry, arena: &'a NeuronArena, frame_period: u32) -> Self {
        Self {
            geometry,
            arena,
            frame_period,
            synapses: Vec::new(),
            skipped: 0,
        }
    }

    /// Emit every stage and return the synapses plus the number of skipped taps
    pub(crate) fn run(mut self) -> TopologyResult<(Vec<Synapse>, usize)> {
        self.lane_chains()?;
        self.memory_chains()?;
        self.count_inputs();
        self.core_inputs()?;
        self.border_detector_inputs();
        self.border_inputs()?;
        Ok((self.synapses, self.skipped))
    }

    fn push(&mut self, from: NeuronId, to: NeuronId, delay: u32, weight: i8) {
        self.synapses.push(Synapse {
            from,
            to,
            delay,
            weight,
        });
    }

    fn required(
        &mut self,
        from: (Role, usize, usize),
        to: (Role, usize, usize),
        delay: u32,
        weight: i8,
    ) -> TopologyResult<()> {
        let lookup = |(role, row, col): (Role, usize, usize)| {
            self.arena.get(role, row as i64, col as i64).ok_or_else(|| {
                TopologyError::Internal(format!(
                    "required neuron {} is absent",
                    NeuronName::new(role, row, col)
                ))
            })
        };
        let (src, dst) = (lookup(from)?, lookup(to)?);
        self.push(src, dst, delay, weight);
        Ok(())
    }

    fn optional(&mut self, from: (Role, i64, i64), to: (Role, usize, usize), delay: u32) {
        let src = self.arena.get(from.0, from.1, from.2);
        let dst = self.arena.get(to.0, to.1 as i64, to.2 as i64);
        match (src, dst) {
            (Some(src), Some(dst)) => self.push(src, dst, delay, EXCITE),
            _ => self.skipped += 1,
        }
    }

    fn cells(&self, role: Role) -> Vec<(usize, usize)> {
        let fp = self.geometry.footprint(role);
        fp.rows
            .flat_map(|r| fp.cols.clone().map(move |c| (r, c)))
            .collect()
    }

    fn memory_roles(&self) -> impl Iterator<Item = (Role, Role)> {
        let depth = self.geometry.memory_depth as u32;
        (0..depth).map(|k| (Role::MemInput(k), Role::MemCore(k)))
    }

    fn lane_chains(&mut self) -> TopologyResult<()> {
        if !self.geometry.is_systolic() {
            return Ok(());
        }
        let mut roles = vec![Role::Input, Role::Core];
        for (mem_i, mem_core) in self.memory_roles() {
            roles.push(mem_i);
            roles.push(mem_core);
        }
        for role in roles {
            if !self.geometry.has_lane_chain(role) {
                continue;
            }
            for (r, lane) in self.cells(role) {
                if lane + 1 < self.geometry.cols {
                    self.required((role, r, lane), (role, r, lane + 1), 1, EXCITE)?;
                }
            }
        }
        Ok(())
    }

    fn memory_chains(&mut self) -> TopologyResult<()> {
        let period = self.frame_period;
        let layers: Vec<(Role, Role)> = self.memory_roles().collect();
        for (k, (mem_i, mem_core)) in layers.into_iter().enumerate() {
            for (live, mem) in [(Role::Input, mem_i), (Role::Core, mem_core)] {
                let source = match (k, mem) {
                    (0, _) => live,
                    (_, Role::MemInput(_)) => Role::MemInput(k as u32 - 1),
                    _ => Role::MemCore(k as u32 - 1),
                };
                for (r, c) in self.cells(mem) {
                    if self.geometry.feeds_memory(c) {
                        self.required((source, r, c), (mem, r, c), period, EXCITE)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn count_inputs(&mut self) {
        let layers: Vec<Role> = self.memory_roles().map(|(mem_i, _)| mem_i).collect();
        for (r, c) in self.cells(Role::Count) {
            let taps = self.geometry.window_taps(r, c);
            for tap in &taps {
                if !tap.is_centre {
                    self.optional((Role::Input, tap.row, tap.col), (Role::Count, r, c), 1);
                }
            }
            for &mem in &layers {
                for tap in &taps {
                    self.optional((mem, tap.row, tap.col), (Role::Count, r, c), 1);
                }
            }
        }
    }

    /// Core aggregators sit where Count neurons do; other Core lanes are shift copies
    fn core_inputs(&mut self) -> TopologyResult<()> {
        for (r, c) in self.cells(Role::Count) {
            let (cr, cc) = self.geometry.centre_tap(r, c);
            self.required((Role::Input, cr, cc), (Role::Core, r, c), 2, EXCITE)?;
            self.required((Role::Count, r, c), (Role::Core, r, c), 1, EXCITE)?;
        }
        Ok(())
    }

    fn border_detector_inputs(&mut self) {
        let layers: Vec<Role> = self.memory_roles().map(|(_, mem_core)| mem_core).collect();
        for (r, c) in self.cells(Role::Border) {
            let taps = self.geometry.window_taps(r, c);
            for tap in &taps {
                if !tap.is_centre {
                    self.optional((Role::Core, tap.row, tap.col), (Role::Border, r, c), 1);
                }
            }
            for &mem in &layers {
                for tap in &taps {
                    self.optional((mem, tap.row, tap.col), (Role::Border, r, c), 1);
                }
            }
        }
    }

    fn border_inputs(&mut self) -> TopologyResult<()> {
        for (r, c) in self.cells(Role::BorderOutput) {
            let (ir, ic) = self.geometry.oldest_tap(r, c);
            let (cr, cc) = self.geometry.centre_tap(r, c);
            self.required((Role::Input, ir, ic), (Role::BorderOutput, r, c), 4, EXCITE)?;
            self.required((Role::Core, cr, cc), (Role::BorderOutput, r, c), 2, INHIBIT)?;
            self.required((Role::Border, r, c), (Role::BorderOutput, r, c), 1, EXCITE)?;
        }
        Ok(())
    }
}
