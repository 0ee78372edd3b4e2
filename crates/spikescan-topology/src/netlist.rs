// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Netlist: the finished neuron and synapse lists, their text form and
consistency checking.

Text form (one command per line):

```text
FJ <base network>
AN <id> / AI <id> / AO <id> / SNP <id> Threshold <n> / SETNAME <id> <name>   per neuron
AE <from> <to> / SEP <from> <to> Delay <n> / SEP <from> <to> Weight <±1>     per synapse
SORT Q
TJ
```

Every neuron is declared before the first synapse, so any synapse only
references ids that already exist.
*/

use crate::error::{TopologyError, TopologyResult};
use crate::neuron::{Neuron, NeuronId, Synapse};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Netlist {
    pub base_network: String,
    pub neurons: Vec<Neuron>,
    pub synapses: Vec<Synapse>,
}

/// Neuron and synapse counts, for `--stats` and logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetlistStats {
    pub neurons: usize,
    pub synapses: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub neurons_by_role: BTreeMap<String, usize>,
    pub synapses_by_delay: BTreeMap<u32, usize>,
}

impl Netlist {
    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        // Ids are dense and start at 0
        self.neurons.get(id.0 as usize).filter(|n| n.id == id)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter().filter(|n| n.is_input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter().filter(|n| n.is_output)
    }

    /// Check the structural invariants of a finished netlist.
    ///
    /// `allowed_delays` is the complete set of delays the construction may use.
    pub fn verify(&self, allowed_delays: &[u32]) -> TopologyResult<()> {
        let mut declared = AHashSet::with_capacity(self.neurons.len());
        let mut last: Option<NeuronId> = None;
        for neuron in &self.neurons {
            if last.is_some_and(|prev| neuron.id <= prev) {
                return Err(TopologyError::Internal(format!(
                    "neuron id {} ({}) is not greater than its predecessor",
                    neuron.id,
                    neuron.name()
                )));
            }
            last = Some(neuron.id);
            declared.insert(neuron.id);
        }

        let mut pairs = AHashSet::with_capacity(self.synapses.len());
        for syn in &self.synapses {
            for end in [syn.from, syn.to] {
                if !declared.contains(&end) {
                    return Err(TopologyError::Internal(format!(
                        "synapse {} -> {} references undeclared neuron {}",
                        syn.from, syn.to, end
                    )));
                }
            }
            if !pairs.insert((syn.from, syn.to)) {
                return Err(TopologyError::Internal(format!(
                    "duplicate synapse {} -> {}",
                    syn.from, syn.to
                )));
            }
            if syn.weight != 1 && syn.weight != -1 {
                return Err(TopologyError::Internal(format!(
                    "synapse {} -> {} has weight {}",
                    syn.from, syn.to, syn.weight
                )));
            }
            if syn.delay < 1 || !allowed_delays.contains(&syn.delay) {
                return Err(TopologyError::Internal(format!(
                    "synapse {} -> {} has delay {}",
                    syn.from, syn.to, syn.delay
                )));
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> NetlistStats {
        let mut neurons_by_role = BTreeMap::new();
        for neuron in &self.neurons {
            *neurons_by_role.entry(neuron.role.tag()).or_insert(0) += 1;
        }
        let mut synapses_by_delay = BTreeMap::new();
        for syn in &self.synapses {
            *synapses_by_delay.entry(syn.delay).or_insert(0) += 1;
        }
        NetlistStats {
            neurons: self.neurons.len(),
            synapses: self.synapses.len(),
            inputs: self.inputs().count(),
            outputs: self.outputs().count(),
            neurons_by_role,
            synapses_by_delay,
        }
    }

    /// Fan-in per neuron, keyed by target id
    pub fn fan_in(&self) -> AHashMap<NeuronId, usize> {
        let mut fan_in = AHashMap::with_capacity(self.neurons.len());
        for syn in &self.synapses {
            *fan_in.entry(syn.to).or_insert(0) += 1;
        }
        fan_in
    }

    /// Render the netlist text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FJ {}", self.base_network)?;
        for n in &self.neurons {
            writeln!(f, "AN {}", n.id)?;
            if n.is_input {
                writeln!(f, "AI {}", n.id)?;
            }
            if n.is_output {
                writeln!(f, "AO {}", n.id)?;
            }
            writeln!(f, "SNP {} Threshold {}", n.id, n.threshold)?;
            writeln!(f, "SETNAME {} {}", n.id, n.name())?;
        }
        for s in &self.synapses {
            writeln!(f, "AE {} {}", s.from, s.to)?;
            writeln!(f, "SEP {} {} Delay {}", s.from, s.to, s.delay)?;
            writeln!(f, "SEP {} {} Weight {}", s.from, s.to, s.weight)?;
        }
        writeln!(f, "SORT Q")?;
        writeln!(f, "TJ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn neuron(id: u32, role: Role) -> Neuron {
        Neuron {
            id: NeuronId(id),
            role,
            row: 0,
            col: id as usize,
            threshold: 1,
            is_input: role == Role::Input,
            is_output: role == Role::Core,
        }
    }

    fn synapse(from: u32, to: u32, delay: u32, weight: i8) -> Synapse {
        Synapse {
            from: NeuronId(from),
            to: NeuronId(to),
            delay,
            weight,
        }
    }

    fn tiny() -> Netlist {
        Netlist {
            base_network: "empty.json".to_string(),
            neurons: vec![neuron(0, Role::Input), neuron(1, Role::Core)],
            synapses: vec![synapse(0, 1, 2, 1)],
        }
    }

    #[test]
    fn test_render_layout() {
        let text = tiny().render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "FJ empty.json");
        assert_eq!(&lines[1..5], &["AN 0", "AI 0", "SNP 0 Threshold 1", "SETNAME 0 I[0][0]"]);
        assert_eq!(lines[6], "AO 1");
        assert_eq!(
            &lines[9..12],
            &["AE 0 1", "SEP 0 1 Delay 2", "SEP 0 1 Weight 1"]
        );
        assert_eq!(&lines[lines.len() - 2..], &["SORT Q", "TJ"]);
    }

    #[test]
    fn test_verify_catches_violations() {
        assert!(tiny().verify(&[1, 2, 4]).is_ok());

        let mut dup = tiny();
        dup.synapses.push(synapse(0, 1, 1, 1));
        assert!(dup.verify(&[1, 2, 4]).is_err());

        let mut dangling = tiny();
        dangling.synapses.push(synapse(1, 7, 1, 1));
        assert!(dangling.verify(&[1, 2, 4]).is_err());

        let mut heavy = tiny();
        heavy.synapses[0].weight = 2;
        assert!(heavy.verify(&[1, 2, 4]).is_err());

        assert!(tiny().verify(&[1, 4]).is_err());

        let mut unordered = tiny();
        unordered.neurons.swap(0, 1);
        assert!(unordered.verify(&[1, 2, 4]).is_err());
    }

    #[test]
    fn test_stats_counts() {
        let stats = tiny().stats();
        assert_eq!((stats.neurons, stats.synapses), (2, 1));
        assert_eq!((stats.inputs, stats.outputs), (1, 1));
        assert_eq!(stats.neurons_by_role.get("Core"), Some(&1));
        assert_eq!(stats.synapses_by_delay.get(&2), Some(&1));
    }
}
