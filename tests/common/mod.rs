// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Discrete-time spike simulator for end-to-end tests.
//!
//! Reads netlist text and `AS` injections, advances one global step at a
//! time, delivers each spike `delay` steps after its source fired, and fires
//! a neuron when the weights arriving in one step reach its threshold.
//! Charge does not carry over between steps. Injected inputs fire at their
//! injection step.

#![allow(dead_code)]

use ahash::AHashMap;
use spikescan::codec::{decode, encode, InjectionFormat};
use spikescan::grid::{Grid, LabeledGrid};
use spikescan::topology::{build, BuildParams};

#[derive(Debug, Clone)]
pub struct SimNeuron {
    pub name: String,
    pub threshold: i32,
    pub is_output: bool,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: u32,
    delay: usize,
    weight: i32,
}

/// Network as described by netlist text
#[derive(Debug, Default)]
pub struct SimNetwork {
    pub base_network: String,
    pub neurons: AHashMap<u32, SimNeuron>,
    /// Declaration order of ids
    pub order: Vec<u32>,
    /// Input port k is the k-th `AI` line
    pub inputs: Vec<u32>,
    edges: AHashMap<u32, Vec<Edge>>,
}

fn num<T: std::str::FromStr>(token: Option<&str>, line: &str) -> T {
    token
        .and_then(|t| t.parse().ok())
        .unwrap_or_else(|| panic!("bad netlist line: {}", line))
}

impl SimNetwork {
    pub fn parse(text: &str) -> Self {
        let mut net = SimNetwork::default();
        let mut pending: AHashMap<(u32, u32), (Option<usize>, Option<i32>)> = AHashMap::new();
        let mut edge_order: Vec<(u32, u32)> = Vec::new();

        for line in text.lines() {
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("FJ") => net.base_network = parts.next().unwrap_or_default().to_string(),
                Some("AN") => {
                    let id: u32 = num(parts.next(), line);
                    net.order.push(id);
                    net.neurons.insert(
                        id,
                        SimNeuron {
                            name: String::new(),
                            threshold: 1,
                            is_output: false,
                        },
                    );
                }
                Some("AI") => net.inputs.push(num(parts.next(), line)),
                Some("AO") => {
                    let id: u32 = num(parts.next(), line);
                    net.neurons.get_mut(&id).expect("AO before AN").is_output = true;
                }
                Some("SNP") => {
                    let id: u32 = num(parts.next(), line);
                    assert_eq!(parts.next(), Some("Threshold"), "{}", line);
                    net.neurons.get_mut(&id).expect("SNP before AN").threshold =
                        num(parts.next(), line);
                }
                Some("SETNAME") => {
                    let id: u32 = num(parts.next(), line);
                    net.neurons.get_mut(&id).expect("SETNAME before AN").name =
                        parts.next().expect("missing name").to_string();
                }
                Some("AE") => {
                    let key = (num(parts.next(), line), num(parts.next(), line));
                    assert!(pending.insert(key, (None, None)).is_none(), "duplicate edge {}", line);
                    edge_order.push(key);
                }
                Some("SEP") => {
                    let key = (num(parts.next(), line), num(parts.next(), line));
                    let entry = pending.get_mut(&key).expect("SEP before AE");
                    match parts.next() {
                        Some("Delay") => entry.0 = Some(num(parts.next(), line)),
                        Some("Weight") => entry.1 = Some(num(parts.next(), line)),
                        _ => panic!("bad SEP line: {}", line),
                    }
                }
                Some("SORT") | Some("TJ") | None => {}
                Some(other) => panic!("unknown netlist command {}", other),
            }
        }

        for key in edge_order {
            let (delay, weight) = pending[&key];
            net.edges.entry(key.0).or_default().push(Edge {
                to: key.1,
                delay: delay.expect("edge without delay"),
                weight: weight.expect("edge without weight"),
            });
        }
        net
    }

    /// Run from step 0 to `run_time` (exclusive); returns each neuron's spike times
    pub fn simulate(&self, injections: &[(usize, usize)], run_time: usize) -> AHashMap<u32, Vec<usize>> {
        let mut forced: AHashMap<usize, Vec<u32>> = AHashMap::new();
        for &(time, input) in injections {
            forced.entry(time).or_default().push(self.inputs[input]);
        }

        let mut arriving: AHashMap<usize, AHashMap<u32, i32>> = AHashMap::new();
        let mut spikes: AHashMap<u32, Vec<usize>> = AHashMap::new();

        for t in 0..run_time {
            let mut fired: Vec<u32> = forced.remove(&t).unwrap_or_default();
            if let Some(charges) = arriving.remove(&t) {
                for (id, charge) in charges {
                    if charge >= self.neurons[&id].threshold {
                        fired.push(id);
                    }
                }
            }
            fired.sort_unstable();
            fired.dedup();

            for id in fired {
                spikes.entry(id).or_default().push(t);
                for edge in self.edges.get(&id).map(Vec::as_slice).unwrap_or_default() {
                    *arriving
                        .entry(t + edge.delay)
                        .or_default()
                        .entry(edge.to)
                        .or_insert(0) += edge.weight;
                }
            }
        }
        spikes
    }

    fn output_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.neurons[id].is_output)
    }

    /// Spike log with `spike times:` records for every output neuron that fired
    pub fn time_log(&self, spikes: &AHashMap<u32, Vec<usize>>) -> String {
        let mut log = String::new();
        for id in self.output_ids() {
            if let Some(times) = spikes.get(&id) {
                let times: Vec<String> = times.iter().map(|t| t.to_string()).collect();
                log.push_str(&format!(
                    "node {}({}) spike times: {}\n",
                    id,
                    self.neurons[&id].name,
                    times.join(" ")
                ));
            }
        }
        log
    }

    /// Spike log with `spike counts:` records for every output neuron
    pub fn count_log(&self, spikes: &AHashMap<u32, Vec<usize>>) -> String {
        let mut log = String::new();
        for id in self.output_ids() {
            let count = spikes.get(&id).map_or(0, Vec::len);
            log.push_str(&format!(
                "node {}({}) spike counts: {}\n",
                id, self.neurons[&id].name, count
            ));
        }
        log
    }
}

/// Parse `AS <input> <time> 1` lines into (time, input) pairs
pub fn parse_injection(text: &str) -> Vec<(usize, usize)> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let mut parts = line.split_whitespace();
            assert_eq!(parts.next(), Some("AS"), "{}", line);
            let input = num(parts.next(), line);
            let time = num(parts.next(), line);
            (time, input)
        })
        .collect()
}

/// Compile, encode, simulate and decode `grid` through text at every step
pub fn run_network(grid: &Grid, params: &BuildParams) -> LabeledGrid {
    let netlist = build(params).expect("build");
    let net = SimNetwork::parse(&netlist.render());
    assert_eq!(net.order.len(), netlist.neurons.len());

    let injection = encode(grid, params).expect("encode");
    let events = parse_injection(&injection.render(InjectionFormat::Events).expect("render"));
    let spikes = net.simulate(&events, injection.run_time);

    let decoded = decode(&net.time_log(&spikes), params, grid.frames()).expect("decode");
    assert!(decoded.issues.is_empty(), "issues: {:?}", decoded.issues);
    decoded.labels
}
