// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Structural invariants of built netlists across every construction variant

use proptest::prelude::*;
use spikescan_grid::{GridShape, Region, Window};
use spikescan_topology::{
    build, Addressing, BuildParams, Role, Selector, TopologyBuilder, TopologyError,
};

fn arb_params() -> impl Strategy<Value = BuildParams> {
    (
        proptest::sample::select(Selector::all()),
        1usize..7,
        1usize..7,
        1u32..3,
        1u32..3,
        2u32..6,
    )
        .prop_flat_map(|(selector, rows, cols, epsilon, epsilon_t, min_pts)| {
            (
                Just((selector, rows, cols, epsilon, epsilon_t, min_pts)),
                1..=rows,
                1..=cols,
            )
        })
        .prop_flat_map(|(base, tile_rows, tile_cols)| {
            let (_, rows, cols, ..) = base;
            (
                Just(base),
                Just((tile_rows, tile_cols)),
                0..=rows - tile_rows,
                0..=cols - tile_cols,
            )
        })
        .prop_map(
            |((selector, rows, cols, epsilon, epsilon_t, min_pts), (tr, tc), row, col)| {
                let window = if selector.is_spatiotemporal() {
                    Window::spatiotemporal(epsilon, epsilon_t, min_pts)
                } else {
                    Window::spatial(epsilon, min_pts)
                };
                BuildParams::new(GridShape::new(2, rows, cols), window, selector)
                    .with_tile(Region::new(row, col, tr, tc))
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_variant_builds_a_consistent_netlist(params in arb_params()) {
        let builder = TopologyBuilder::new(params).unwrap();
        let netlist = builder.build().unwrap();

        // Ids strictly increase from zero in declaration order
        for (idx, neuron) in netlist.neurons.iter().enumerate() {
            prop_assert_eq!(neuron.id.0 as usize, idx);
        }

        let fan_in = netlist.fan_in();
        for neuron in &netlist.neurons {
            let inputs = fan_in.get(&neuron.id).copied().unwrap_or(0);
            match neuron.role {
                Role::BorderOutput => prop_assert_eq!(inputs, 3),
                Role::Core if neuron.col == 0 || !builder.geometry().is_systolic() => {
                    prop_assert_eq!(inputs, 2)
                }
                Role::Input if neuron.is_input => prop_assert_eq!(inputs, 0),
                _ => {}
            }
        }

        let inhibitory = netlist.synapses.iter().filter(|s| s.weight == -1).count();
        prop_assert_eq!(inhibitory, netlist.stats().neurons_by_role["Border"]);
    }

    #[test]
    fn prop_text_declares_neurons_before_edges(params in arb_params()) {
        let text = build(&params).unwrap().render();
        let lines: Vec<&str> = text.lines().collect();
        prop_assert!(lines[0].starts_with("FJ "));
        prop_assert_eq!(&lines[lines.len() - 2..], &["SORT Q", "TJ"]);

        let first_edge = lines.iter().position(|l| l.starts_with("AE ")).unwrap_or(lines.len());
        let last_neuron = lines.iter().rposition(|l| l.starts_with("SETNAME ")).unwrap();
        prop_assert!(last_neuron < first_edge);
    }
}

#[test]
fn test_flat_partial_has_no_skipped_count_taps() {
    let params = BuildParams::new(
        GridShape::new(1, 9, 9),
        Window::spatial(1, 4),
        "FLAT_PARTIAL".parse().unwrap(),
    )
    .with_tile(Region::new(3, 3, 3, 3));
    let netlist = build(&params).unwrap();
    let fan_in = netlist.fan_in();
    for n in netlist.neurons.iter().filter(|n| n.role == Role::Count) {
        assert_eq!(fan_in[&n.id], 8);
    }
}

#[test]
fn test_partial_tile_outside_grid_is_config_error() {
    let selector: Selector = "3D_SYSTOLIC_PARTIAL".parse().unwrap();
    assert_eq!(selector.addressing, Addressing::Partial);
    let params = BuildParams::new(
        GridShape::new(4, 6, 6),
        Window::spatiotemporal(1, 1, 3),
        selector,
    )
    .with_tile(Region::new(4, 0, 3, 3));
    assert!(matches!(build(&params), Err(TopologyError::Config(_))));
}
