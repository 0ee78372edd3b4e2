// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Compiled networks reproduce the reference classifier for every variant.
//!
//! Each case goes through the text forms end to end: netlist text into the
//! test simulator, `AS` injections in, a spike log out, then the decoder.

mod common;

use common::run_network;
use proptest::prelude::*;
use spikescan::prelude::*;
use spikescan::topology::Addressing;
use spikescan::grid::random_grid;

fn arb_case() -> impl Strategy<Value = (BuildParams, u64, f64)> {
    (
        proptest::sample::select(Selector::all()),
        1usize..7,
        1usize..7,
        1usize..3,
        1u32..3,
        1u32..3,
        2u32..7,
    )
        .prop_flat_map(|(selector, rows, cols, frames, epsilon, epsilon_t, min_pts)| {
            (
                Just((selector, rows, cols, frames, epsilon, epsilon_t, min_pts)),
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
                any::<u64>(),
                0u8..=10,
            )
        })
        .prop_map(
            |((selector, rows, cols, frames, epsilon, epsilon_t, min_pts), (tr, tc), row, col, seed, density)| {
                let window = if selector.is_spatiotemporal() {
                    Window::spatiotemporal(epsilon, epsilon_t, min_pts)
                } else {
                    Window::spatial(epsilon, min_pts)
                };
                let params = BuildParams::new(GridShape::new(frames, rows, cols), window, selector)
                    .with_tile(Region::new(row, col, tr, tc));
                (params, seed, f64::from(density) / 10.0)
            },
        )
}

fn expected(grid: &Grid, params: &BuildParams) -> LabeledGrid {
    let region = match params.selector.addressing {
        Addressing::Partial => params.tile,
        _ => None,
    };
    dbscan(grid, &params.window, region)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_network_matches_reference((params, seed, density) in arb_case()) {
        let grid = random_grid(params.shape, density, seed).unwrap();
        let decoded = run_network(&grid, &params);
        prop_assert_eq!(
            decoded.render(),
            expected(&grid, &params).render(),
            "variant {} on\n{}",
            params.selector,
            grid.to_text()
        );
    }
}

#[test]
fn flat_and_systolic_agree_on_a_dense_blob() {
    let grid = Grid::from_rows(&[
        "0110000",
        "1111000",
        "0110010",
        "0000111",
        "0000010",
    ]);
    let window = Window::spatial(1, 4);
    let reference = dbscan(&grid, &window, None).render();
    for token in ["FLAT", "SYSTOLIC"] {
        let params = BuildParams::new(grid.shape(), window, token.parse().unwrap());
        assert_eq!(run_network(&grid, &params).render(), reference, "{}", token);
    }
}

#[test]
fn empty_grid_produces_no_labels_for_every_variant() {
    let shape = GridShape::new(2, 5, 6);
    let grid = Grid::empty(shape);
    for selector in Selector::all() {
        let window = if selector.is_spatiotemporal() {
            Window::spatiotemporal(1, 1, 3)
        } else {
            Window::spatial(1, 3)
        };
        let params = BuildParams::new(shape, window, selector).with_tile(Region::new(1, 1, 3, 3));

        let injection = encode(&grid, &params).unwrap();
        assert!(injection.events.is_empty(), "{}", selector);

        let labels = run_network(&grid, &params);
        assert_eq!(labels.count(Label::Core), 0, "{}", selector);
        assert_eq!(labels.count(Label::Border), 0, "{}", selector);
    }
}
