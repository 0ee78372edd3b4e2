// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Physical layout of each construction variant.

Per-variant differences live here as data (footprints, taps, thresholds),
so the builder and the wiring pass run one code path for every variant.

With `e = epsilon`, a tiled layout covers the tile plus a `2e` halo on every
side. Count and Core neurons need a complete `e` neighbourhood of inputs,
Border neurons need a complete `e` neighbourhood of Cores, hence:

```text
Input          [0, dim)
Count, Core    [e, dim - e)
B, Border      [2e, dim - 2e)    <- output area
```

Systolic layouts keep this on the row axis and replace the column axis by
`2e + 1` lanes: lane 0 receives the raster, lane `e` is the centre column
of the window, lane `2e` the oldest.
*/

use crate::params::BuildParams;
use crate::role::Role;
use crate::selector::Layout;
use std::ops::Range;

/// Rows and columns (or lanes) a role occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Footprint {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) && self.cols.contains(&col)
    }

    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One source position feeding a window aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    pub row: i64,
    pub col: i64,
    /// The aggregator's own cell (current frame)
    pub is_centre: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub layout: Layout,
    /// Physical rows
    pub rows: usize,
    /// Physical columns (flat) or lanes (systolic)
    pub cols: usize,
    pub epsilon: usize,
    /// Offset of the output area inside the physical layout (0 or 2e)
    pub halo: usize,
    pub memory_depth: usize,
    min_pts: u32,
}

impl Geometry {
    pub fn new(params: &BuildParams) -> Self {
        let e = params.epsilon();
        let tiled = params.selector.is_tiled();
        let halo = if tiled { 2 * e } else { 0 };
        let tile = params.tile_region();

        let rows = if tiled {
            tile.rows + 4 * e
        } else {
            params.shape.rows
        };
        let cols = match params.selector.layout {
            Layout::Systolic => 2 * e + 1,
            Layout::Flat if tiled => tile.cols + 4 * e,
            Layout::Flat => params.shape.cols,
        };

        Self {
            layout: params.selector.layout,
            rows,
            cols,
            epsilon: e,
            halo,
            memory_depth: params.memory_depth(),
            min_pts: params.window.min_pts,
        }
    }

    pub fn is_systolic(&self) -> bool {
        self.layout == Layout::Systolic
    }

    /// Number of lanes of a systolic role (1 for single-lane roles)
    fn lanes(&self, role: Role) -> usize {
        match role {
            Role::Input | Role::Core | Role::MemInput(_) | Role::MemCore(_) => self.cols,
            Role::Count | Role::Border | Role::BorderOutput => 1,
        }
    }

    /// Margin a role keeps from the physical edge; 0 for full-frame layouts
    fn margin(&self, role: Role) -> usize {
        if self.halo == 0 {
            return 0;
        }
        match role {
            Role::Input | Role::MemInput(_) => 0,
            Role::Count | Role::Core | Role::MemCore(_) => self.epsilon,
            Role::Border | Role::BorderOutput => 2 * self.epsilon,
        }
    }

    pub fn footprint(&self, role: Role) -> Footprint {
        let m = self.margin(role);
        let rows = m..self.rows.saturating_sub(m).max(m);
        let cols = if self.is_systolic() {
            0..self.lanes(role)
        } else {
            m..self.cols.saturating_sub(m).max(m)
        };
        Footprint { rows, cols }
    }

    /// Whether a role spans several lanes and is shifted lane to lane
    pub fn has_lane_chain(&self, role: Role) -> bool {
        self.is_systolic() && self.lanes(role) > 1
    }

    pub fn threshold(&self, role: Role, col: usize) -> u32 {
        match role {
            Role::Count => self.min_pts - 1,
            Role::Core if self.is_systolic() && col > 0 => 1,
            Role::Core | Role::BorderOutput => 2,
            Role::Input | Role::Border | Role::MemInput(_) | Role::MemCore(_) => 1,
        }
    }

    pub fn is_input(&self, role: Role, col: usize) -> bool {
        role == Role::Input && (!self.is_systolic() || col == 0)
    }

    /// Whether the cell lies in the reported area (the tile, or the whole frame)
    pub fn in_output_area(&self, row: usize, col: usize) -> bool {
        let rows = self.halo..self.rows - self.halo;
        if self.is_systolic() {
            return rows.contains(&row) && col == 0;
        }
        rows.contains(&row) && (self.halo..self.cols - self.halo).contains(&col)
    }

    pub fn is_output(&self, role: Role, row: usize, col: usize) -> bool {
        role.is_labelling() && self.footprint(role).contains(row, col) && self.in_output_area(row, col)
    }

    /// Index used by `AS` injection for an input neuron
    pub fn input_index(&self, row: usize, col: usize) -> usize {
        if self.is_systolic() {
            row
        } else {
            row * self.cols + col
        }
    }

    /// Number of input ports
    pub fn input_count(&self) -> usize {
        if self.is_systolic() {
            self.rows
        } else {
            self.rows * self.cols
        }
    }

    /// Positions an aggregator at (row, col) reads from a window-shaped role.
    ///
    /// Flat layouts read the ±e square around the cell. Systolic layouts read
    /// every lane of the ±e rows, where lane `e` holds the centre column.
    pub fn window_taps(&self, row: usize, col: usize) -> Vec<Tap> {
        let e = self.epsilon as i64;
        let (r, c) = (row as i64, col as i64);
        let mut taps = Vec::with_capacity((2 * self.epsilon + 1).pow(2));
        for dr in -e..=e {
            if self.is_systolic() {
                for lane in 0..self.cols as i64 {
                    taps.push(Tap {
                        row: r + dr,
                        col: lane,
                        is_centre: dr == 0 && lane == e,
                    });
                }
            } else {
                for dc in -e..=e {
                    taps.push(Tap {
                        row: r + dr,
                        col: c + dc,
                        is_centre: dr == 0 && dc == 0,
                    });
                }
            }
        }
        taps
    }

    /// Where the cell's own current value sits (lane `e` on systolic layouts)
    pub fn centre_tap(&self, row: usize, col: usize) -> (usize, usize) {
        if self.is_systolic() {
            (row, self.epsilon)
        } else {
            (row, col)
        }
    }

    /// Where the cell's own input sits when Border fires (lane `2e` on systolic layouts)
    pub fn oldest_tap(&self, row: usize, col: usize) -> (usize, usize) {
        if self.is_systolic() {
            (row, 2 * self.epsilon)
        } else {
            (row, col)
        }
    }

    /// Cells whose memory chain is fed directly (lane 0 only on systolic layouts)
    pub fn feeds_memory(&self, col: usize) -> bool {
        !self.is_systolic() || col == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Addressing, Dimensionality, Selector};
    use spikescan_grid::{GridShape, Region, Window};

    fn geometry(layout: Layout, addressing: Addressing) -> Geometry {
        let params = BuildParams::new(
            GridShape::new(1, 6, 8),
            Window::spatial(1, 3),
            Selector::new(layout, addressing, Dimensionality::Planar),
        )
        .with_tile(Region::new(1, 2, 3, 4));
        Geometry::new(&params)
    }

    #[test]
    fn test_flat_partial_footprints() {
        let g = geometry(Layout::Flat, Addressing::Partial);
        assert_eq!((g.rows, g.cols), (7, 8));
        assert_eq!(g.footprint(Role::Input).len(), 56);
        assert_eq!(g.footprint(Role::Core), Footprint { rows: 1..6, cols: 1..7 });
        assert_eq!(g.footprint(Role::Border), Footprint { rows: 2..5, cols: 2..6 });
        assert!(g.is_output(Role::BorderOutput, 2, 2));
        assert!(!g.is_output(Role::Core, 1, 3));
        assert!(!g.is_output(Role::Border, 2, 2));
    }

    #[test]
    fn test_systolic_full_lanes() {
        let g = geometry(Layout::Systolic, Addressing::Full);
        assert_eq!((g.rows, g.cols), (6, 3));
        assert_eq!(g.footprint(Role::Input).cols, 0..3);
        assert_eq!(g.footprint(Role::Count).cols, 0..1);
        assert_eq!(g.threshold(Role::Core, 0), 2);
        assert_eq!(g.threshold(Role::Core, 2), 1);
        assert_eq!(g.threshold(Role::Count, 0), 2);
        assert!(g.is_input(Role::Input, 0));
        assert!(!g.is_input(Role::Input, 1));
        assert!(g.has_lane_chain(Role::MemCore(0)));
        assert!(!g.has_lane_chain(Role::Border));
    }

    #[test]
    fn test_window_taps_mark_one_centre() {
        for layout in [Layout::Flat, Layout::Systolic] {
            let g = geometry(layout, Addressing::Full);
            let taps = g.window_taps(2, 2);
            assert_eq!(taps.len(), 9);
            assert_eq!(taps.iter().filter(|t| t.is_centre).count(), 1);
        }
    }

    #[test]
    fn test_input_index_matches_declaration_order() {
        let flat = geometry(Layout::Flat, Addressing::Full);
        assert_eq!(flat.input_index(2, 3), 19);
        assert_eq!(flat.input_count(), 48);
        let systolic = geometry(Layout::Systolic, Addressing::PartialStream);
        assert_eq!(systolic.input_index(4, 0), 4);
        assert_eq!(systolic.input_count(), 7);
    }
}
