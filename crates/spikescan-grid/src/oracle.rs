// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Brute-force windowed DBSCAN, used as the correctness reference for compiled networks.

For an occupied cell at (f, r, c) the neighbourhood is every in-bounds cell in
frames `f - epsilon_t ..= f`, rows `r ± epsilon`, cols `c ± epsilon` (the cell
itself included). A cell is core when that count reaches `min_pts`; an
occupied non-core cell is border when its neighbourhood holds a core cell.
*/

use crate::types::{Grid, GridShape, Label, LabeledGrid, Region, Window};

/// Classify every cell of `grid` and return the labels inside `region`
/// (the whole frame when `None`). Region cells beyond the grid are noise.
pub fn dbscan(grid: &Grid, window: &Window, region: Option<Region>) -> LabeledGrid {
    let full = classify(grid, window);
    let region = region.unwrap_or_else(|| Region::whole(grid.shape()));

    let mut out = LabeledGrid::new(GridShape::new(grid.frames(), region.rows, region.cols));
    for f in 0..grid.frames() {
        for r in 0..region.rows {
            for c in 0..region.cols {
                out.set(f, r, c, full.get(f, region.row + r, region.col + c));
            }
        }
    }
    out
}

fn classify(grid: &Grid, window: &Window) -> LabeledGrid {
    let shape = grid.shape();
    let e = window.epsilon as i64;
    let depth = window.temporal_depth() as i64;
    let mut labels = LabeledGrid::new(shape);

    for f in 0..shape.frames {
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                if !grid.get(f, r, c) {
                    continue;
                }
                let mut count = 0u32;
                for_each_neighbour(f, r, c, e, depth, |ff, rr, cc| {
                    if grid.get_signed(ff, rr, cc) {
                        count += 1;
                    }
                });
                if count >= window.min_pts {
                    labels.set(f, r, c, Label::Core);
                }
            }
        }
    }

    for f in 0..shape.frames {
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                if !grid.get(f, r, c) || labels.get(f, r, c) == Label::Core {
                    continue;
                }
                let mut near_core = false;
                for_each_neighbour(f, r, c, e, depth, |ff, rr, cc| {
                    if ff >= 0
                        && rr >= 0
                        && cc >= 0
                        && labels.get(ff as usize, rr as usize, cc as usize) == Label::Core
                    {
                        near_core = true;
                    }
                });
                if near_core {
                    labels.set(f, r, c, Label::Border);
                }
            }
        }
    }

    labels
}

fn for_each_neighbour(
    f: usize,
    r: usize,
    c: usize,
    e: i64,
    depth: i64,
    mut visit: impl FnMut(i64, i64, i64),
) {
    let (f, r, c) = (f as i64, r as i64, c as i64);
    for ff in (f - depth)..=f {
        for rr in (r - e)..=(r + e) {
            for cc in (c - e)..=(c + e) {
                visit(ff, rr, cc);
            }
        }
    }
}
