// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seeded random test grids

use crate::error::{GridError, GridResult};
use crate::types::{Grid, GridShape};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a grid where each cell is occupied with probability `density`.
///
/// The same seed always produces the same grid.
pub fn random_grid(shape: GridShape, density: f64, seed: u64) -> GridResult<Grid> {
    if shape.rows == 0 || shape.cols == 0 {
        return Err(GridError::InvalidParameter(format!(
            "grid must have at least one row and column, got {}x{}",
            shape.rows, shape.cols
        )));
    }
    if !(0.0..=1.0).contains(&density) {
        return Err(GridError::InvalidParameter(format!(
            "density must be within 0-1, got {}",
            density
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::empty(shape);
    for f in 0..shape.frames {
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                grid.set(f, r, c, rng.gen::<f64>() < density);
            }
        }
    }
    Ok(grid)
}
