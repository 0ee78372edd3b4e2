// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core data model: occupancy grids, window parameters and labeled output grids.

Grids are stored densely in (frame, row, col) order. Lookups with signed
coordinates return `false` outside the grid so neighbourhood scans never wrap.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a grid sequence (frames × rows × cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub frames: usize,
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(frames: usize, rows: usize, cols: usize) -> Self {
        Self { frames, rows, cols }
    }

    /// Number of cells in one frame
    pub fn frame_len(&self) -> usize {
        self.rows * self.cols
    }
}

/// Rectangular sub-window of a frame (tile origin and extent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Region {
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self { row, col, rows, cols }
    }

    /// Region covering an entire frame of `shape`
    pub fn whole(shape: GridShape) -> Self {
        Self::new(0, 0, shape.rows, shape.cols)
    }
}

/// DBSCAN window parameters, fixed for a whole compile.
///
/// `epsilon_t` is `None` for purely spatial (2D) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub epsilon: u32,
    pub epsilon_t: Option<u32>,
    pub min_pts: u32,
}

impl Window {
    pub fn spatial(epsilon: u32, min_pts: u32) -> Self {
        Self {
            epsilon,
            epsilon_t: None,
            min_pts,
        }
    }

    pub fn spatiotemporal(epsilon: u32, epsilon_t: u32, min_pts: u32) -> Self {
        Self {
            epsilon,
            epsilon_t: Some(epsilon_t),
            min_pts,
        }
    }

    /// Number of prior frames that belong to the temporal window (0 for 2D)
    pub fn temporal_depth(&self) -> u32 {
        self.epsilon_t.unwrap_or(0)
    }
}

/// Occupancy grid sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    shape: GridShape,
    cells: Vec<bool>,
}

impl Grid {
    /// All-zero grid of the given shape
    pub fn empty(shape: GridShape) -> Self {
        Self {
            shape,
            cells: vec![false; shape.frames * shape.frame_len()],
        }
    }

    /// Build from nested frames of rows. Rows must already be rectangular.
    pub fn from_frames(frames: &[Vec<Vec<bool>>]) -> Self {
        let rows = frames.first().map_or(0, |f| f.len());
        let cols = frames
            .first()
            .and_then(|f| f.first())
            .map_or(0, |r| r.len());
        let mut grid = Self::empty(GridShape::new(frames.len(), rows, cols));
        for (f, frame) in frames.iter().enumerate() {
            for (r, row) in frame.iter().enumerate().take(rows) {
                for (c, &bit) in row.iter().enumerate().take(cols) {
                    grid.set(f, r, c, bit);
                }
            }
        }
        grid
    }

    /// Build a single-frame grid from `0`/`1` row strings (test helper style input)
    pub fn from_rows(rows: &[&str]) -> Self {
        let frame: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.bytes().map(|b| b == b'1').collect())
            .collect();
        Self::from_frames(&[frame])
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn frames(&self) -> usize {
        self.shape.frames
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    fn index(&self, frame: usize, row: usize, col: usize) -> usize {
        (frame * self.shape.rows + row) * self.shape.cols + col
    }

    pub fn get(&self, frame: usize, row: usize, col: usize) -> bool {
        frame < self.shape.frames
            && row < self.shape.rows
            && col < self.shape.cols
            && self.cells[self.index(frame, row, col)]
    }

    /// Lookup with signed coordinates; anything outside the grid is unoccupied
    pub fn get_signed(&self, frame: i64, row: i64, col: i64) -> bool {
        if frame < 0 || row < 0 || col < 0 {
            return false;
        }
        self.get(frame as usize, row as usize, col as usize)
    }

    pub fn set(&mut self, frame: usize, row: usize, col: usize, value: bool) {
        let idx = self.index(frame, row, col);
        self.cells[idx] = value;
    }

    /// Number of occupied cells over all frames
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Render in the grid file format (frames separated by a blank line)
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.shape.rows * 2);
        for f in 0..self.shape.frames {
            if f > 0 {
                out.push('\n');
            }
            for r in 0..self.shape.rows {
                for c in 0..self.shape.cols {
                    out.push(if self.get(f, r, c) { '1' } else { '0' });
                }
                out.push('\n');
            }
        }
        out
    }
}

/// DBSCAN classification of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Label {
    #[default]
    Noise,
    Core,
    Border,
}

impl Label {
    pub fn as_char(self) -> char {
        match self {
            Label::Noise => '.',
            Label::Core => 'C',
            Label::Border => 'B',
        }
    }
}

/// Labeled output grid sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledGrid {
    shape: GridShape,
    labels: Vec<Label>,
}

impl LabeledGrid {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            labels: vec![Label::Noise; shape.frames * shape.frame_len()],
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    fn index(&self, frame: usize, row: usize, col: usize) -> Option<usize> {
        (frame < self.shape.frames && row < self.shape.rows && col < self.shape.cols)
            .then(|| (frame * self.shape.rows + row) * self.shape.cols + col)
    }

    pub fn get(&self, frame: usize, row: usize, col: usize) -> Label {
        self.index(frame, row, col)
            .map_or(Label::Noise, |i| self.labels[i])
    }

    /// Set a label; returns `false` when the coordinate is outside the grid.
    pub fn set(&mut self, frame: usize, row: usize, col: usize, label: Label) -> bool {
        match self.index(frame, row, col) {
            Some(i) => {
                self.labels[i] = label;
                true
            }
            None => false,
        }
    }

    /// Merge a label where Core always wins over Border, and either wins over noise.
    pub fn mark(&mut self, frame: usize, row: usize, col: usize, label: Label) -> bool {
        let current = self.get(frame, row, col);
        let merged = match (current, label) {
            (Label::Core, _) | (_, Label::Core) => Label::Core,
            (Label::Border, _) | (_, Label::Border) => Label::Border,
            _ => Label::Noise,
        };
        self.set(frame, row, col, merged)
    }

    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Render as `.`/`C`/`B` rows, frames separated by a blank line
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LabeledGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in 0..self.shape.frames {
            if frame > 0 {
                writeln!(f)?;
            }
            for r in 0..self.shape.rows {
                for c in 0..self.shape.cols {
                    write!(f, "{}", self.get(frame, r, c).as_char())?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_lookup_never_wraps() {
        let grid = Grid::from_rows(&["11", "11"]);
        assert!(grid.get_signed(0, 0, 0));
        assert!(!grid.get_signed(0, -1, 0));
        assert!(!grid.get_signed(0, 0, 2));
        assert!(!grid.get_signed(1, 0, 0));
    }

    #[test]
    fn test_core_wins_when_marking() {
        let mut labels = LabeledGrid::new(GridShape::new(1, 1, 2));
        assert!(labels.mark(0, 0, 0, Label::Core));
        assert!(labels.mark(0, 0, 0, Label::Border));
        assert!(labels.mark(0, 0, 1, Label::Border));
        assert!(!labels.mark(0, 3, 0, Label::Core));
        assert_eq!(labels.render(), "CB\n");
    }

    #[test]
    fn test_grid_text_layout() {
        let mut grid = Grid::empty(GridShape::new(2, 1, 3));
        grid.set(1, 0, 2, true);
        assert_eq!(grid.to_text(), "000\n\n001\n");
        assert_eq!(grid.occupied(), 1);
    }
}
