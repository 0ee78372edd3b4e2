// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Grid file parsing.

ASCII grids of `0`/`1`, one row per line, frames separated by a blank line.
Any other character is fatal. Ragged rows and frames are reported as
[`ShapeIssue`]s and repaired against the first row/frame, unless strict mode
is requested, in which case the first issue is returned as an error.

Blank lines at the start or end of the file are ignored. Consecutive blank
lines between frames enclose an empty frame, which is reported as a ragged
frame of 0 rows and filled with zeros.
*/

use crate::error::{GridError, GridResult, ShapeIssue};
use crate::types::Grid;
use tracing::{debug, warn};

/// Parsed grid plus any tolerated shape problems
#[derive(Debug, Clone)]
pub struct ParsedGrid {
    pub grid: Grid,
    pub issues: Vec<ShapeIssue>,
}

/// Parse grid text (see module docs for the format).
pub fn parse_grid(text: &str, strict: bool) -> GridResult<ParsedGrid> {
    let mut frames: Vec<Vec<Vec<bool>>> = vec![Vec::new()];

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            // Blank lines before the first row delimit nothing
            if frames.len() > 1 || !frames[0].is_empty() {
                frames.push(Vec::new());
            }
            continue;
        }
        let frame = frames.len() - 1;
        let row = frames[frame].len();
        let mut bits = Vec::with_capacity(line.len());
        for (col, ch) in line.chars().enumerate() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                found => {
                    return Err(GridError::Parse {
                        frame,
                        row,
                        col,
                        found,
                    })
                }
            }
        }
        frames[frame].push(bits);
    }

    while frames.last().is_some_and(|f| f.is_empty()) {
        frames.pop();
    }

    let mut issues = Vec::new();
    let expected_rows = frames.first().map_or(0, |f| f.len());
    let expected_cols = frames
        .first()
        .and_then(|f| f.first())
        .map_or(0, |r| r.len());

    for (f, frame) in frames.iter_mut().enumerate() {
        if frame.len() != expected_rows {
            issues.push(ShapeIssue::RaggedFrame {
                frame: f,
                expected: expected_rows,
                actual: frame.len(),
            });
            frame.resize(expected_rows, vec![false; expected_cols]);
        }
        for (r, row) in frame.iter_mut().enumerate() {
            if row.len() != expected_cols {
                issues.push(ShapeIssue::RaggedRow {
                    frame: f,
                    row: r,
                    expected: expected_cols,
                    actual: row.len(),
                });
                row.resize(expected_cols, false);
            }
        }
    }

    if let Some(first) = issues.first() {
        if strict {
            return Err(GridError::Shape(first.clone()));
        }
        for issue in &issues {
            warn!("Grid shape error: {}", issue);
        }
    }

    let grid = Grid::from_frames(&frames);
    debug!(
        frames = grid.frames(),
        rows = grid.rows(),
        cols = grid.cols(),
        occupied = grid.occupied(),
        "Parsed grid"
    );

    Ok(ParsedGrid { grid, issues })
}
