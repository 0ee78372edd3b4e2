// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Event-camera CSV to frame binarisation.

Input lines are `time,x,y,polarity`. Events are grouped into consecutive
segments of `segment_len` time units starting at the first event; every event
in a segment marks its (y, x) cell. Quiet stretches between events still
produce their (empty) frames, so frame index stays proportional to time; a
stretch longer than [`MAX_QUIET_SEGMENTS`] segments is rejected. Events are
expected in time order. Polarity is ignored.
*/

use crate::error::{GridError, GridResult};
use crate::types::{Grid, GridShape};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Event {
    time: i64,
    x: usize,
    y: usize,
}

fn parse_event(line: &str) -> GridResult<Event> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(GridError::EventLine(line.to_string()));
    }
    let bad = || GridError::EventLine(line.to_string());
    let time = fields[0].parse::<i64>().map_err(|_| bad())?;
    let x = fields[1].parse::<usize>().map_err(|_| bad())?;
    let y = fields[2].parse::<usize>().map_err(|_| bad())?;
    fields[3].parse::<i8>().map_err(|_| bad())?;
    Ok(Event { time, x, y })
}

/// Longest run of empty frames a quiet stretch may produce
pub const MAX_QUIET_SEGMENTS: i64 = 4096;

fn segment_end(start: i64, segment_len: i64) -> GridResult<i64> {
    start.checked_add(segment_len).ok_or_else(|| {
        GridError::InvalidParameter(format!(
            "segment starting at {} overflows the time range",
            start
        ))
    })
}

/// Convert event CSV text into a `rows × cols` frame sequence.
pub fn frames_from_events(
    csv: &str,
    rows: usize,
    cols: usize,
    segment_len: i64,
) -> GridResult<Grid> {
    if segment_len <= 0 {
        return Err(GridError::InvalidParameter(format!(
            "segment length must be positive, got {}",
            segment_len
        )));
    }

    let mut segments: Vec<Vec<Event>> = Vec::new();
    let mut current: Vec<Event> = Vec::new();
    let mut window_end: Option<i64> = None;

    for line in csv.lines().filter(|l| !l.trim().is_empty()) {
        let event = parse_event(line)?;
        if event.x >= cols || event.y >= rows {
            return Err(GridError::InvalidParameter(format!(
                "event ({}, {}) outside {}x{} frame",
                event.x, event.y, rows, cols
            )));
        }
        let end = match window_end {
            Some(end) => end,
            None => segment_end(event.time, segment_len)?,
        };
        if event.time >= end {
            segments.push(std::mem::take(&mut current));
            // Whole segments with no events between `end` and this event
            let quiet = (event.time - end) / segment_len;
            if quiet > MAX_QUIET_SEGMENTS {
                return Err(GridError::InvalidParameter(format!(
                    "{} empty segments before event at time {} (limit {})",
                    quiet, event.time, MAX_QUIET_SEGMENTS
                )));
            }
            segments.extend((0..quiet).map(|_| Vec::new()));
            window_end = Some(segment_end(end + quiet * segment_len, segment_len)?);
        } else {
            window_end = Some(end);
        }
        current.push(event);
    }
    if !current.is_empty() {
        segments.push(current);
    }

    let mut grid = Grid::empty(GridShape::new(segments.len(), rows, cols));
    for (f, segment) in segments.iter().enumerate() {
        for event in segment {
            grid.set(f, event.y, event.x, true);
        }
    }
    debug!(frames = segments.len(), "Binarised event stream");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_split_into_segments() {
        let csv = "100,0,0,1\n105,1,1,0\n112,2,0,1\n";
        let grid = frames_from_events(csv, 2, 3, 10).unwrap();
        assert_eq!(grid.frames(), 2);
        assert_eq!(grid.to_text(), "100\n010\n\n001\n000\n");
    }

    #[test]
    fn test_quiet_gap_keeps_empty_frames() {
        // [100,110) [110,120) [120,130) [130,140)
        let grid = frames_from_events("100,0,0,1\n135,1,0,-1\n", 1, 2, 10).unwrap();
        assert_eq!(grid.frames(), 4);
        assert_eq!(grid.to_text(), "10\n\n00\n\n00\n\n01\n");
    }

    #[test]
    fn test_long_quiet_stretch_is_rejected() {
        let csv = format!("0,0,0,1\n{},1,0,1\n", (MAX_QUIET_SEGMENTS + 2) * 10);
        let err = frames_from_events(&csv, 1, 2, 10).unwrap_err();
        assert!(matches!(err, GridError::InvalidParameter(_)));

        let csv = format!("0,0,0,1\n{},1,0,1\n", (MAX_QUIET_SEGMENTS + 1) * 10);
        let grid = frames_from_events(&csv, 1, 2, 10).unwrap();
        assert_eq!(grid.frames() as i64, MAX_QUIET_SEGMENTS + 2);
    }

    #[test]
    fn test_time_near_i64_max_does_not_overflow() {
        let csv = format!("{},0,0,1\n", i64::MAX - 5);
        let err = frames_from_events(&csv, 1, 1, 10).unwrap_err();
        assert!(matches!(err, GridError::InvalidParameter(_)));

        let csv = format!("{},0,0,1\n{},0,0,1\n", i64::MAX - 20, i64::MAX - 1);
        let grid = frames_from_events(&csv, 1, 1, 10).unwrap();
        assert_eq!(grid.frames(), 2);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let err = frames_from_events("1,2,3\n", 4, 4, 10).unwrap_err();
        assert!(matches!(err, GridError::EventLine(l) if l == "1,2,3"));
    }
}
