// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Output decoder: simulator spike log → labeled grid.

Recognised lines:

```text
node <id>(<Name>) spike times: <t0> <t1> ...
node <id>(<Name>) spike counts: <n>
```

Only Core and Border records label cells. Anything else is kept as a
[`DecodeIssue`] and decoding carries on. Spikes that land outside the output
area (halo neurons, gap columns, tiles hanging over the grid edge) are
dropped without comment.
*/

use crate::error::{CodecResult, DecodeIssue};
use crate::schedule::Schedule;
use spikescan_grid::{Label, LabeledGrid};
use spikescan_topology::{BuildParams, NeuronName, Role, TimeSlot};
use tracing::{debug, trace};

/// Payload of a spike log record
#[derive(Debug, Clone, PartialEq)]
pub enum SpikeRecord {
    Times(Vec<usize>),
    Count(usize),
}

/// One parsed spike log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub id: u32,
    pub name: NeuronName,
    pub record: SpikeRecord,
}

/// Parse a spike log line; `None` if it does not match either record form
pub fn parse_log_line(line: &str) -> Option<LogLine> {
    let rest = line.trim().strip_prefix("node ")?;
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    if close < open {
        return None;
    }
    let id = rest[..open].trim().parse::<u32>().ok()?;
    let name = rest[open + 1..close].parse::<NeuronName>().ok()?;
    let tail = rest[close + 1..].trim_start();

    let record = if let Some(times) = tail.strip_prefix("spike times:") {
        let mut parsed = Vec::new();
        for token in times.split_whitespace() {
            parsed.push(parse_time(token)?);
        }
        SpikeRecord::Times(parsed)
    } else if let Some(count) = tail.strip_prefix("spike counts:") {
        SpikeRecord::Count(count.trim().parse().ok()?)
    } else {
        return None;
    };

    Some(LogLine { id, name, record })
}

/// Times may be printed as decimals; they are truncated to whole steps
fn parse_time(token: &str) -> Option<usize> {
    if let Ok(t) = token.parse::<usize>() {
        return Some(t);
    }
    let t = token.parse::<f64>().ok()?;
    (t.is_finite() && t >= 0.0).then(|| t.trunc() as usize)
}

/// Labels recovered from a spike log
#[derive(Debug, Clone)]
pub struct Decoded {
    pub labels: LabeledGrid,
    pub issues: Vec<DecodeIssue>,
}

/// Decode a spike log produced by running the network compiled from `params`
/// on `frames` frames.
pub fn decode(log: &str, params: &BuildParams, frames: usize) -> CodecResult<Decoded> {
    let schedule = Schedule::new(params)?;
    let mut labels = LabeledGrid::new(schedule.output_shape(frames));
    let mut issues = Vec::new();
    let mut placed = 0usize;

    for line in log.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = match parse_log_line(line) {
            Some(parsed) if parsed.name.role.is_labelling() => parsed,
            _ => {
                debug!("Unknown line: {}", line);
                issues.push(DecodeIssue::UnknownLine(line.to_string()));
                continue;
            }
        };
        let name = parsed.name;
        let label = if name.role == Role::Core {
            Label::Core
        } else {
            Label::Border
        };

        match parsed.record {
            SpikeRecord::Count(count) => {
                if !schedule.counts_decodable(frames) {
                    issues.push(DecodeIssue::AmbiguousCount(line.to_string()));
                    continue;
                }
                if count == 0 {
                    continue;
                }
                let slot = TimeSlot {
                    frame: 0,
                    tile_row: 0,
                    tile_col: 0,
                    offset: 0,
                };
                if let Some((r, c)) = schedule.output_cell(name.role, name.row, name.col, &slot) {
                    labels.mark(0, r, c, label);
                    placed += 1;
                }
            }
            SpikeRecord::Times(mut times) => {
                times.sort_unstable();
                for t in times {
                    let Some(slot) = schedule.timing.locate(t, name.role) else {
                        trace!(%name, time = t, "Spike before pipeline latency");
                        continue;
                    };
                    if slot.frame >= frames {
                        trace!(%name, time = t, "Spike beyond the last frame");
                        continue;
                    }
                    match schedule.output_cell(name.role, name.row, name.col, &slot) {
                        Some((r, c)) => {
                            labels.mark(slot.frame, r, c, label);
                            placed += 1;
                        }
                        None => trace!(%name, time = t, "Spike outside the output area"),
                    }
                }
            }
        }
    }

    debug!(
        placed,
        issues = issues.len(),
        cores = labels.count(Label::Core),
        borders = labels.count(Label::Border),
        "Decoded spike log"
    );
    Ok(Decoded { labels, issues })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikescan_grid::{GridShape, Window};

    #[test]
    fn test_parse_log_lines() {
        let line = parse_log_line("node 17(Core[2][0]) spike times: 5 12.0 30.7").unwrap();
        assert_eq!(line.id, 17);
        assert_eq!(line.name.role, Role::Core);
        assert_eq!(line.record, SpikeRecord::Times(vec![5, 12, 30]));

        let line = parse_log_line("node 3(Border[1][1]) spike counts: 2").unwrap();
        assert_eq!(line.record, SpikeRecord::Count(2));

        let line = parse_log_line("node 3(Border[1][1]) spike times:").unwrap();
        assert_eq!(line.record, SpikeRecord::Times(vec![]));

        assert!(parse_log_line("node x(Core[1][1]) spike times: 1").is_none());
        assert!(parse_log_line("node 1(Core[1][1]) fired").is_none());
        assert!(parse_log_line("node 1(Core[1][1]) spike times: soon").is_none());
    }

    #[test]
    fn test_flat_full_decoding_core_wins() {
        let params = BuildParams::new(
            GridShape::new(1, 2, 2),
            Window::spatial(1, 2),
            "FLAT".parse().unwrap(),
        );
        let log = "node 8(Core[0][1]) spike times: 2\n\
                   node 13(Border[0][1]) spike times: 4\n\
                   node 14(Border[1][0]) spike times: 4\n\
                   node 1(I[0][1]) spike times: 0\n\
                   garbage\n";
        let decoded = decode(log, &params, 1).unwrap();
        assert_eq!(decoded.labels.render(), ".C\nB.\n");
        assert_eq!(decoded.issues.len(), 2);
        assert_eq!(
            decoded.issues[1].to_string(),
            "Unknown line: garbage"
        );
    }

    #[test]
    fn test_counts_only_for_single_frame_flat() {
        let flat = BuildParams::new(
            GridShape::new(1, 2, 2),
            Window::spatial(1, 2),
            "FLAT".parse().unwrap(),
        );
        let log = "node 9(Core[1][1]) spike counts: 1\nnode 8(Core[0][1]) spike counts: 0\n";
        let decoded = decode(log, &flat, 1).unwrap();
        assert_eq!(decoded.labels.render(), "..\n.C\n");

        let decoded = decode(log, &flat, 2).unwrap();
        assert!(matches!(decoded.issues[0], DecodeIssue::AmbiguousCount(_)));
    }

    #[test]
    fn test_systolic_time_decomposition() {
        let params = BuildParams::new(
            GridShape::new(2, 3, 4),
            Window::spatial(1, 2),
            "SYSTOLIC".parse().unwrap(),
        );
        // Core latency 3, frame period 4 + 2 + 4 = 10
        let log = "node 40(Core[1][0]) spike times: 5 16\n";
        let decoded = decode(log, &params, 2).unwrap();
        assert_eq!(decoded.labels.get(0, 1, 2), Label::Core);
        assert_eq!(decoded.labels.get(1, 1, 3), Label::Core);
        assert_eq!(decoded.labels.count(Label::Core), 2);

        // Lane 1 is a shift copy, never an output
        let decoded = decode("node 41(Core[1][1]) spike times: 5\n", &params, 2).unwrap();
        assert_eq!(decoded.labels.count(Label::Core), 0);
        assert!(decoded.issues.is_empty());
    }
}
