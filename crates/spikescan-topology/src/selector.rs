// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Construction selector.

A selector picks one of the twelve construction variants:
{Flat, Systolic} × {Full, Partial, PartialStream} × {2D, 3D}.

Token form: optional `3D_` prefix, then `FLAT` or `SYSTOLIC`, then an optional
`_PARTIAL`, `_STREAM` or `_PARTIAL_STREAM` suffix. Tokens are case-insensitive.
*/

use crate::error::TopologyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// One neuron per role and cell, explicit neighbour wiring
    Flat,
    /// Lane pipeline of width 2ε+1, columns are swept through time
    Systolic,
}

/// Which part of the grid one network instance covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Addressing {
    /// The whole frame
    Full,
    /// One haloed tile at a fixed origin
    Partial,
    /// Haloed tiles time-multiplexed over the whole frame
    PartialStream,
}

/// Spatial-only or spatiotemporal window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    Planar,
    Spatiotemporal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    pub layout: Layout,
    pub addressing: Addressing,
    pub dimensionality: Dimensionality,
}

impl Selector {
    pub fn new(layout: Layout, addressing: Addressing, dimensionality: Dimensionality) -> Self {
        Self {
            layout,
            addressing,
            dimensionality,
        }
    }

    pub fn is_systolic(&self) -> bool {
        self.layout == Layout::Systolic
    }

    pub fn is_spatiotemporal(&self) -> bool {
        self.dimensionality == Dimensionality::Spatiotemporal
    }

    /// Partial and stream variants carry an ε-halo around the tile
    pub fn is_tiled(&self) -> bool {
        self.addressing != Addressing::Full
    }

    /// Every construction variant, in a stable order
    pub fn all() -> Vec<Selector> {
        let mut out = Vec::with_capacity(12);
        for dimensionality in [Dimensionality::Planar, Dimensionality::Spatiotemporal] {
            for layout in [Layout::Flat, Layout::Systolic] {
                for addressing in [
                    Addressing::Full,
                    Addressing::Partial,
                    Addressing::PartialStream,
                ] {
                    out.push(Selector::new(layout, addressing, dimensionality));
                }
            }
        }
        out
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_spatiotemporal() {
            write!(f, "3D_")?;
        }
        match self.layout {
            Layout::Flat => write!(f, "FLAT")?,
            Layout::Systolic => write!(f, "SYSTOLIC")?,
        }
        match self.addressing {
            Addressing::Full => Ok(()),
            Addressing::Partial => write!(f, "_PARTIAL"),
            Addressing::PartialStream => write!(f, "_STREAM"),
        }
    }
}

impl FromStr for Selector {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let unknown = || TopologyError::UnknownSelector(s.to_string());

        let (dimensionality, rest) = match token.strip_prefix("3D_") {
            Some(rest) => (Dimensionality::Spatiotemporal, rest),
            None => (Dimensionality::Planar, token.as_str()),
        };
        let (layout, rest) = if let Some(rest) = rest.strip_prefix("FLAT") {
            (Layout::Flat, rest)
        } else if let Some(rest) = rest.strip_prefix("SYSTOLIC") {
            (Layout::Systolic, rest)
        } else {
            return Err(unknown());
        };
        let addressing = match rest {
            "" => Addressing::Full,
            "_PARTIAL" => Addressing::Partial,
            "_STREAM" | "_PARTIAL_STREAM" => Addressing::PartialStream,
            _ => return Err(unknown()),
        };

        Ok(Selector::new(layout, addressing, dimensionality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        let s: Selector = "3D_SYSTOLIC_STREAM".parse().unwrap();
        assert_eq!(
            s,
            Selector::new(
                Layout::Systolic,
                Addressing::PartialStream,
                Dimensionality::Spatiotemporal
            )
        );
        let s: Selector = "flat".parse().unwrap();
        assert_eq!(s.addressing, Addressing::Full);
        assert!(!s.is_spatiotemporal());
        let s: Selector = "FLAT_PARTIAL_STREAM".parse().unwrap();
        assert_eq!(s.addressing, Addressing::PartialStream);
    }

    #[test]
    fn test_display_round_trips_for_every_variant() {
        let all = Selector::all();
        assert_eq!(all.len(), 12);
        for selector in all {
            let parsed: Selector = selector.to_string().parse().unwrap();
            assert_eq!(parsed, selector);
        }
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        for bad in ["", "3D", "SYSTOLIC_FULL", "2D_FLAT", "FLATPARTIAL"] {
            assert!(matches!(
                bad.parse::<Selector>(),
                Err(TopologyError::UnknownSelector(_))
            ));
        }
    }
}
