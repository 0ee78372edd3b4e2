// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Neuron roles and their human-readable names.

Names take the form `<Tag>[<row>][<col>]`. Memory roles append the layer
digit to the tag (`Mem_I0[3][4]`). In systolic layouts the second index is
the lane rather than a grid column.
*/

use crate::error::TopologyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The part a neuron plays in the count → core → border circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Pass-through for the injected occupancy bit
    Input,
    /// Fires when at least `min_pts - 1` neighbours are active
    Count,
    /// AND of own input and dense count
    Core,
    /// Intermediate "has a core neighbour" detector
    Border,
    /// Active, non-core, with a core neighbour
    BorderOutput,
    /// Input activity delayed by `layer + 1` frames
    MemInput(u32),
    /// Core activity delayed by `layer + 1` frames
    MemCore(u32),
}

impl Role {
    /// Tag used in neuron names
    pub fn tag(&self) -> String {
        match self {
            Role::Input => "I".to_string(),
            Role::Count => "C".to_string(),
            Role::Core => "Core".to_string(),
            Role::Border => "B".to_string(),
            Role::BorderOutput => "Border".to_string(),
            Role::MemInput(k) => format!("Mem_I{}", k),
            Role::MemCore(k) => format!("Mem_Core{}", k),
        }
    }

    /// Roles whose spikes label cells in the decoded output
    pub fn is_labelling(&self) -> bool {
        matches!(self, Role::Core | Role::BorderOutput)
    }

    fn from_tag(tag: &str) -> Option<Role> {
        let role = match tag {
            "I" => Role::Input,
            "C" => Role::Count,
            "Core" => Role::Core,
            "B" => Role::Border,
            "Border" => Role::BorderOutput,
            _ => {
                if let Some(k) = tag.strip_prefix("Mem_Core") {
                    Role::MemCore(k.parse().ok()?)
                } else if let Some(k) = tag.strip_prefix("Mem_I") {
                    Role::MemInput(k.parse().ok()?)
                } else {
                    return None;
                }
            }
        };
        Some(role)
    }
}

/// Role plus physical position, as written by `SETNAME`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeuronName {
    pub role: Role,
    pub row: usize,
    pub col: usize,
}

impl NeuronName {
    pub fn new(role: Role, row: usize, col: usize) -> Self {
        Self { role, row, col }
    }
}

impl fmt::Display for NeuronName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}][{}]", self.role.tag(), self.row, self.col)
    }
}

impl FromStr for NeuronName {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TopologyError::Internal(format!("malformed neuron name: {}", s));

        let open = s.find('[').ok_or_else(bad)?;
        let role = Role::from_tag(&s[..open]).ok_or_else(bad)?;
        let rest = &s[open..];

        let mut indices = Vec::with_capacity(2);
        for part in rest.split_terminator(']') {
            let digits = part.strip_prefix('[').ok_or_else(bad)?;
            indices.push(digits.parse::<usize>().map_err(|_| bad())?);
        }
        if indices.len() != 2 || !rest.ends_with(']') {
            return Err(bad());
        }

        Ok(NeuronName::new(role, indices[0], indices[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rendering() {
        assert_eq!(NeuronName::new(Role::Input, 0, 7).to_string(), "I[0][7]");
        assert_eq!(
            NeuronName::new(Role::BorderOutput, 2, 3).to_string(),
            "Border[2][3]"
        );
        assert_eq!(
            NeuronName::new(Role::MemInput(0), 3, 4).to_string(),
            "Mem_I0[3][4]"
        );
        assert_eq!(
            NeuronName::new(Role::MemCore(11), 1, 2).to_string(),
            "Mem_Core11[1][2]"
        );
    }

    #[test]
    fn test_name_parsing() {
        for role in [
            Role::Input,
            Role::Count,
            Role::Core,
            Role::Border,
            Role::BorderOutput,
            Role::MemInput(2),
            Role::MemCore(0),
        ] {
            let name = NeuronName::new(role, 12, 5);
            assert_eq!(name.to_string().parse::<NeuronName>().unwrap(), name);
        }
    }

    #[test]
    fn test_malformed_names_rejected() {
        for bad in ["Core", "Core[1]", "Core[1][2][3]", "X[1][2]", "Core[a][2]", "Mem_I[1][2]"] {
            assert!(bad.parse::<NeuronName>().is_err(), "{bad}");
        }
    }
}
