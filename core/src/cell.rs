use serde::{Deserialize, Serialize};

use crate::*;

/// Terrain of a single grid cell. `Residential` becomes `Destroyed` at most
/// once, when the agent steps onto the cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Residential,
    Destroyed,
}

impl CellKind {
    /// Residential cells block the frontier search until destroyed.
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Residential)
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty
    }
}

/// Agent visitation state. Exactly one cell is `Current` at any time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Untouched,
    Current,
    Visited,
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self::Untouched
    }
}

/// One grid position's state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub agent: AgentStatus,
    pub arrival: Option<Arrival>,
}

/// One character of the scenario alphabet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    Terrain(CellKind),
    Agent,
    Mech,
}

impl Symbol {
    pub const fn to_char(self) -> char {
        match self {
            Self::Terrain(CellKind::Empty) => '.',
            Self::Terrain(CellKind::Residential) => 'R',
            Self::Terrain(CellKind::Destroyed) => 'X',
            Self::Agent => 'G',
            Self::Mech => 'M',
        }
    }
}

impl TryFrom<char> for Symbol {
    type Error = SimError;

    fn try_from(symbol: char) -> Result<Self> {
        match symbol {
            '.' => Ok(Self::Terrain(CellKind::Empty)),
            'R' => Ok(Self::Terrain(CellKind::Residential)),
            'X' => Ok(Self::Terrain(CellKind::Destroyed)),
            'G' => Ok(Self::Agent),
            'M' => Ok(Self::Mech),
            _ => Err(SimError::UnknownSymbol(symbol)),
        }
    }
}
