use thiserror::Error;

use crate::types::Coord;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Unknown scenario symbol {0:?}")]
    UnknownSymbol(char),
    #[error("Grid shape does not match declared size {expected:?}")]
    SizeMismatch { expected: (Coord, Coord) },
    #[error("Scenario has no agent start marker")]
    MissingAgent,
    #[error("Scenario has more than one agent start marker")]
    DuplicateAgent,
    #[error("Simulation already ended, no new turns are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, SimError>;
