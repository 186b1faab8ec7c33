#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use blast::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use frontier::*;
pub use generator::*;
pub use types::*;

mod blast;
mod cell;
mod engine;
mod error;
mod frontier;
mod generator;
mod types;

/// Shape of a generated scenario: grid size plus how many residential cells
/// and mechs to place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    pub size: Coord2,
    pub residential: CellCount,
    pub mechs: CellCount,
}

impl CityConfig {
    pub const fn new_unchecked(size: Coord2, residential: CellCount, mechs: CellCount) -> Self {
        Self {
            size,
            residential,
            mechs,
        }
    }

    /// Clamps the request to what the grid can hold, reserving one cell for
    /// the agent.
    pub fn new((height, width): Coord2, residential: CellCount, mechs: CellCount) -> Self {
        let height = height.clamp(1, Coord::MAX);
        let width = width.clamp(1, Coord::MAX);
        let mechs = mechs.min(mult(height, width) - 1);
        let residential = residential.min(mult(height, width) - 1 - mechs);
        Self::new_unchecked((height, width), residential, mechs)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Dense city grid shared by the agent controller, the blast-region tracker,
/// and the frontier search. All three mutate cell state in place through the
/// engine; nothing holds a copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityGrid {
    cells: Array2<Cell>,
}

impl CityGrid {
    pub fn from_cells(cells: Array2<Cell>) -> Self {
        Self { cells }
    }

    /// Grid size as `(height, width)`, matching `(row, col)` coordinates.
    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(SimError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn kind_at(&self, coords: Coord2) -> CellKind {
        self.cell_at(coords).kind
    }

    pub fn arrival_at(&self, coords: Coord2) -> Option<Arrival> {
        self.cell_at(coords).arrival
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Number of cells whose terrain ended up `Destroyed`.
    pub fn destroyed_cells(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.kind == CellKind::Destroyed)
            .count()
            .try_into()
            .unwrap()
    }
}

impl Index<Coord2> for CityGrid {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

impl IndexMut<Coord2> for CityGrid {
    fn index_mut(&mut self, (row, col): Coord2) -> &mut Self::Output {
        &mut self.cells[(row as usize, col as usize)]
    }
}

/// One rescue unit. Identity is the index in `Scenario::mechs`, assigned in
/// decode encounter order. Mechs never move; the frontier search owns the
/// arrival-time field they would walk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mech {
    pub start: Coord2,
}

/// Fully decoded scenario: grid terrain, agent start, mech starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub grid: CityGrid,
    pub agent: Coord2,
    pub mechs: Vec<Mech>,
}

impl Scenario {
    /// Decodes `height` rows of `width` symbols into a scenario. Fails fast on
    /// shape mismatches, unknown symbols, and missing or repeated agent
    /// markers; the simulation never runs on a partially decoded grid.
    pub fn decode<'a, I>(width: Coord, height: Coord, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let expected = (width, height);
        let mut cells: Array2<Cell> = Array2::default((height, width).to_nd_index());
        let mut agent = None;
        let mut mechs = Vec::new();

        let mut row_count: Coord = 0;
        for (row, line) in rows.into_iter().enumerate() {
            if row_count >= height {
                return Err(SimError::SizeMismatch { expected });
            }
            row_count += 1;

            let mut col_count: Coord = 0;
            for (col, symbol) in line.chars().enumerate() {
                if col_count >= width {
                    return Err(SimError::SizeMismatch { expected });
                }
                col_count += 1;

                let coords = (row as Coord, col as Coord);
                let cell = &mut cells[coords.to_nd_index()];
                match Symbol::try_from(symbol)? {
                    Symbol::Terrain(kind) => cell.kind = kind,
                    Symbol::Agent => {
                        if agent.replace(coords).is_some() {
                            return Err(SimError::DuplicateAgent);
                        }
                        cell.agent = AgentStatus::Current;
                    }
                    Symbol::Mech => mechs.push(Mech { start: coords }),
                }
            }

            if col_count != width {
                return Err(SimError::SizeMismatch { expected });
            }
        }

        if row_count != height {
            return Err(SimError::SizeMismatch { expected });
        }

        Ok(Self {
            grid: CityGrid::from_cells(cells),
            agent: agent.ok_or(SimError::MissingAgent)?,
            mechs,
        })
    }
}

/// Outcome of applying one agent move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    NoMove,
    Advanced,
    Demolished,
}

impl MoveOutcome {
    /// Whether this outcome changed any grid state.
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoMove => false,
            Advanced => true,
            Demolished => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_maps_symbols_and_markers() {
        let scenario = Scenario::decode(3, 2, ["G.R", "MX."]).unwrap();

        assert_eq!(scenario.agent, (0, 0));
        assert_eq!(scenario.mechs, [Mech { start: (1, 0) }]);
        assert_eq!(scenario.grid.kind_at((0, 0)), CellKind::Empty);
        assert_eq!(scenario.grid.kind_at((0, 2)), CellKind::Residential);
        assert_eq!(scenario.grid.kind_at((1, 0)), CellKind::Empty);
        assert_eq!(scenario.grid.kind_at((1, 1)), CellKind::Destroyed);
        assert_eq!(scenario.grid.cell_at((0, 0)).agent, AgentStatus::Current);
        assert_eq!(scenario.grid.cell_at((1, 0)).agent, AgentStatus::Untouched);
    }

    #[test]
    fn decode_rejects_shape_mismatch() {
        assert_eq!(
            Scenario::decode(3, 2, ["G..", ".."]),
            Err(SimError::SizeMismatch { expected: (3, 2) })
        );
        assert_eq!(
            Scenario::decode(2, 1, ["G.."]),
            Err(SimError::SizeMismatch { expected: (2, 1) })
        );
        assert_eq!(
            Scenario::decode(2, 2, ["G."]),
            Err(SimError::SizeMismatch { expected: (2, 2) })
        );
    }

    #[test]
    fn decode_requires_exactly_one_agent() {
        assert_eq!(
            Scenario::decode(2, 1, [".."]),
            Err(SimError::MissingAgent)
        );
        assert_eq!(
            Scenario::decode(2, 1, ["GG"]),
            Err(SimError::DuplicateAgent)
        );
    }

    #[test]
    fn validate_coords_bounds_the_grid() {
        let scenario = Scenario::decode(3, 2, ["G..", "..."]).unwrap();

        assert_eq!(scenario.grid.validate_coords((1, 2)), Ok((1, 2)));
        assert_eq!(
            scenario.grid.validate_coords((2, 0)),
            Err(SimError::InvalidCoords)
        );
    }

    #[test]
    fn decode_rejects_unknown_symbols() {
        assert_eq!(
            Scenario::decode(2, 1, ["G?"]),
            Err(SimError::UnknownSymbol('?'))
        );
    }
}
