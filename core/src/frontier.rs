use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// Which mech first reaches a cell, at which turn, and from where. Once a
/// cell holds a record its turn number never increases; it is only replaced
/// by a strictly smaller one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub mech: usize,
    pub turn: Turn,
    pub prev: Option<Coord2>,
}

/// Re-entrant multi-source breadth-first search over the grid, seeded by all
/// mech start cells. Residential cells are impassable until destroyed; cells
/// destroyed mid-simulation are absorbed as new sources via
/// [`FrontierSearch::seed_destroyed`]. The explicit queue lets the search
/// pause at a turn bound and resume later without restarting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontierSearch {
    queue: VecDeque<Coord2>,
}

impl FrontierSearch {
    /// Seeds one turn-0 source per mech. Where two mechs share a start cell
    /// the lower index wins, matching decode encounter order.
    pub fn seed_mechs(&mut self, grid: &mut CityGrid, mechs: &[Mech]) {
        for (mech, unit) in mechs.iter().enumerate() {
            let cell = &mut grid[unit.start];
            if cell.arrival.is_none() {
                cell.arrival = Some(Arrival {
                    mech,
                    turn: 0,
                    prev: None,
                });
                self.queue.push_back(unit.start);
            }
        }
    }

    /// Pops and expands queued cells while the front's recorded turn is below
    /// `max_turn`, then stops, leaving the rest queued for a later call with
    /// a larger bound.
    pub fn extend(&mut self, grid: &mut CityGrid, max_turn: Turn) {
        while let Some(&cell) = self.queue.front() {
            let arrival = grid
                .arrival_at(cell)
                .expect("queued cell must hold an arrival record");
            if arrival.turn >= max_turn {
                break;
            }
            self.queue.pop_front();

            let next_turn = arrival.turn + 1;
            for neighbor in grid.iter_neighbors(cell) {
                if !grid.kind_at(neighbor).is_passable() {
                    continue;
                }
                let improves = grid
                    .arrival_at(neighbor)
                    .is_none_or(|existing| existing.turn > next_turn);
                if improves {
                    grid[neighbor].arrival = Some(Arrival {
                        mech: arrival.mech,
                        turn: next_turn,
                        prev: Some(cell),
                    });
                    self.queue.push_back(neighbor);
                }
            }
        }
    }

    /// Absorbs a newly destroyed (now passable) cell: if any neighbor already
    /// holds an arrival record, the cell becomes a fresh source one turn
    /// later, carrying that neighbor's mech. Ties prefer the earliest turn,
    /// then scan order.
    pub fn seed_destroyed(&mut self, grid: &mut CityGrid, pos: Coord2) {
        let mut best: Option<Arrival> = None;
        for neighbor in grid.iter_neighbors(pos) {
            let Some(adjacent) = grid.arrival_at(neighbor) else {
                continue;
            };
            let candidate = Arrival {
                mech: adjacent.mech,
                turn: adjacent.turn + 1,
                prev: Some(neighbor),
            };
            if best.is_none_or(|held| candidate.turn < held.turn) {
                best = Some(candidate);
            }
        }

        let Some(candidate) = best else {
            return;
        };
        let improves = grid
            .arrival_at(pos)
            .is_none_or(|existing| existing.turn > candidate.turn);
        if improves {
            grid[pos].arrival = Some(candidate);
            self.queue.push_back(pos);
            log::trace!("frontier reseeded at {pos:?}, turn {}", candidate.turn);
        }
    }
}
