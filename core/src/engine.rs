use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Running,
    Intercepted,
    Exhausted,
}

impl EngineState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Intercepted | Self::Exhausted)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Running
    }
}

/// Drives one scenario to a terminal state: the agent advances one cell per
/// turn, the blast region follows it, and the frontier search extends the
/// mech arrival field until some cell inside the region has an arrival turn
/// at or below the current turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RampageEngine {
    grid: CityGrid,
    mechs: Vec<Mech>,
    agent: Coord2,
    next_target: Option<Coord2>,
    blast: BlastRegion,
    frontier: FrontierSearch,
    turn: Turn,
    destroyed_count: CellCount,
    state: EngineState,
}

impl RampageEngine {
    pub fn new(scenario: Scenario) -> Self {
        let Scenario { mut grid, agent, mechs } = scenario;

        let mut blast = BlastRegion::new(agent);
        blast.recompute(&grid, agent, true);
        let mut frontier = FrontierSearch::default();
        frontier.seed_mechs(&mut grid, &mechs);

        let mut engine = Self {
            grid,
            mechs,
            agent,
            next_target: None,
            blast,
            frontier,
            turn: 0,
            destroyed_count: 0,
            state: Default::default(),
        };
        engine.next_target = engine.next_target_for(engine.agent);
        engine
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn destroyed_count(&self) -> CellCount {
        self.destroyed_count
    }

    pub fn agent(&self) -> Coord2 {
        self.agent
    }

    pub fn mechs(&self) -> &[Mech] {
        &self.mechs
    }

    pub fn grid(&self) -> &CityGrid {
        &self.grid
    }

    pub fn blast(&self) -> &BlastRegion {
        &self.blast
    }

    /// The move the agent will take on the next turn, if any.
    pub fn next_target(&self) -> Option<Coord2> {
        self.next_target
    }

    /// Greedy direction scan from `pos` in fixed order: the first Untouched
    /// Residential neighbor wins immediately, otherwise the first Untouched
    /// neighbor of any kind.
    fn next_target_for(&self, pos: Coord2) -> Option<Coord2> {
        let mut first_untouched = None;
        for neighbor in self.grid.iter_neighbors(pos) {
            let cell = self.grid.cell_at(neighbor);
            if cell.agent != AgentStatus::Untouched {
                continue;
            }
            if cell.kind == CellKind::Residential {
                return Some(neighbor);
            }
            if first_untouched.is_none() {
                first_untouched = Some(neighbor);
            }
        }
        first_untouched
    }

    /// Moves the agent onto its pending target, updating visitation state and
    /// converting Residential terrain to Destroyed exactly once.
    fn apply_move(&mut self) -> MoveOutcome {
        let Some(target) = self.next_target else {
            return MoveOutcome::NoMove;
        };

        self.grid[self.agent].agent = AgentStatus::Visited;
        let cell = &mut self.grid[target];
        cell.agent = AgentStatus::Current;
        let outcome = if cell.kind == CellKind::Residential {
            cell.kind = CellKind::Destroyed;
            self.destroyed_count += 1;
            MoveOutcome::Demolished
        } else {
            MoveOutcome::Advanced
        };
        self.agent = target;
        outcome
    }

    /// Runs one turn: move, refresh the blast region, absorb a demolished
    /// cell into the frontier search, extend the search to the current turn,
    /// then check for interception.
    pub fn step(&mut self) -> Result<EngineState> {
        self.check_running()?;
        self.turn += 1;

        let outcome = self.apply_move();
        if !outcome.has_update() {
            self.state = EngineState::Exhausted;
            return Ok(self.state);
        }

        self.blast.recompute(&self.grid, self.agent, false);
        if outcome == MoveOutcome::Demolished {
            self.frontier.seed_destroyed(&mut self.grid, self.agent);
        }
        self.frontier.extend(&mut self.grid, self.turn);
        log::debug!(
            "turn {}: agent at {:?} ({outcome:?}), destroyed {}",
            self.turn,
            self.agent,
            self.destroyed_count
        );

        if self.mech_reaches_blast() {
            self.state = EngineState::Intercepted;
        } else {
            self.next_target = self.next_target_for(self.agent);
        }
        Ok(self.state)
    }

    /// Drives the simulation to a terminal state and returns the number of
    /// residential cells destroyed on the way.
    pub fn run(&mut self) -> CellCount {
        while self.state.is_running() {
            let _ = self.step().expect("running engine accepts steps");
        }
        self.destroyed_count
    }

    /// True when any cell inside the blast region holds an arrival record
    /// with turn number at or below the current turn.
    fn mech_reaches_blast(&self) -> bool {
        let (anchor_row, anchor_col) = self.blast.anchor();

        let (row_min, row_max) = self.blast.row_limits();
        for row in row_min..=row_max {
            if self.arrived_by_now((row, anchor_col)) {
                return true;
            }
        }

        let (col_min, col_max) = self.blast.col_limits();
        for col in col_min..=col_max {
            if self.arrived_by_now((anchor_row, col)) {
                return true;
            }
        }
        false
    }

    fn arrived_by_now(&self, coords: Coord2) -> bool {
        self.grid
            .arrival_at(coords)
            .is_some_and(|arrival| arrival.turn <= self.turn)
    }

    fn check_running(&self) -> Result<()> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(SimError::AlreadyEnded)
        }
    }
}
