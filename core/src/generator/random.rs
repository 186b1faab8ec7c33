use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Purely random scenario source: one agent, up to `residential` buildings,
/// and up to `mechs` rescue units sprinkled over otherwise empty ground.
/// Deterministic for a given seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomCityGenerator {
    seed: u64,
}

impl RandomCityGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ScenarioGenerator for RandomCityGenerator {
    fn generate(self, config: CityConfig) -> Scenario {
        use rand::prelude::*;

        let mut cells: Array2<Cell> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let agent = pick_free(&cells, &mut rng, |_, _| true)
            .expect("clamped config keeps at least one cell");
        cells[agent.to_nd_index()].agent = AgentStatus::Current;

        let mut placed = 0;
        while placed < config.residential {
            let Some(coords) = pick_free(&cells, &mut rng, |_, cell| {
                cell.kind == CellKind::Empty && cell.agent == AgentStatus::Untouched
            }) else {
                log::warn!(
                    "city full, placed {placed} of {} residential cells",
                    config.residential
                );
                break;
            };
            cells[coords.to_nd_index()].kind = CellKind::Residential;
            placed += 1;
        }

        let mut mechs: Vec<Mech> = Vec::new();
        while (mechs.len() as CellCount) < config.mechs {
            let Some(coords) = pick_free(&cells, &mut rng, |coords, cell| {
                cell.kind == CellKind::Empty
                    && cell.agent == AgentStatus::Untouched
                    && !mechs.iter().any(|mech| mech.start == coords)
            }) else {
                log::warn!("city full, placed {} of {} mechs", mechs.len(), config.mechs);
                break;
            };
            mechs.push(Mech { start: coords });
        }

        Scenario {
            grid: CityGrid::from_cells(cells),
            agent,
            mechs,
        }
    }
}

/// Uniformly picks one cell satisfying `is_free`, or `None` when no cell does.
fn pick_free<F>(cells: &Array2<Cell>, rng: &mut rand::rngs::SmallRng, is_free: F) -> Option<Coord2>
where
    F: Fn(Coord2, &Cell) -> bool,
{
    use rand::prelude::*;

    let coords_of = |index: (usize, usize)| (index.0 as Coord, index.1 as Coord);
    let free = cells
        .indexed_iter()
        .filter(|&(index, cell)| is_free(coords_of(index), cell))
        .count();
    if free == 0 {
        return None;
    }

    let target = rng.random_range(0..free);
    cells
        .indexed_iter()
        .filter(|&(index, cell)| is_free(coords_of(index), cell))
        .nth(target)
        .map(|(index, _)| coords_of(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_residential(grid: &CityGrid) -> CellCount {
        let (height, width) = grid.size();
        (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .filter(|&coords| grid.kind_at(coords) == CellKind::Residential)
            .count() as CellCount
    }

    #[test]
    fn same_seed_reproduces_the_scenario() {
        let config = CityConfig::new((12, 9), 30, 3);

        let first = RandomCityGenerator::new(7).generate(config);
        let second = RandomCityGenerator::new(7).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn generated_scenario_is_well_formed() {
        let config = CityConfig::new((8, 8), 20, 4);
        let scenario = RandomCityGenerator::new(42).generate(config);

        assert_eq!(
            scenario.grid.cell_at(scenario.agent).agent,
            AgentStatus::Current
        );
        assert_eq!(scenario.grid.kind_at(scenario.agent), CellKind::Empty);
        assert_eq!(scenario.mechs.len(), 4);
        for mech in &scenario.mechs {
            assert_eq!(scenario.grid.kind_at(mech.start), CellKind::Empty);
            assert_ne!(mech.start, scenario.agent);
        }

        assert_eq!(count_residential(&scenario.grid), 20);
    }

    #[test]
    fn config_clamps_to_grid_capacity() {
        let config = CityConfig::new((2, 2), 100, 100);

        assert_eq!(config.size, (2, 2));
        assert_eq!(config.mechs, 3);
        assert_eq!(config.residential, 0);
    }

    #[test]
    fn overfull_request_stops_at_capacity() {
        let scenario =
            RandomCityGenerator::new(1).generate(CityConfig::new_unchecked((2, 2), 9, 0));

        // one cell stays with the agent, the other three become residential
        assert_eq!(count_residential(&scenario.grid), 3);
    }
}
