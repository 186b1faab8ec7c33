use serde::{Deserialize, Serialize};

use crate::*;

/// Cross-shaped blast region anchored at the agent's current cell: an
/// inclusive row interval along the anchor's column plus an inclusive column
/// interval along the anchor's row. Each arm ends at the first Residential
/// cell in that direction (inclusive) or at the grid edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastRegion {
    anchor: Coord2,
    rows: (Coord, Coord),
    cols: (Coord, Coord),
}

impl BlastRegion {
    pub fn new(anchor: Coord2) -> Self {
        Self {
            anchor,
            rows: (anchor.0, anchor.0),
            cols: (anchor.1, anchor.1),
        }
    }

    pub fn anchor(&self) -> Coord2 {
        self.anchor
    }

    /// Inclusive row interval along the anchor's column.
    pub fn row_limits(&self) -> (Coord, Coord) {
        self.rows
    }

    /// Inclusive column interval along the anchor's row.
    pub fn col_limits(&self) -> (Coord, Coord) {
        self.cols
    }

    /// Refreshes the four directional limits relative to `pos`.
    ///
    /// A retained limit stays valid only while that direction's scan line is
    /// unchanged: moving one cell along an axis invalidates the limits behind
    /// the move direction and both limits of the other axis, never the limit
    /// the agent moved away from. `forced` rescans all four directions and is
    /// required once at simulation start.
    pub fn recompute(&mut self, grid: &CityGrid, pos: Coord2, forced: bool) {
        let (row, col) = pos;
        let (prev_row, prev_col) = self.anchor;

        if forced || row < prev_row || col != prev_col {
            self.rows.0 = scan_up(grid, pos);
        }
        if forced || row > prev_row || col != prev_col {
            self.rows.1 = scan_down(grid, pos);
        }
        if forced || col < prev_col || row != prev_row {
            self.cols.0 = scan_left(grid, pos);
        }
        if forced || col > prev_col || row != prev_row {
            self.cols.1 = scan_right(grid, pos);
        }

        self.anchor = pos;
    }

    /// Cross membership: `coords` must share the anchor's column and fall
    /// within the row limits, or share the anchor's row and fall within the
    /// column limits.
    pub fn contains(&self, coords: Coord2) -> bool {
        let (row, col) = coords;
        (col == self.anchor.1 && self.rows.0 <= row && row <= self.rows.1)
            || (row == self.anchor.0 && self.cols.0 <= col && col <= self.cols.1)
    }
}

fn scan_up(grid: &CityGrid, (row, col): Coord2) -> Coord {
    let mut limit = row;
    for next in (0..row).rev() {
        limit = next;
        if grid.kind_at((next, col)) == CellKind::Residential {
            break;
        }
    }
    limit
}

fn scan_down(grid: &CityGrid, (row, col): Coord2) -> Coord {
    let mut limit = row;
    for next in row + 1..grid.height() {
        limit = next;
        if grid.kind_at((next, col)) == CellKind::Residential {
            break;
        }
    }
    limit
}

fn scan_left(grid: &CityGrid, (row, col): Coord2) -> Coord {
    let mut limit = col;
    for next in (0..col).rev() {
        limit = next;
        if grid.kind_at((row, next)) == CellKind::Residential {
            break;
        }
    }
    limit
}

fn scan_right(grid: &CityGrid, (row, col): Coord2) -> Coord {
    let mut limit = col;
    for next in col + 1..grid.width() {
        limit = next;
        if grid.kind_at((row, next)) == CellKind::Residential {
            break;
        }
    }
    limit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(rows: &[&str]) -> Scenario {
        let width = rows[0].len() as Coord;
        let height = rows.len() as Coord;
        Scenario::decode(width, height, rows.iter().copied()).unwrap()
    }

    fn region(scenario: &Scenario) -> BlastRegion {
        let mut blast = BlastRegion::new(scenario.agent);
        blast.recompute(&scenario.grid, scenario.agent, true);
        blast
    }

    #[test]
    fn limits_stop_at_first_residential_inclusive() {
        let scenario = city(&[
            ".R...", //
            ".....",
            "RG..R",
            ".....",
            ".R...",
        ]);

        let blast = region(&scenario);

        assert_eq!(blast.anchor(), (2, 1));
        assert_eq!(blast.row_limits(), (0, 4));
        assert_eq!(blast.col_limits(), (0, 4));
    }

    #[test]
    fn limits_reach_grid_edges_without_residential() {
        let scenario = city(&[
            "...", //
            ".G.",
            "...",
        ]);

        let blast = region(&scenario);

        assert_eq!(blast.row_limits(), (0, 2));
        assert_eq!(blast.col_limits(), (0, 2));
    }

    #[test]
    fn membership_is_a_cross_not_a_rectangle() {
        let scenario = city(&[
            ".R...", //
            ".....",
            "RG..R",
            ".....",
            ".R...",
        ]);

        let blast = region(&scenario);

        assert!(blast.contains((2, 1)));
        assert!(blast.contains((0, 1)));
        assert!(blast.contains((2, 4)));
        assert!(!blast.contains((0, 0)));
        assert!(!blast.contains((4, 4)));
    }

    #[test]
    fn incremental_recompute_matches_forced_after_one_cell_move() {
        let scenario = city(&[
            ".R...", //
            ".....",
            "RG..R",
            ".....",
            ".R...",
        ]);
        let mut incremental = region(&scenario);

        incremental.recompute(&scenario.grid, (1, 1), false);

        let mut forced = BlastRegion::new((1, 1));
        forced.recompute(&scenario.grid, (1, 1), true);
        assert_eq!(incremental, forced);
    }

    #[test]
    fn incremental_recompute_sees_destroyed_bound() {
        let mut scenario = city(&[
            ".R.", //
            ".G.",
            "...",
        ]);
        let mut blast = region(&scenario);
        assert_eq!(blast.row_limits(), (0, 2));

        // the agent steps up onto the residential bound, destroying it
        scenario.grid[(0, 1)].kind = CellKind::Destroyed;
        blast.recompute(&scenario.grid, (0, 1), false);

        let mut forced = BlastRegion::new((0, 1));
        forced.recompute(&scenario.grid, (0, 1), true);
        assert_eq!(blast, forced);
        assert_eq!(blast.row_limits(), (0, 2));
        assert_eq!(blast.col_limits(), (0, 2));
    }
}
