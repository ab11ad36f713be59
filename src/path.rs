use itertools::Itertools;

use crate::cell::{Cell, Connectivity};
use crate::cost::{convert_cost_to_unit_cost_float, step_cost, Cost};
use crate::error::Result;
use crate::occupancy_grid::OccupancyGrid;

/// An ordered sequence of adjacent cells from a start to a goal, together with its cost.
/// Produced fresh by every search and never edited afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<Cell>,
    cost: Cost,
}

impl Path {
    pub(crate) fn new(cells: Vec<Cell>, cost: Cost) -> Path {
        Path { cells, cost }
    }

    /// Builds a path from explicit cells, failing with `InvalidEdge` on the first pair of
    /// cells that are not adjacent under `connectivity`.
    pub fn from_cells(cells: Vec<Cell>, connectivity: Connectivity) -> Result<Path> {
        let cost = path_cost(&cells, connectivity)?;
        Ok(Path { cells, cost })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    /// Number of cells, start and goal included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn start(&self) -> Option<&Cell> {
        self.cells.first()
    }
    pub fn goal(&self) -> Option<&Cell> {
        self.cells.last()
    }
    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Total cost in unit costs, where a cardinal move costs 1.0.
    pub fn cost(&self) -> f64 {
        convert_cost_to_unit_cost_float(self.cost)
    }
    /// Total cost in fixed-point units.
    pub fn cost_units(&self) -> Cost {
        self.cost
    }

    /// True if the path is contiguous under the grid's connectivity and every move is allowed
    /// by the grid's current occupancy.
    pub fn is_valid(&self, grid: &OccupancyGrid) -> bool {
        is_valid_route(&self.cells, grid)
    }

    /// The start, the goal and every cell at which the direction of travel changes.
    /// Useful for renderers drawing the path as line segments.
    pub fn waypoints(&self) -> Vec<Cell> {
        if self.cells.len() <= 2 {
            return self.cells.clone();
        }
        let direction = |a: &Cell, b: &Cell| (b.row - a.row, b.col - a.col);
        let mut waypoints = vec![self.cells[0]];
        waypoints.extend(
            self.cells
                .iter()
                .tuple_windows()
                .filter(|&(a, b, c)| direction(a, b) != direction(b, c))
                .map(|(_, b, _)| *b),
        );
        waypoints.extend(self.cells.last().copied());
        waypoints
    }
}

/// Fixed-point cost of walking `cells` in order.
pub fn path_cost(cells: &[Cell], connectivity: Connectivity) -> Result<Cost> {
    cells
        .iter()
        .tuple_windows()
        .map(|(a, b)| step_cost(connectivity, a, b))
        .sum()
}

/// Checks that every cell of `cells` is traversable and every consecutive move is allowed.
pub fn is_valid_route(cells: &[Cell], grid: &OccupancyGrid) -> bool {
    cells.iter().all(|c| grid.is_traversable(c))
        && cells
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.is_adjacent(b, grid.connectivity()) && grid.can_move(a, b))
}
