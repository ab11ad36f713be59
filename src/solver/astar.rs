use crate::{
    cell::Cell,
    cost::{distance_estimate, Cost},
    occupancy_grid::OccupancyGrid,
    solver::GridSolver,
};

/// A* guided by the Manhattan distance on 4-grids and the octile distance on 8-grids.
#[derive(Clone, Copy, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }
}

impl GridSolver for AstarSolver {
    fn heuristic(&self, grid: &OccupancyGrid, from: &Cell, goal: &Cell) -> Cost {
        distance_estimate(grid.connectivity(), from, goal)
    }
}
