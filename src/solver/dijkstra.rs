use crate::{cell::Cell, cost::Cost, occupancy_grid::OccupancyGrid, solver::GridSolver};

/// Uniform-cost search. Expands far more nodes than A* but needs no heuristic, which makes it
/// a useful reference for optimal costs.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn heuristic(&self, _: &OccupancyGrid, _: &Cell, _: &Cell) -> Cost {
        0
    }
}
