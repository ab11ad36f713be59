use log::{debug, warn};
use smallvec::SmallVec;

use crate::astar::astar;
use crate::cell::{Cell, N_SMALLVEC_SIZE};
use crate::cost::Cost;
use crate::error::{PlannerError, Result};
use crate::occupancy_grid::OccupancyGrid;
use crate::path::{path_cost, Path};

pub mod astar;
pub mod dijkstra;

/// A search engine over an [OccupancyGrid]. The grid is only ever borrowed immutably, so one
/// grid can serve any number of searches.
pub trait GridSolver {
    /// Fixed-point estimate of the remaining cost. Must be admissible and consistent.
    fn heuristic(&self, grid: &OccupancyGrid, from: &Cell, goal: &Cell) -> Cost;

    fn successors(
        &self,
        grid: &OccupancyGrid,
        node: &Cell,
    ) -> SmallVec<[(Cell, Cost); N_SMALLVEC_SIZE]> {
        grid.successors(node)
    }

    fn get_path_cost(&self, cells: &[Cell], grid: &OccupancyGrid) -> Result<Cost> {
        path_cost(cells, grid.connectivity())
    }

    /// Computes a minimal-cost path from start to goal. Fails with `OutOfBounds` if either lies
    /// outside the grid and with `NotFound` if the goal cannot be reached with the occupancy
    /// known at the time of the call.
    fn find_path(&self, grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<Path> {
        grid.occupancy(&start)?;
        grid.occupancy(&goal)?;
        let not_found = PlannerError::NotFound { start, goal };
        // Check if start and goal are on the same connected component.
        if grid.unreachable(&start, &goal) {
            debug!("{} is not reachable from {}", goal, start);
            return Err(not_found);
        }
        debug!("{} is reachable from {}, computing path", goal, start);
        match astar(
            &start,
            |node| self.successors(grid, node),
            |node| self.heuristic(grid, node, &goal),
            |node| *node == goal,
        ) {
            Some((cells, cost)) => Ok(Path::new(cells, cost)),
            None => {
                // Dirty components may still link cells that a reveal has separated.
                if !grid.components_dirty() {
                    warn!("Reachable goal could not be pathed to, is reachable graph correct?");
                }
                Err(not_found)
            }
        }
    }
}

/// Runs the default [AstarSolver](astar::AstarSolver) on the grid.
pub fn find_path(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Result<Path> {
    astar::AstarSolver::new().find_path(grid, start, goal)
}
