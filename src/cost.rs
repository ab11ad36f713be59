//! Edge costs and heuristics. Search runs on fixed-point integer costs so that the frontier is
//! totally ordered; [edge_cost] and [heuristic] expose the same values as unit floats.
use crate::cell::{Cell, Connectivity};
use crate::error::{PlannerError, Result};

/// Fixed-point path cost.
pub type Cost = i64;

/// Cost of a cardinal (straight) move.
pub const C: Cost = 985;
/// Cost of a diagonal move. `D / C` approximates sqrt(2) to within 4e-7.
pub const D: Cost = 1393;
/// Helper constant for the octile distance.
pub const E: Cost = 2 * C - D;

/// Converts the integer cost to an approximate floating point equivalent where cardinal directions have cost 1.0.
pub fn convert_cost_to_unit_cost_float(cost: Cost) -> f64 {
    (cost as f64) / (C as f64)
}

/// Fixed-point cost of moving between two adjacent cells.
pub fn step_cost(connectivity: Connectivity, from: &Cell, to: &Cell) -> Result<Cost> {
    if !from.is_adjacent(to, connectivity) {
        return Err(PlannerError::InvalidEdge {
            from: *from,
            to: *to,
        });
    }
    Ok(if from.is_diagonal_to(to) { D } else { C })
}

/// Fixed-point lower bound on the cost from `from` to `to`: Manhattan distance on a 4-grid,
/// octile distance on an 8-grid.
pub fn distance_estimate(connectivity: Connectivity, from: &Cell, to: &Cell) -> Cost {
    let delta_row = Cost::from(from.row.abs_diff(to.row));
    let delta_col = Cost::from(from.col.abs_diff(to.col));
    match connectivity {
        // Formula from https://github.com/riscy/a_star_on_grids
        // to efficiently compute the cost of a path taking the maximal amount
        // of diagonal steps before going straight
        Connectivity::Eight => (E * (delta_row - delta_col).abs() + D * (delta_row + delta_col)) / 2,
        Connectivity::Four => (delta_row + delta_col) * C,
    }
}

/// 1 for orthogonal moves, sqrt(2) for diagonal moves.
pub fn edge_cost(connectivity: Connectivity, from: &Cell, to: &Cell) -> Result<f64> {
    step_cost(connectivity, from, to)?;
    Ok(if from.is_diagonal_to(to) {
        std::f64::consts::SQRT_2
    } else {
        1.0
    })
}

/// Admissible and consistent estimate of the remaining cost to `goal` in unit costs.
pub fn heuristic(connectivity: Connectivity, cell: &Cell, goal: &Cell) -> f64 {
    let delta_row = f64::from(cell.row.abs_diff(goal.row));
    let delta_col = f64::from(cell.col.abs_diff(goal.col));
    match connectivity {
        Connectivity::Eight => {
            let (short, long) = if delta_row < delta_col {
                (delta_row, delta_col)
            } else {
                (delta_col, delta_row)
            };
            short * std::f64::consts::SQRT_2 + (long - short)
        }
        Connectivity::Four => delta_row + delta_col,
    }
}
