use thiserror::Error;

use crate::cell::Cell;

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors surfaced by the grid, the cost policy, the solvers and mission construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// A cell outside of the grid was referenced.
    #[error("cell {cell} is outside of the {width}x{height} grid")]
    OutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },
    /// A cost was requested for two cells that are not neighbours.
    #[error("no edge between {from} and {to}")]
    InvalidEdge { from: Cell, to: Cell },
    /// The search exhausted its frontier without reaching the goal.
    #[error("no path from {start} to {goal}")]
    NotFound { start: Cell, goal: Cell },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl PlannerError {
    /// Unreachable goals are an expected outcome rather than a defect.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlannerError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlannerError::OutOfBounds {
            cell: Cell::new(5, -1),
            width: 5,
            height: 5,
        };
        assert_eq!(err.to_string(), "cell (5, -1) is outside of the 5x5 grid");
        let err = PlannerError::NotFound {
            start: Cell::new(0, 0),
            goal: Cell::new(4, 4),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no path from (0, 0) to (4, 4)");
    }
}
