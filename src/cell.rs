use core::fmt;
use grid_util::point::Point;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Row/column offsets of the Moore neighbourhood, clockwise starting north.
/// Odd indices are the diagonals, even indices form the von Neumann neighbourhood.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Upper bound on the number of neighbours, used to size [SmallVec] buffers.
pub const N_SMALLVEC_SIZE: usize = 8;

/// Whether moves are restricted to the four cardinal directions or may also be diagonal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Four,
    Eight,
}

impl Connectivity {
    pub fn allows_diagonal(self) -> bool {
        self == Connectivity::Eight
    }
}

/// A discrete grid coordinate. Ordered row-major so that sets of cells iterate deterministically.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Cell {
        Cell { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Cell {
        Cell::new(self.row + d_row, self.col + d_col)
    }

    pub fn manhattan_distance(&self, other: &Cell) -> u64 {
        u64::from(self.row.abs_diff(other.row)) + u64::from(self.col.abs_diff(other.col))
    }

    /// Number of king moves between the cells, used as the sensing range metric.
    pub fn chebyshev_distance(&self, other: &Cell) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.col.abs_diff(other.col))
    }

    /// True if `other` is one move away under the given connectivity.
    pub fn is_adjacent(&self, other: &Cell, connectivity: Connectivity) -> bool {
        match connectivity {
            Connectivity::Four => self.manhattan_distance(other) == 1,
            Connectivity::Eight => self.chebyshev_distance(other) == 1,
        }
    }

    /// True if the move to `other` changes both row and column.
    pub fn is_diagonal_to(&self, other: &Cell) -> bool {
        self.row != other.row && self.col != other.col
    }

    /// All adjacent cells regardless of bounds, in clockwise order starting north.
    pub fn neighborhood(&self, connectivity: Connectivity) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        let step = if connectivity.allows_diagonal() { 1 } else { 2 };
        MOORE_OFFSETS
            .iter()
            .step_by(step)
            .map(|&(d_row, d_col)| self.offset(d_row, d_col))
            .collect()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Cell {
        Cell::new(row, col)
    }
}

// Columns run along x and rows along y in the underlying storage grid.
impl From<Cell> for Point {
    fn from(cell: Cell) -> Point {
        Point::new(cell.col, cell.row)
    }
}

impl From<Point> for Cell {
    fn from(point: Point) -> Cell {
        Cell::new(point.y, point.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_order() {
        let c = Cell::new(2, 2);
        assert_eq!(
            c.neighborhood(Connectivity::Four).as_slice(),
            &[
                Cell::new(1, 2),
                Cell::new(2, 3),
                Cell::new(3, 2),
                Cell::new(2, 1)
            ]
        );
        let moore = c.neighborhood(Connectivity::Eight);
        assert_eq!(moore.len(), 8);
        assert_eq!(moore[1], Cell::new(1, 3));
        assert!(moore.iter().all(|n| n.chebyshev_distance(&c) == 1));
    }

    #[test]
    fn adjacency() {
        let a = Cell::new(0, 0);
        assert!(a.is_adjacent(&Cell::new(0, 1), Connectivity::Four));
        assert!(!a.is_adjacent(&Cell::new(1, 1), Connectivity::Four));
        assert!(a.is_adjacent(&Cell::new(1, 1), Connectivity::Eight));
        assert!(!a.is_adjacent(&a, Connectivity::Eight));
        assert!(!a.is_adjacent(&Cell::new(0, 2), Connectivity::Eight));
    }

    #[test]
    fn distances_at_extreme_coordinates() {
        let low = Cell::new(i32::MIN, i32::MIN);
        let high = Cell::new(i32::MAX, 0);
        assert_eq!(low.chebyshev_distance(&high), u32::MAX);
        assert_eq!(
            low.manhattan_distance(&high),
            u64::from(u32::MAX) + u64::from(i32::MIN.unsigned_abs())
        );
        assert!(!low.is_adjacent(&high, Connectivity::Four));
        assert!(!low.is_adjacent(&high, Connectivity::Eight));
    }

    #[test]
    fn point_conversion() {
        let c = Cell::new(3, 7);
        let p: Point = c.into();
        assert_eq!((p.x, p.y), (7, 3));
        assert_eq!(Cell::from(p), c);
    }
}
