use core::fmt;
use grid_util::grid::{SimpleValueGrid, ValueGrid};
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cell::{Cell, Connectivity, N_SMALLVEC_SIZE};
use crate::cost::{step_cost, Cost};
use crate::error::{PlannerError, Result};

/// Traversability state of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    Free,
    Occupied,
    /// Not yet observed. Treated as traversable until revealed otherwise.
    #[default]
    Unknown,
}

impl Occupancy {
    pub fn is_traversable(self) -> bool {
        self != Occupancy::Occupied
    }

    pub fn as_char(self) -> char {
        match self {
            Occupancy::Free => '.',
            Occupancy::Occupied => '#',
            Occupancy::Unknown => '?',
        }
    }
}

/// [OccupancyGrid] stores the [Occupancy] of every cell in a fixed-size rectangle together with
/// the connected components of its traversable cells, maintained in a [UnionFind] structure.
///
/// Occupancy only ever grows: the sole way to block a cell after construction is
/// [reveal](Self::reveal), and nothing turns an occupied cell back into a free one. Components
/// computed before a reveal therefore never claim two cells are disconnected when they are in
/// fact connected, which keeps [unreachable](Self::unreachable) sound while the components are dirty.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    cells: SimpleValueGrid<Occupancy>,
    connectivity: Connectivity,
    allow_corner_cutting: bool,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl OccupancyGrid {
    /// Creates a grid in which every cell is [Occupancy::Unknown].
    pub fn new(width: usize, height: usize, connectivity: Connectivity) -> Result<OccupancyGrid> {
        Self::with_default(width, height, connectivity, Occupancy::Unknown)
    }

    /// Creates a grid in which every cell starts out as `default_value`.
    pub fn with_default(
        width: usize,
        height: usize,
        connectivity: Connectivity,
        default_value: Occupancy,
    ) -> Result<OccupancyGrid> {
        if width == 0 || height == 0 {
            return Err(PlannerError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(PlannerError::InvalidConfiguration(format!(
                "grid dimensions {width}x{height} exceed the addressable range"
            )));
        }
        let mut grid = OccupancyGrid {
            cells: SimpleValueGrid::new(width, height, default_value),
            connectivity,
            allow_corner_cutting: true,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Builder toggle for corner cutting. When disabled, a diagonal move additionally requires
    /// both orthogonal cells it squeezes past to be traversable.
    pub fn with_corner_cutting(mut self, allow_corner_cutting: bool) -> OccupancyGrid {
        self.allow_corner_cutting = allow_corner_cutting;
        self.generate_components();
        self
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }
    pub fn height(&self) -> usize {
        self.cells.height()
    }
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }
    pub fn allow_corner_cutting(&self) -> bool {
        self.allow_corner_cutting
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        self.cells.index_in_bounds(cell.col, cell.row)
    }

    fn check_bounds(&self, cell: &Cell) -> Result<()> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(PlannerError::OutOfBounds {
                cell: *cell,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    fn ix(&self, cell: &Cell) -> usize {
        cell.row as usize * self.width() + cell.col as usize
    }

    pub fn occupancy(&self, cell: &Cell) -> Result<Occupancy> {
        self.check_bounds(cell)?;
        Ok(self.cells.get(cell.col, cell.row))
    }

    /// True iff the cell is in bounds and not occupied.
    pub fn is_traversable(&self, cell: &Cell) -> bool {
        self.in_bounds(cell) && self.cells.get(cell.col, cell.row).is_traversable()
    }

    /// The in-bounds cells adjacent to `cell`, in clockwise order starting north.
    pub fn neighbors(&self, cell: &Cell) -> SmallVec<[Cell; N_SMALLVEC_SIZE]> {
        cell.neighborhood(self.connectivity)
            .into_iter()
            .filter(|n| self.in_bounds(n))
            .collect()
    }

    /// Whether the vehicle may step from `from` onto the adjacent cell `to`.
    pub fn can_move(&self, from: &Cell, to: &Cell) -> bool {
        debug_assert!(from.chebyshev_distance(to) <= 1);
        if !self.is_traversable(to) {
            return false;
        }
        if self.allow_corner_cutting || !from.is_diagonal_to(to) {
            return true;
        }
        self.is_traversable(&Cell::new(from.row, to.col))
            && self.is_traversable(&Cell::new(to.row, from.col))
    }

    /// Neighbours that can be moved to, paired with the fixed-point cost of the move.
    pub fn successors(&self, cell: &Cell) -> SmallVec<[(Cell, Cost); N_SMALLVEC_SIZE]> {
        cell.neighborhood(self.connectivity)
            .into_iter()
            .filter(|n| self.can_move(cell, n))
            .filter_map(|n| step_cost(self.connectivity, cell, &n).ok().map(|c| (n, c)))
            .collect()
    }

    /// Marks a cell as occupied. Returns whether the occupancy changed; revealing an occupied
    /// cell again is a no-op. Flags the components as dirty since a component may have been
    /// broken apart.
    pub fn reveal(&mut self, cell: &Cell) -> Result<bool> {
        if self.occupancy(cell)? == Occupancy::Occupied {
            return Ok(false);
        }
        self.cells.set(cell.col, cell.row, Occupancy::Occupied);
        self.components_dirty = true;
        debug!("Revealed obstacle at {}", cell);
        Ok(true)
    }

    /// Records an unknown cell as known to be free. Occupied cells stay occupied.
    pub fn mark_free(&mut self, cell: &Cell) -> Result<bool> {
        if self.occupancy(cell)? != Occupancy::Unknown {
            return Ok(false);
        }
        // Unknown cells are already traversable, so components are unaffected.
        self.cells.set(cell.col, cell.row, Occupancy::Free);
        Ok(true)
    }

    /// All occupied cells in row-major order.
    pub fn occupied_cells(&self) -> Vec<Cell> {
        self.all_cells()
            .filter(|c| self.cells.get(c.col, c.row) == Occupancy::Occupied)
            .collect()
    }

    fn all_cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width() as i32;
        let height = self.height() as i32;
        (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }

    /// Retrieves the component id a given [Cell] belongs to.
    pub fn get_component(&self, cell: &Cell) -> Result<usize> {
        self.check_bounds(cell)?;
        Ok(self.components.find(self.ix(cell)))
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Cell, goal: &Cell) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are provably disconnected. Cells outside of the grid or
    /// occupied cells are unreachable.
    pub fn unreachable(&self, start: &Cell, goal: &Cell) -> bool {
        if self.is_traversable(start) && self.is_traversable(goal) {
            !self.components.equiv(self.ix(start), self.ix(goal))
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    pub fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.width() * self.height());
        // Links to the forward half of the neighbourhood are enough as moves are symmetric.
        let forward: &[(i32, i32)] = if self.connectivity.allows_diagonal() {
            &[(0, 1), (1, 1), (1, 0), (1, -1)]
        } else {
            &[(0, 1), (1, 0)]
        };
        for cell in self.all_cells().filter(|c| self.is_traversable(c)) {
            let cell_ix = self.ix(&cell);
            for &(d_row, d_col) in forward {
                let n = cell.offset(d_row, d_col);
                if self.can_move(&cell, &n) {
                    components.union(cell_ix, self.ix(&n));
                }
            }
        }
        self.components = components;
        self.components_dirty = false;
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.height() as i32 {
            let line = (0..self.width() as i32)
                .map(|col| self.cells.get(col, row).as_char())
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
