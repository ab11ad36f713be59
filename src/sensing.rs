//! Sensing collaborators consulted by the mission after every move.
use std::collections::BTreeSet;

use crate::cell::Cell;

/// Reports occupied cells around the vehicle. `radius` is a Chebyshev distance in cells.
///
/// Implementations are called synchronously once per step and should return quickly. Cells may
/// be reported more than once; revealing is idempotent.
pub trait Sensor {
    fn sense(&mut self, vehicle: Cell, radius: u32) -> Vec<Cell>;
}

impl<F> Sensor for F
where
    F: FnMut(Cell, u32) -> Vec<Cell>,
{
    fn sense(&mut self, vehicle: Cell, radius: u32) -> Vec<Cell> {
        self(vehicle, radius)
    }
}

/// Never detects anything. Suitable when the whole map is known up front.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlindSensor;

impl Sensor for BlindSensor {
    fn sense(&mut self, _: Cell, _: u32) -> Vec<Cell> {
        Vec::new()
    }
}

/// Simulation ground truth: a static set of obstacles, reported once they come within range.
#[derive(Clone, Debug, Default)]
pub struct GroundTruthSensor {
    obstacles: BTreeSet<Cell>,
}

impl GroundTruthSensor {
    pub fn new<I>(obstacles: I) -> GroundTruthSensor
    where
        I: IntoIterator<Item = Cell>,
    {
        GroundTruthSensor {
            obstacles: obstacles.into_iter().collect(),
        }
    }
}

impl Sensor for GroundTruthSensor {
    /// Obstacles within range in row-major order.
    fn sense(&mut self, vehicle: Cell, radius: u32) -> Vec<Cell> {
        let first_row = vehicle.row.saturating_sub_unsigned(radius);
        let last_row = vehicle.row.saturating_add_unsigned(radius);
        self.obstacles
            .range(Cell::new(first_row, i32::MIN)..)
            .take_while(|c| c.row <= last_row)
            .filter(|c| vehicle.chebyshev_distance(c) <= radius)
            .copied()
            .collect()
    }
}
