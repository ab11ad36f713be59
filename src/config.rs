//! Mission construction input.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Connectivity};
use crate::error::{PlannerError, Result};
use crate::occupancy_grid::OccupancyGrid;

mod defaults {
    pub fn enabled() -> bool {
        true
    }
    pub fn sensor_radius() -> u32 {
        1
    }
}

/// Everything needed to set up a mission: the world, the endpoints and the sensor range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,

    /// 4- or 8-connected moves
    #[serde(default)]
    pub connectivity: Connectivity,

    /// Allow diagonal moves that squeeze past an occupied corner. When disabled, revealing
    /// either corner cell of a planned diagonal move blocks the path and triggers a replan,
    /// even though the revealed cell itself is not on the path.
    #[serde(default = "defaults::enabled")]
    pub allow_corner_cutting: bool,

    pub start: Cell,
    pub goal: Cell,

    /// Cells known to be occupied before the mission starts
    #[serde(default)]
    pub obstacles: Vec<Cell>,

    /// Sensing range in cells (Chebyshev distance, at least 1)
    #[serde(default = "defaults::sensor_radius")]
    pub sensor_radius: u32,
}

impl MissionConfig {
    pub fn new(width: usize, height: usize, start: Cell, goal: Cell) -> MissionConfig {
        MissionConfig {
            width,
            height,
            connectivity: Connectivity::default(),
            allow_corner_cutting: defaults::enabled(),
            start,
            goal,
            obstacles: Vec::new(),
            sensor_radius: defaults::sensor_radius(),
        }
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> MissionConfig {
        self.connectivity = connectivity;
        self
    }

    pub fn with_corner_cutting(mut self, allow_corner_cutting: bool) -> MissionConfig {
        self.allow_corner_cutting = allow_corner_cutting;
        self
    }

    pub fn with_obstacles<I>(mut self, obstacles: I) -> MissionConfig
    where
        I: IntoIterator<Item = Cell>,
    {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn with_sensor_radius(mut self, sensor_radius: u32) -> MissionConfig {
        self.sensor_radius = sensor_radius;
        self
    }

    /// Checks the configuration without building anything.
    pub fn validate(&self) -> Result<()> {
        self.build_grid().map(|_| ())
    }

    /// Builds the initial grid: every configured obstacle occupied, the start cell free and
    /// everything else unknown.
    pub fn build_grid(&self) -> Result<OccupancyGrid> {
        if self.sensor_radius == 0 {
            return Err(PlannerError::InvalidConfiguration(
                "sensor radius must be at least one cell".to_owned(),
            ));
        }
        let mut grid = OccupancyGrid::new(self.width, self.height, self.connectivity)?
            .with_corner_cutting(self.allow_corner_cutting);
        grid.occupancy(&self.start)?;
        grid.occupancy(&self.goal)?;
        for obstacle in &self.obstacles {
            if *obstacle == self.start || *obstacle == self.goal {
                let role = if *obstacle == self.start { "start" } else { "goal" };
                return Err(PlannerError::InvalidConfiguration(format!(
                    "{role} cell {obstacle} is occupied"
                )));
            }
            grid.reveal(obstacle)?;
        }
        grid.mark_free(&self.start)?;
        grid.update();
        debug!(
            "Built {}x{} grid with {} known obstacles",
            self.width,
            self.height,
            self.obstacles.len()
        );
        Ok(grid)
    }
}
