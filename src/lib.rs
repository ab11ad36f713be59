//! # grid_replanner
//!
//! Grid-based path planning for a single vehicle that discovers obstacles as it drives.
//! Paths are computed with [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on a
//! 4- or 8-connected [OccupancyGrid] using fixed-point costs (diagonal moves cost sqrt(2)) and an
//! admissible, consistent heuristic. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flood-filling behaviour if no path exists.
//!
//! A [Mission] advances the vehicle one cell per step, asks a [Sensor] for obstacles around its
//! new position and searches again from where it stands whenever a revealed obstacle blocks the
//! rest of its path.
//!
//! ```
//! use grid_replanner::{Cell, Connectivity, GroundTruthSensor, Mission, MissionConfig, MissionState};
//!
//! let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4))
//!     .with_connectivity(Connectivity::Eight);
//! let sensor = GroundTruthSensor::new([Cell::new(2, 2)]);
//! let mut mission = Mission::new(&config, sensor).unwrap();
//! assert_eq!(mission.run(100).unwrap(), MissionState::Arrived);
//! assert_eq!(mission.vehicle().replans, 1);
//! ```
pub mod astar;
pub mod cell;
pub mod config;
pub mod cost;
pub mod error;
pub mod mission;
pub mod occupancy_grid;
pub mod path;
pub mod sensing;
pub mod solver;

pub use cell::{Cell, Connectivity};
pub use config::MissionConfig;
pub use cost::{edge_cost, heuristic, Cost};
pub use error::{PlannerError, Result};
pub use mission::{Mission, MissionState, StepReport, VehicleState};
pub use occupancy_grid::{Occupancy, OccupancyGrid};
pub use path::Path;
pub use sensing::{BlindSensor, GroundTruthSensor, Sensor};
pub use solver::{astar::AstarSolver, dijkstra::DijkstraSolver, find_path, GridSolver};
