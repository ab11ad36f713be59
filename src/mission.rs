//! The replanning controller: drives a single vehicle along its planned path, reveals obstacles
//! reported by the sensor and searches again whenever the remaining path becomes blocked.
use core::fmt;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::iter;

use crate::cell::Cell;
use crate::config::MissionConfig;
use crate::error::{PlannerError, Result};
use crate::occupancy_grid::{Occupancy, OccupancyGrid};
use crate::path::{is_valid_route, Path};
use crate::sensing::Sensor;
use crate::solver::{astar::AstarSolver, GridSolver};

/// States of the mission state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionState {
    /// Initial search from the start to the goal.
    Planning,
    /// Following the current path one cell per step.
    Advancing,
    /// The remaining path crosses a revealed obstacle and must be replaced.
    Blocked,
    Arrived,
    /// The goal cannot be reached given the obstacles known so far.
    Failed,
}

impl MissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionState::Arrived | MissionState::Failed)
    }

    pub fn name(self) -> &'static str {
        match self {
            MissionState::Planning => "Planning",
            MissionState::Advancing => "Advancing",
            MissionState::Blocked => "Blocked",
            MissionState::Arrived => "Arrived",
            MissionState::Failed => "Failed",
        }
    }
}

impl fmt::Display for MissionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a renderer needs to draw the vehicle and its plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleState {
    pub position: Cell,
    pub goal: Cell,
    /// Cells still to be visited, excluding the current position.
    pub remaining: VecDeque<Cell>,
    pub state: MissionState,
    /// Number of searches triggered by a blocked path. The initial search is not counted.
    pub replans: usize,
    /// Number of cells moved so far.
    pub moves: usize,
    /// Every cell occupied so far, starting with the start cell.
    pub trajectory: Vec<Cell>,
}

impl VehicleState {
    fn new(start: Cell, goal: Cell) -> VehicleState {
        VehicleState {
            position: start,
            goal,
            remaining: VecDeque::new(),
            state: MissionState::Planning,
            replans: 0,
            moves: 0,
            trajectory: vec![start],
        }
    }
}

/// Outcome of a single [Mission::step].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub from: MissionState,
    pub to: MissionState,
    pub position: Cell,
    /// Cells that turned occupied during this step.
    pub revealed: Vec<Cell>,
    pub replanned: bool,
}

/// A single vehicle mission. Owns its grid exclusively; independent missions share nothing.
#[derive(Clone, Debug)]
pub struct Mission<S, P = AstarSolver> {
    grid: OccupancyGrid,
    solver: P,
    sensor: S,
    sensor_radius: u32,
    vehicle: VehicleState,
    path: Option<Path>,
    /// Set by the first failing step. A faulted mission refuses to move again.
    fault: Option<PlannerError>,
}

impl<S: Sensor> Mission<S> {
    /// Sets up a mission planned with [AstarSolver].
    pub fn new(config: &MissionConfig, sensor: S) -> Result<Mission<S>> {
        Mission::with_solver(config, sensor, AstarSolver::new())
    }
}

impl<S: Sensor, P: GridSolver> Mission<S, P> {
    pub fn with_solver(config: &MissionConfig, sensor: S, solver: P) -> Result<Mission<S, P>> {
        let grid = config.build_grid()?;
        Mission::from_grid(
            grid,
            config.start,
            config.goal,
            config.sensor_radius,
            sensor,
            solver,
        )
    }

    /// Sets up a mission on a prepared grid, recording the start cell as free. Fails if either
    /// endpoint is out of bounds or occupied, or if the sensor radius is zero.
    pub fn from_grid(
        mut grid: OccupancyGrid,
        start: Cell,
        goal: Cell,
        sensor_radius: u32,
        sensor: S,
        solver: P,
    ) -> Result<Mission<S, P>> {
        if sensor_radius == 0 {
            return Err(PlannerError::InvalidConfiguration(
                "sensor radius must be at least one cell".to_owned(),
            ));
        }
        for (role, cell) in [("start", start), ("goal", goal)] {
            if grid.occupancy(&cell)? == Occupancy::Occupied {
                return Err(PlannerError::InvalidConfiguration(format!(
                    "{role} cell {cell} is occupied"
                )));
            }
        }
        grid.mark_free(&start)?;
        Ok(Mission {
            grid,
            solver,
            sensor,
            sensor_radius,
            vehicle: VehicleState::new(start, goal),
            path: None,
            fault: None,
        })
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }
    pub fn state(&self) -> MissionState {
        self.vehicle.state
    }
    /// The most recently planned path, from the cell the search started at.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }
    pub fn sensor_radius(&self) -> u32 {
        self.sensor_radius
    }
    /// The error that stopped the mission, if any.
    pub fn fault(&self) -> Option<&PlannerError> {
        self.fault.as_ref()
    }

    /// Advances the state machine by one transition. Sensing, revealing and validating the
    /// remaining path all complete before the step returns. Terminal states are left unchanged.
    ///
    /// Errors are fatal: once a step has failed, every later step returns the same error.
    pub fn step(&mut self) -> Result<StepReport> {
        if let Some(err) = &self.fault {
            return Err(err.clone());
        }
        let from = self.vehicle.state;
        let mut revealed = Vec::new();
        let mut replanned = false;
        let to = match self.transition(from, &mut revealed, &mut replanned) {
            Ok(to) => to,
            Err(err) => {
                error!("Mission stopped at {}: {}", self.vehicle.position, err);
                self.fault = Some(err.clone());
                return Err(err);
            }
        };
        if to != from {
            info!("{} -> {} at {}", from, to, self.vehicle.position);
        }
        self.vehicle.state = to;
        Ok(StepReport {
            from,
            to,
            position: self.vehicle.position,
            revealed,
            replanned,
        })
    }

    fn transition(
        &mut self,
        from: MissionState,
        revealed: &mut Vec<Cell>,
        replanned: &mut bool,
    ) -> Result<MissionState> {
        Ok(match from {
            MissionState::Planning => {
                *revealed = self.sense()?;
                self.plan()?
            }
            MissionState::Advancing => self.advance(revealed)?,
            MissionState::Blocked => {
                let to = self.plan()?;
                if to == MissionState::Advancing {
                    self.vehicle.replans += 1;
                    *replanned = true;
                    info!(
                        "Replanned from {} ({} replans so far)",
                        self.vehicle.position, self.vehicle.replans
                    );
                }
                to
            }
            MissionState::Arrived | MissionState::Failed => from,
        })
    }

    /// Steps until the mission reaches a terminal state or `max_steps` transitions have run.
    pub fn run(&mut self, max_steps: usize) -> Result<MissionState> {
        self.run_with(max_steps, |_, _| {})
    }

    /// Like [run](Self::run), handing every step to `observer` as it happens.
    pub fn run_with<F>(&mut self, max_steps: usize, mut observer: F) -> Result<MissionState>
    where
        F: FnMut(&StepReport, &VehicleState),
    {
        for _ in 0..max_steps {
            if self.vehicle.state.is_terminal() {
                break;
            }
            let report = self.step()?;
            observer(&report, &self.vehicle);
        }
        Ok(self.vehicle.state)
    }

    /// Queries the sensor at the current position and reveals what it reports. Returns the
    /// cells whose occupancy changed. Nothing is revealed unless every reading is in bounds.
    fn sense(&mut self) -> Result<Vec<Cell>> {
        let position = self.vehicle.position;
        let mut readings = self.sensor.sense(position, self.sensor_radius);
        readings.retain(|cell| {
            if *cell == position {
                warn!(
                    "Sensor reported the vehicle's own cell {} as occupied, ignoring",
                    cell
                );
            }
            *cell != position
        });
        for cell in &readings {
            self.grid.occupancy(cell)?;
        }
        let mut revealed = Vec::new();
        for cell in readings {
            if self.grid.reveal(&cell)? {
                revealed.push(cell);
            }
        }
        if !revealed.is_empty() {
            debug!("Revealed {} new obstacles around {}", revealed.len(), position);
        }
        Ok(revealed)
    }

    /// Searches from the current position to the goal and installs the result as the
    /// remaining path.
    fn plan(&mut self) -> Result<MissionState> {
        self.grid.update();
        match self
            .solver
            .find_path(&self.grid, self.vehicle.position, self.vehicle.goal)
        {
            Ok(path) => {
                debug!("Planned {} cells with cost {:.3}", path.len(), path.cost());
                self.vehicle.remaining = path.cells().iter().skip(1).copied().collect();
                self.path = Some(path);
                Ok(MissionState::Advancing)
            }
            Err(err) if err.is_not_found() => {
                info!("{}", err);
                self.vehicle.remaining.clear();
                self.path = None;
                Ok(MissionState::Failed)
            }
            Err(err) => Err(err),
        }
    }

    fn advance(&mut self, revealed: &mut Vec<Cell>) -> Result<MissionState> {
        let position = self.vehicle.position;
        let Some(next) = self.vehicle.remaining.pop_front() else {
            return Ok(if position == self.vehicle.goal {
                MissionState::Arrived
            } else {
                MissionState::Blocked
            });
        };
        if !self.grid.can_move(&position, &next) {
            self.vehicle.remaining.push_front(next);
            return Ok(MissionState::Blocked);
        }
        self.vehicle.position = next;
        self.vehicle.moves += 1;
        self.vehicle.trajectory.push(next);

        *revealed = self.sense()?;
        if !revealed.is_empty() && !self.remaining_is_valid() {
            debug!("Remaining path from {} is blocked", next);
            return Ok(MissionState::Blocked);
        }
        if self.vehicle.remaining.is_empty() && next == self.vehicle.goal {
            Ok(MissionState::Arrived)
        } else {
            Ok(MissionState::Advancing)
        }
    }

    fn remaining_is_valid(&self) -> bool {
        let route = iter::once(self.vehicle.position)
            .chain(self.vehicle.remaining.iter().copied())
            .collect::<Vec<_>>();
        is_valid_route(&route, &self.grid)
    }
}
