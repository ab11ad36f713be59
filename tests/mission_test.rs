use grid_replanner::{
    find_path, Cell, Connectivity, GroundTruthSensor, Mission, MissionConfig, MissionState,
    OccupancyGrid, PlannerError, Sensor, StepReport,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
    coords.iter().map(|&c| Cell::from(c)).collect()
}

/// Runs the mission to completion and returns the state transitions that happened.
fn transitions<S: Sensor>(mission: &mut Mission<S>) -> Vec<(MissionState, MissionState)> {
    let mut seen = Vec::new();
    let state = mission
        .run_with(200, |report: &StepReport, vehicle| {
            assert_eq!(report.to, vehicle.state);
            if report.from != report.to {
                seen.push((report.from, report.to));
            }
        })
        .unwrap();
    assert!(state.is_terminal());
    seen
}

#[test]
fn empty_grid_four_connected() {
    init();
    let grid = OccupancyGrid::new(5, 5, Connectivity::Four).unwrap();
    let path = find_path(&grid, Cell::new(0, 0), Cell::new(4, 4)).unwrap();
    assert_eq!(path.len(), 9);
    assert_eq!(path.cost(), 8.0);
    assert!(path.is_valid(&grid));
}

#[test]
fn full_wall_is_not_found() {
    init();
    let mut grid = OccupancyGrid::new(5, 5, Connectivity::Four).unwrap();
    for col in 0..5 {
        grid.reveal(&Cell::new(2, col)).unwrap();
    }
    assert_eq!(
        find_path(&grid, Cell::new(0, 0), Cell::new(4, 4)),
        Err(PlannerError::NotFound {
            start: Cell::new(0, 0),
            goal: Cell::new(4, 4)
        })
    );

    let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4))
        .with_obstacles((0..5).map(|col| Cell::new(2, col)));
    let mut mission = Mission::new(&config, GroundTruthSensor::default()).unwrap();
    assert_eq!(
        transitions(&mut mission),
        vec![(MissionState::Planning, MissionState::Failed)]
    );
    assert_eq!(mission.vehicle().moves, 0);
}

#[test]
fn enclosed_goal_is_not_found() {
    init();
    let mut grid = OccupancyGrid::new(7, 7, Connectivity::Eight).unwrap();
    for cell in Cell::new(4, 4).neighborhood(Connectivity::Eight) {
        grid.reveal(&cell).unwrap();
    }
    let result = find_path(&grid, Cell::new(0, 0), Cell::new(4, 4));
    assert!(result.unwrap_err().is_not_found());
}

/// The obstacle at (2, 2) only becomes visible from (1, 1), where it blocks the diagonal plan.
#[test]
fn obstacle_revealed_on_path_triggers_one_replan() {
    init();
    let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4))
        .with_connectivity(Connectivity::Eight);
    let sensor = GroundTruthSensor::new([Cell::new(2, 2)]);
    let mut mission = Mission::new(&config, sensor).unwrap();

    let report = mission.step().unwrap();
    assert_eq!(report.to, MissionState::Advancing);
    assert!(report.revealed.is_empty());
    assert_eq!(
        mission.path().unwrap().cells(),
        cells(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]).as_slice()
    );

    let report = mission.step().unwrap();
    assert_eq!(report.position, Cell::new(1, 1));
    assert_eq!(report.revealed, vec![Cell::new(2, 2)]);
    assert_eq!(report.to, MissionState::Blocked);
    assert_eq!(mission.vehicle().replans, 0);

    let report = mission.step().unwrap();
    assert_eq!(
        (report.from, report.to),
        (MissionState::Blocked, MissionState::Advancing)
    );
    assert!(report.replanned);
    assert_eq!(report.position, Cell::new(1, 1));
    assert_eq!(mission.vehicle().replans, 1);
    let replanned = mission.path().unwrap();
    assert_eq!(replanned.start(), Some(&Cell::new(1, 1)));
    assert!(replanned.is_valid(mission.grid()));
    assert!(!replanned.contains(&Cell::new(2, 2)));

    assert_eq!(
        transitions(&mut mission),
        vec![(MissionState::Advancing, MissionState::Arrived)]
    );
    let vehicle = mission.vehicle();
    assert_eq!(vehicle.position, Cell::new(4, 4));
    assert_eq!(vehicle.replans, 1);
    assert!(vehicle.remaining.is_empty());
    assert!(!vehicle.trajectory.contains(&Cell::new(2, 2)));
    assert_eq!(vehicle.trajectory.len(), vehicle.moves + 1);
}

#[test]
fn obstacle_revealed_on_path_four_connected() {
    init();
    // Equal-cost ties go to the first discovered cell, so the plan runs along row 0 and then
    // down column 4. (0, 2) shows up once the vehicle stands on (0, 1).
    let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4));
    let sensor = GroundTruthSensor::new([Cell::new(0, 2)]);
    let mut mission = Mission::new(&config, sensor).unwrap();
    mission.step().unwrap();
    assert_eq!(
        mission.path().unwrap().cells(),
        cells(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 4)
        ])
        .as_slice()
    );
    assert_eq!(
        transitions(&mut mission),
        vec![
            (MissionState::Advancing, MissionState::Blocked),
            (MissionState::Blocked, MissionState::Advancing),
            (MissionState::Advancing, MissionState::Arrived),
        ]
    );
    assert_eq!(mission.vehicle().replans, 1);
    assert_eq!(mission.vehicle().moves, 8);
}

#[test]
fn obstacle_off_path_does_not_replan() {
    init();
    let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4))
        .with_connectivity(Connectivity::Eight)
        .with_sensor_radius(2);
    let sensor = GroundTruthSensor::new([Cell::new(0, 3), Cell::new(3, 1), Cell::new(4, 0)]);
    let mut mission = Mission::new(&config, sensor).unwrap();
    let mut revealed = Vec::new();
    let state = mission
        .run_with(100, |report, _| revealed.extend(report.revealed.iter().copied()))
        .unwrap();
    assert_eq!(state, MissionState::Arrived);
    revealed.sort();
    assert_eq!(revealed, cells(&[(0, 3), (3, 1), (4, 0)]));
    assert_eq!(mission.vehicle().replans, 0);
    assert_eq!(
        mission.vehicle().trajectory,
        cells(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)])
    );
}

#[test]
fn goal_revealed_occupied_fails() {
    init();
    let config = MissionConfig::new(4, 1, Cell::new(0, 0), Cell::new(0, 3));
    let sensor = GroundTruthSensor::new([Cell::new(0, 3)]);
    let mut mission = Mission::new(&config, sensor).unwrap();
    assert_eq!(
        transitions(&mut mission),
        vec![
            (MissionState::Planning, MissionState::Advancing),
            (MissionState::Advancing, MissionState::Blocked),
            (MissionState::Blocked, MissionState::Failed),
        ]
    );
    assert_eq!(mission.vehicle().position, Cell::new(0, 2));
    assert_eq!(mission.vehicle().replans, 0);
    assert!(mission.vehicle().remaining.is_empty());
    // Terminal states stay put.
    let report = mission.step().unwrap();
    assert_eq!(report.to, MissionState::Failed);
    assert_eq!(report.position, Cell::new(0, 2));
}

/// A corridor that closes behind every detour forces repeated replans, each producing a valid path.
#[test]
fn repeated_replans_keep_paths_valid() {
    init();
    let hidden = cells(&[(0, 3), (1, 5), (2, 3), (3, 5), (4, 3), (5, 5)]);
    let config = MissionConfig::new(9, 7, Cell::new(3, 0), Cell::new(3, 8));
    let mut mission = Mission::new(&config, GroundTruthSensor::new(hidden.clone())).unwrap();
    let mut replans = 0;
    let state = mission
        .run_with(500, |report, vehicle| {
            if report.replanned {
                replans += 1;
            }
            assert!(!hidden.contains(&vehicle.position));
            assert_eq!(vehicle.replans, replans);
        })
        .unwrap();
    assert_eq!(state, MissionState::Arrived);
    assert!(mission.vehicle().replans >= 1);
    let occupied = mission.grid().occupied_cells();
    assert!(occupied.contains(&Cell::new(3, 5)));
    assert!(occupied.iter().all(|cell| hidden.contains(cell)));
}

#[test]
fn missions_are_independent() {
    init();
    let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4))
        .with_connectivity(Connectivity::Eight);
    let mut blocked = Mission::new(&config, GroundTruthSensor::new([Cell::new(2, 2)])).unwrap();
    let mut clear = Mission::new(&config, GroundTruthSensor::default()).unwrap();
    assert_eq!(blocked.run(100).unwrap(), MissionState::Arrived);
    assert_eq!(clear.run(100).unwrap(), MissionState::Arrived);
    assert_eq!(blocked.vehicle().replans, 1);
    assert_eq!(clear.vehicle().replans, 0);
    assert!(clear.grid().occupied_cells().is_empty());
}

#[test]
fn run_respects_step_budget() {
    init();
    let config = MissionConfig::new(10, 1, Cell::new(0, 0), Cell::new(0, 9));
    let mut mission = Mission::new(&config, GroundTruthSensor::default()).unwrap();
    assert_eq!(mission.run(3).unwrap(), MissionState::Advancing);
    assert_eq!(mission.vehicle().position, Cell::new(0, 2));
    assert_eq!(mission.vehicle().remaining.len(), 7);
    assert_eq!(mission.run(100).unwrap(), MissionState::Arrived);
}

#[test]
fn out_of_bounds_sensor_reading_stops_the_mission() {
    init();
    let config = MissionConfig::new(4, 1, Cell::new(0, 0), Cell::new(0, 3));
    let sensor = |vehicle: Cell, _: u32| {
        if vehicle == Cell::new(0, 1) {
            vec![Cell::new(0, 2), Cell::new(-1, 0)]
        } else {
            Vec::new()
        }
    };
    let mut mission = Mission::new(&config, sensor).unwrap();
    assert_eq!(mission.step().unwrap().to, MissionState::Advancing);

    let err = mission.step().unwrap_err();
    assert!(matches!(err, PlannerError::OutOfBounds { .. }));
    assert_eq!(mission.fault(), Some(&err));
    // The valid reading that came first is not revealed either.
    assert!(mission.grid().occupied_cells().is_empty());
    assert_eq!(mission.vehicle().position, Cell::new(0, 1));
    assert_eq!(mission.vehicle().moves, 1);

    // The mission refuses to move any further.
    assert_eq!(mission.step(), Err(err.clone()));
    assert_eq!(mission.run(10), Err(err));
    assert_eq!(mission.vehicle().position, Cell::new(0, 1));
    assert_eq!(mission.vehicle().moves, 1);
}

/// Without corner cutting, revealing a corner next to a planned diagonal move blocks that move
/// even though the revealed cell is not on the path.
#[test]
fn corner_reveal_replans_without_corner_cutting() {
    init();
    let config = MissionConfig::new(5, 5, Cell::new(0, 0), Cell::new(4, 4))
        .with_connectivity(Connectivity::Eight);
    let hidden = [Cell::new(2, 1)];

    let mut cutting = Mission::new(&config, GroundTruthSensor::new(hidden)).unwrap();
    assert_eq!(cutting.run(100).unwrap(), MissionState::Arrived);
    assert_eq!(cutting.vehicle().replans, 0);
    assert_eq!(
        cutting.vehicle().trajectory,
        cells(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)])
    );

    let config = config.with_corner_cutting(false);
    let mut mission = Mission::new(&config, GroundTruthSensor::new(hidden)).unwrap();
    mission.step().unwrap();
    assert!(!mission.path().unwrap().contains(&Cell::new(2, 1)));
    let report = mission.step().unwrap();
    assert_eq!(report.position, Cell::new(1, 1));
    assert_eq!(report.revealed, hidden.to_vec());
    assert_eq!(report.to, MissionState::Blocked);
    assert_eq!(
        transitions(&mut mission),
        vec![
            (MissionState::Blocked, MissionState::Advancing),
            (MissionState::Advancing, MissionState::Arrived),
        ]
    );
    assert_eq!(mission.vehicle().replans, 1);
    let trajectory = &mission.vehicle().trajectory;
    assert!(trajectory
        .windows(2)
        .all(|w| mission.grid().can_move(&w[0], &w[1])));
}
