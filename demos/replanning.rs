use grid_replanner::{
    Cell, Connectivity, GroundTruthSensor, Mission, MissionConfig, MissionState,
};

// In this example a vehicle drives across a 7x7 grid with shape
//  _______
// |S      |
// |       |
// |  ###  |
// |  #    |
// |  #    |
// |       |
// |      E|
//  _______
// where
// - # marks an obstacle the vehicle only sees once it is next to it
// - S marks the start
// - E marks the end
//
// Nodes have an 8-neighborhood. Run with RUST_LOG=info to follow the state machine.

fn main() {
    env_logger::init();
    let hidden = [
        Cell::new(2, 2),
        Cell::new(2, 3),
        Cell::new(2, 4),
        Cell::new(3, 2),
        Cell::new(4, 2),
    ];
    let config = MissionConfig::new(7, 7, Cell::new(0, 0), Cell::new(6, 6))
        .with_connectivity(Connectivity::Eight);
    let mut mission = Mission::new(&config, GroundTruthSensor::new(hidden)).unwrap();

    let state = mission
        .run_with(100, |report, vehicle| {
            if report.from != report.to {
                println!("{} -> {} at {}", report.from, report.to, report.position);
            }
            if report.replanned {
                let remaining = vehicle.remaining.iter().map(|c| c.to_string());
                println!("New path: {}", remaining.collect::<Vec<_>>().join(" "));
            }
        })
        .unwrap();

    println!("{}", mission.grid());
    let vehicle = mission.vehicle();
    println!(
        "{} after {} moves and {} replans",
        state, vehicle.moves, vehicle.replans
    );
    if state == MissionState::Arrived {
        println!("Trajectory:");
        for cell in &vehicle.trajectory {
            println!("{}", cell);
        }
    }
}
