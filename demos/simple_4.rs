use grid_replanner::{find_path, Cell, Connectivity, Occupancy, OccupancyGrid};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    env_logger::init();
    let mut grid = OccupancyGrid::with_default(3, 3, Connectivity::Four, Occupancy::Free).unwrap();
    grid.reveal(&Cell::new(1, 1)).unwrap();
    grid.update();
    println!("{}", grid);
    let start = Cell::new(0, 0);
    let end = Cell::new(2, 2);
    let path = find_path(&grid, start, end).unwrap();
    println!("Path with cost {}:", path.cost());
    for cell in path.cells() {
        println!("{}", cell);
    }
}
