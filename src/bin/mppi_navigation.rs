// MPPI waypoint navigation demo
//
// Drives a unicycle robot around a cyclic waypoint circuit on a static
// occupancy map, executing the first action of each tick's best sequence
// (receding horizon), then plots the driven path.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, PointSymbol};
use nalgebra::Vector3;

use mppi_nav::{MotionModel, MppiConfig, MppiPlanner, OccupancyGrid, Point2D, Unicycle};

const MAX_TICKS: usize = 400;
const SHOW_ANIMATION: bool = true;

fn build_map() -> OccupancyGrid {
    let mut map = OccupancyGrid::new(-8.0, -8.0, 8.0, 8.0, 0.25).unwrap();
    // Two wall segments inside the circuit
    map.occupy_segment(Point2D::new(-0.5, 1.0), Point2D::new(2.0, 1.0));
    map.occupy_segment(Point2D::new(1.5, -2.0), Point2D::new(1.5, 0.5));
    map
}

fn main() {
    println!("MPPI waypoint navigation start!!");

    let waypoints = vec![
        Point2D::new(-3.0, 0.0),
        Point2D::new(-2.0, 4.0),
        Point2D::new(4.0, 1.0),
        Point2D::new(-3.0, 0.0),
    ];

    let map = build_map();
    let obstacles = map.occupied_points();
    let model = Unicycle::default();

    let config = MppiConfig {
        num_rollouts: 100,
        horizon: 20,
        num_iterations: 20,
        lambda: 10.0,
        ..Default::default()
    };

    let mut planner = MppiPlanner::new(model.clone(), map, waypoints.clone(), config).unwrap();

    let mut state = Vector3::new(0.0, 0.0, 0.0);
    let mut h_x = vec![state[0]];
    let mut h_y = vec![state[1]];
    let mut reached = 0;

    for tick in 0..MAX_TICKS {
        let solution = planner.plan(state);
        state = model.step(&state, &solution.first_action().to_vector());
        h_x.push(state[0]);
        h_y.push(state[1]);

        if planner.waypoints_reached() > reached {
            reached = planner.waypoints_reached();
            let next = planner.current_waypoint();
            println!(
                "Tick {}: waypoint {} reached, heading for ({:.1}, {:.1})",
                tick, reached, next.x, next.y
            );
        }
        if reached >= waypoints.len() {
            println!("Circuit complete at tick {}!", tick);
            break;
        }
    }

    if SHOW_ANIMATION {
        let wp_x: Vec<f64> = waypoints.iter().map(|p| p.x).collect();
        let wp_y: Vec<f64> = waypoints.iter().map(|p| p.y).collect();
        let ob_x: Vec<f64> = obstacles.iter().map(|p| p.x).collect();
        let ob_y: Vec<f64> = obstacles.iter().map(|p| p.y).collect();

        let mut fg = Figure::new();
        fg.axes2d()
            .set_x_label("x [m]", &[])
            .set_y_label("y [m]", &[])
            .set_aspect_ratio(AutoOption::Fix(1.0))
            .points(&ob_x, &ob_y, &[Caption("Obstacles"), Color("black"), PointSymbol('S')])
            .points(&wp_x, &wp_y, &[Caption("Waypoints"), Color("red"), PointSymbol('O')])
            .lines(&h_x, &h_y, &[Caption("Driven path"), Color("#35C788")]);

        std::fs::create_dir_all("img").unwrap();
        let output_path = "img/mppi_navigation.png";
        fg.save_to_png(output_path, 800, 600).unwrap();
        println!("Plot saved to: {}", output_path);
    }

    println!("MPPI waypoint navigation completed!");
}
