//! mppi_nav - MPPI waypoint navigation for mobile robots
//!
//! This crate implements a sampling-based receding-horizon trajectory
//! optimizer (Model Predictive Path Integral control) that drives a
//! mobile robot through a cyclic waypoint sequence on a known static
//! occupancy map.

// Core modules
pub mod common;

// Collaborator implementations
pub mod motion;
pub mod mapping;

// The MPPI optimizer
pub mod planning;

// Re-export common types for convenience
pub use common::{ActionSequence, ControlInput, Point2D, StateTrajectory};
pub use common::{MotionModel, ObstacleMap};
pub use common::{NavError, NavResult};
pub use mapping::OccupancyGrid;
pub use motion::Unicycle;
pub use planning::{MppiConfig, MppiPlanner, MppiSolution, TrajectoryScorer, WaypointRoute};
