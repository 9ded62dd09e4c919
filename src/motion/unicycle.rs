//! Unicycle kinematic model
//!
//! State is `(x, y, yaw)`, action is `(v, omega)`. This is the model the
//! MPPI planner is exercised with throughout the crate, but the planner
//! itself only depends on the `MotionModel` trait.

use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

use crate::common::{MotionModel, NavError, NavResult, Point2D};

/// Unicycle model with forward-Euler integration
#[derive(Debug, Clone)]
pub struct Unicycle {
    dt: f64,
    action_low: Vector2<f64>,
    action_high: Vector2<f64>,
}

impl Unicycle {
    /// Create a model with the default action limits
    /// (v in [-1, 2] m/s, omega in [-pi, pi] rad/s)
    pub fn new(dt: f64) -> NavResult<Self> {
        Self::with_bounds(dt, Vector2::new(-1.0, -PI), Vector2::new(2.0, PI))
    }

    pub fn with_bounds(
        dt: f64,
        action_low: Vector2<f64>,
        action_high: Vector2<f64>,
    ) -> NavResult<Self> {
        if dt <= 0.0 {
            return Err(NavError::InvalidParameter(format!(
                "dt must be positive, got {}",
                dt
            )));
        }
        if action_low[0] > action_high[0] || action_low[1] > action_high[1] {
            return Err(NavError::InvalidParameter(
                "action lower bound exceeds upper bound".to_string(),
            ));
        }
        Ok(Unicycle {
            dt,
            action_low,
            action_high,
        })
    }
}

impl Default for Unicycle {
    fn default() -> Self {
        Unicycle {
            dt: 0.1,
            action_low: Vector2::new(-1.0, -PI),
            action_high: Vector2::new(2.0, PI),
        }
    }
}

impl MotionModel for Unicycle {
    type State = Vector3<f64>;

    fn step(&self, state: &Self::State, action: &Vector2<f64>) -> Self::State {
        let (v, omega) = (action[0], action[1]);
        Vector3::new(
            state[0] + v * state[2].cos() * self.dt,
            state[1] + v * state[2].sin() * self.dt,
            state[2] + omega * self.dt,
        )
    }

    fn action_bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        (self.action_low, self.action_high)
    }

    fn position(&self, state: &Self::State) -> Point2D {
        Point2D::new(state[0], state[1])
    }
}
