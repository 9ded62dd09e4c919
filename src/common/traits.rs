//! Traits defining the seams the MPPI planner is built against

use nalgebra::Vector2;

use crate::common::types::Point2D;

/// Kinematic motion model consumed by the planner.
///
/// The planner only needs single-step integration, the symmetric action
/// bounds, and a way to project a state onto the 2D plane for scoring.
pub trait MotionModel {
    /// State type propagated by this model
    type State: Copy;

    /// Propagate one state forward by one timestep under one action
    fn step(&self, state: &Self::State, action: &Vector2<f64>) -> Self::State;

    /// Per-dimension action limits as (low, high) vectors
    fn action_bounds(&self) -> (Vector2<f64>, Vector2<f64>);

    /// 2D position of a state, used for goal distance and map lookups
    fn position(&self, state: &Self::State) -> Point2D;
}

/// Static occupancy map consumed by the scorer.
pub trait ObstacleMap {
    /// Convert a world-frame point to grid indices.
    ///
    /// Returns `None` when the point falls outside the map bounds; the
    /// scorer treats that as a collision, not an error.
    fn world_to_grid(&self, point: &Point2D) -> Option<(usize, usize)>;

    /// Occupancy lookup for an in-bounds cell
    fn is_occupied(&self, ix: usize, iy: usize) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StraightLine {
        dt: f64,
    }

    impl MotionModel for StraightLine {
        type State = Vector2<f64>;

        fn step(&self, state: &Self::State, action: &Vector2<f64>) -> Self::State {
            state + action * self.dt
        }

        fn action_bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
            (Vector2::new(-1.0, -1.0), Vector2::new(1.0, 1.0))
        }

        fn position(&self, state: &Self::State) -> Point2D {
            Point2D::new(state[0], state[1])
        }
    }

    #[test]
    fn test_motion_model_trait() {
        let model = StraightLine { dt: 0.5 };
        let next = model.step(&Vector2::new(0.0, 0.0), &Vector2::new(1.0, 0.0));
        assert!((next[0] - 0.5).abs() < 1e-10);
    }
}
