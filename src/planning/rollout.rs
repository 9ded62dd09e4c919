//! Rollout simulation
//!
//! Unrolls batches of action sequences through a motion model into state
//! trajectories. Pure functions of their inputs; determinism is inherited
//! from the motion model.

use crate::common::{ActionSequence, MotionModel, StateTrajectory};

/// Integrate a single action sequence from an initial state.
///
/// The returned trajectory has one more entry than the action sequence,
/// with index 0 equal to the initial state.
pub fn simulate_rollout<M: MotionModel>(
    model: &M,
    initial_state: &M::State,
    actions: &ActionSequence,
) -> StateTrajectory<M::State> {
    let mut trajectory = Vec::with_capacity(actions.len() + 1);
    trajectory.push(*initial_state);
    let mut state = *initial_state;
    for action in actions {
        state = model.step(&state, action);
        trajectory.push(state);
    }
    trajectory
}

/// Integrate a batch of action sequences sharing one initial state.
///
/// Rollouts are independent of each other; only the per-rollout time
/// recursion is sequential.
pub fn simulate_rollouts<M: MotionModel>(
    model: &M,
    initial_state: &M::State,
    action_batch: &[ActionSequence],
) -> Vec<StateTrajectory<M::State>> {
    action_batch
        .iter()
        .map(|actions| simulate_rollout(model, initial_state, actions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Unicycle;
    use nalgebra::{Vector2, Vector3};

    #[test]
    fn test_trajectory_shape_and_initial_state() {
        let model = Unicycle::new(0.1).unwrap();
        let initial = Vector3::new(1.0, 2.0, 0.5);
        let actions: ActionSequence = vec![Vector2::new(1.0, 0.0); 15];

        let trajectory = simulate_rollout(&model, &initial, &actions);
        assert_eq!(trajectory.len(), 16);
        assert_eq!(trajectory[0], initial);
    }

    #[test]
    fn test_rollout_determinism() {
        let model = Unicycle::new(0.1).unwrap();
        let initial = Vector3::zeros();
        let actions: ActionSequence = (0..10)
            .map(|t| Vector2::new(1.0, 0.1 * t as f64))
            .collect();

        let a = simulate_rollout(&model, &initial, &actions);
        let b = simulate_rollout(&model, &initial, &actions);
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_matches_single_rollouts() {
        let model = Unicycle::new(0.1).unwrap();
        let initial = Vector3::zeros();
        let batch: Vec<ActionSequence> = vec![
            vec![Vector2::new(1.0, 0.0); 5],
            vec![Vector2::new(0.5, 0.2); 5],
        ];

        let trajectories = simulate_rollouts(&model, &initial, &batch);
        assert_eq!(trajectories.len(), 2);
        for (actions, trajectory) in batch.iter().zip(&trajectories) {
            assert_eq!(trajectory, &simulate_rollout(&model, &initial, actions));
        }
    }
}
