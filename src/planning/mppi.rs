//! MPPI trajectory optimizer
//!
//! Model Predictive Path Integral control: each tick samples perturbed
//! action sequences around a nominal one, scores the resulting rollouts,
//! and pulls the nominal sequence toward low-cost samples with
//! importance weights. The best sequence found warm-starts the next tick
//! (receding horizon).

use itertools::Itertools;
use nalgebra::Vector2;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::common::{
    ActionSequence, ControlInput, MotionModel, NavError, NavResult, ObstacleMap, Point2D,
    StateTrajectory,
};
use crate::planning::rollout::{simulate_rollout, simulate_rollouts};
use crate::planning::scoring::{TrajectoryScorer, WaypointRoute};

/// MPPI planner configuration
#[derive(Debug, Clone)]
pub struct MppiConfig {
    /// Rollouts sampled per optimization iteration
    pub num_rollouts: usize,
    /// Actions per sequence (trajectories are one state longer)
    pub horizon: usize,
    /// Optimization iterations per control tick
    pub num_iterations: usize,
    /// Softmax temperature for the importance weights
    pub lambda: f64,
    /// Half-width of the uniform perturbation distribution
    pub perturbation_range: f64,
    /// Fixed cost added once to any colliding rollout
    pub collision_penalty: f64,
    /// Goal distance below which the active waypoint advances
    pub waypoint_threshold: f64,
    /// Nominal sequence seeding the first tick; must have `horizon`
    /// elements. `None` uses a stationary sequence with a forward bias
    /// on the linear velocity
    pub initial_nominal: Option<ActionSequence>,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for MppiConfig {
    fn default() -> Self {
        Self {
            num_rollouts: 100,
            horizon: 20,
            num_iterations: 20,
            lambda: 10.0,
            perturbation_range: 2.0,
            collision_penalty: 1000.0,
            waypoint_threshold: 0.3,
            initial_nominal: None,
            seed: None,
        }
    }
}

impl MppiConfig {
    pub fn validate(&self) -> NavResult<()> {
        if self.num_rollouts == 0 {
            return Err(NavError::InvalidParameter(
                "num_rollouts must be positive".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(NavError::InvalidParameter(
                "horizon must be positive".to_string(),
            ));
        }
        if self.num_iterations == 0 {
            return Err(NavError::InvalidParameter(
                "num_iterations must be positive".to_string(),
            ));
        }
        if self.lambda <= 0.0 {
            return Err(NavError::InvalidParameter(format!(
                "lambda must be positive, got {}",
                self.lambda
            )));
        }
        if self.perturbation_range <= 0.0 {
            return Err(NavError::InvalidParameter(format!(
                "perturbation_range must be positive, got {}",
                self.perturbation_range
            )));
        }
        if let Some(nominal) = &self.initial_nominal {
            if nominal.len() != self.horizon {
                return Err(NavError::InvalidParameter(format!(
                    "initial_nominal has {} actions, horizon is {}",
                    nominal.len(),
                    self.horizon
                )));
            }
        }
        Ok(())
    }
}

/// Best rollout found during one control tick
#[derive(Debug, Clone)]
pub struct MppiSolution<S: Copy> {
    /// Clipped action sequence of the best rollout
    pub actions: ActionSequence,
    /// Its scalar cost
    pub score: f64,
    /// Its simulated trajectory, for diagnostics and plotting
    pub trajectory: StateTrajectory<S>,
}

impl<S: Copy> MppiSolution<S> {
    /// First action of the sequence; the caller executes this one action
    /// per tick (receding horizon)
    pub fn first_action(&self) -> ControlInput {
        self.actions
            .first()
            .map(|a| ControlInput::from(*a))
            .unwrap_or_else(ControlInput::zero)
    }
}

/// Softmax-style importance weights over rollout costs.
///
/// The minimum cost is subtracted before exponentiating so large costs
/// cannot overflow to a zero denominator. Returns `None` when the weight
/// sum degenerates (every cost non-finite); callers skip the nominal
/// update for that iteration instead of dividing by zero.
pub fn importance_weights(costs: &[f64], lambda: f64) -> Option<Vec<f64>> {
    let min_cost = costs
        .iter()
        .cloned()
        .min_by_key(|&c| OrderedFloat(c))
        .unwrap_or(f64::INFINITY);
    if !min_cost.is_finite() {
        return None;
    }

    let weights: Vec<f64> = costs
        .iter()
        .map(|&c| (-(c - min_cost) / lambda).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum <= f64::EPSILON {
        return None;
    }

    Some(weights.iter().map(|w| w / sum).collect())
}

fn clip_action(action: &Vector2<f64>, low: &Vector2<f64>, high: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(
        action[0].max(low[0]).min(high[0]),
        action[1].max(low[1]).min(high[1]),
    )
}

/// MPPI waypoint-following planner.
///
/// Owns the nominal action sequence and waypoint progression carried
/// across control ticks; one instance per robot, external synchronization
/// required for concurrent callers.
pub struct MppiPlanner<M: MotionModel, G: ObstacleMap> {
    model: M,
    map: G,
    config: MppiConfig,
    scorer: TrajectoryScorer,
    nominal: ActionSequence,
    rng: StdRng,
}

impl<M: MotionModel, G: ObstacleMap> MppiPlanner<M, G> {
    pub fn new(
        model: M,
        map: G,
        waypoints: Vec<Point2D>,
        config: MppiConfig,
    ) -> NavResult<Self> {
        config.validate()?;
        let route = WaypointRoute::new(waypoints)?;
        let scorer =
            TrajectoryScorer::new(route, config.collision_penalty, config.waypoint_threshold);

        // Stationary start with a forward bias on the linear velocity
        // unless the caller supplied a sequence
        let nominal: ActionSequence = match config.initial_nominal.clone() {
            Some(seq) => seq,
            None => vec![Vector2::new(1.0, 0.0); config.horizon],
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(MppiPlanner {
            model,
            map,
            config,
            scorer,
            nominal,
            rng,
        })
    }

    /// Nominal sequence that will seed the next tick
    pub fn nominal_actions(&self) -> &[Vector2<f64>] {
        &self.nominal
    }

    /// Waypoint currently targeted
    pub fn current_waypoint(&self) -> Point2D {
        self.scorer.route().current()
    }

    /// Waypoints reached since construction
    pub fn waypoints_reached(&self) -> usize {
        self.scorer.route().reached_count()
    }

    /// Run one control tick from the given state.
    ///
    /// Optimizes for the configured iteration count, stores the shifted
    /// best sequence as the next tick's nominal (warm start), and returns
    /// the best rollout. The caller executes `first_action()` only.
    pub fn plan(&mut self, state: M::State) -> MppiSolution<M::State> {
        let (low, high) = self.model.action_bounds();
        let range = self.config.perturbation_range;
        let perturbation = Uniform::new_inclusive(-range, range);

        let mut nominal = self.nominal.clone();
        // Fallback if every sampled rollout scores non-finite
        let mut best = MppiSolution {
            actions: nominal.clone(),
            score: f64::INFINITY,
            trajectory: simulate_rollout(&self.model, &state, &nominal),
        };

        for _ in 0..self.config.num_iterations {
            let mut action_batch: Vec<ActionSequence> =
                Vec::with_capacity(self.config.num_rollouts);
            let mut delta_batch: Vec<ActionSequence> =
                Vec::with_capacity(self.config.num_rollouts);
            for _ in 0..self.config.num_rollouts {
                let mut actions = Vec::with_capacity(self.config.horizon);
                let mut deltas = Vec::with_capacity(self.config.horizon);
                for t in 0..self.config.horizon {
                    let sampled = Vector2::new(
                        perturbation.sample(&mut self.rng),
                        perturbation.sample(&mut self.rng),
                    );
                    let clipped = clip_action(&(nominal[t] + sampled), &low, &high);
                    // The update must use the perturbation actually
                    // executed, so recompute it after clipping
                    deltas.push(clipped - nominal[t]);
                    actions.push(clipped);
                }
                action_batch.push(actions);
                delta_batch.push(deltas);
            }

            let trajectories = simulate_rollouts(&self.model, &state, &action_batch);
            let paths: Vec<Vec<Point2D>> = trajectories
                .iter()
                .map(|tr| tr.iter().map(|s| self.model.position(s)).collect())
                .collect();
            let costs = self.scorer.score_batch(&self.map, &paths);

            if let Some(weights) = importance_weights(&costs, self.config.lambda) {
                for (w, deltas) in weights.iter().zip_eq(&delta_batch) {
                    for (n, d) in nominal.iter_mut().zip_eq(deltas) {
                        *n += *w * *d;
                    }
                }
            }

            if let Some(best_index) = costs.iter().cloned().position_min_by_key(|&c| OrderedFloat(c))
            {
                if costs[best_index] < best.score {
                    best = MppiSolution {
                        actions: action_batch[best_index].clone(),
                        score: costs[best_index],
                        trajectory: trajectories[best_index].clone(),
                    };
                }
            }
        }

        // Warm start: the best clipped sequence shifted left by one, last
        // action duplicated
        let mut next_nominal: ActionSequence = best.actions[1..].to_vec();
        if let Some(last) = best.actions.last() {
            next_nominal.push(*last);
        }
        self.nominal = next_nominal;

        best
    }
}
