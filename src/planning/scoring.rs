//! Collision-aware rollout scoring and waypoint progression
//!
//! Cost computation itself is pure (`goal_cost`, `path_in_collision`);
//! the waypoint index lives in an explicit `WaypointRoute` rather than
//! ambient state, so the side-effecting part of `score_batch` can be
//! reset and tested in isolation.

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::{NavError, NavResult, ObstacleMap, Point2D};

/// Cyclic list of goal positions with the index of the active one.
///
/// The index only ever increases; `current()` wraps it modulo the list
/// length, so a finished circuit starts over at the first waypoint.
pub struct WaypointRoute {
    waypoints: Vec<Point2D>,
    index: usize,
}

impl WaypointRoute {
    pub fn new(waypoints: Vec<Point2D>) -> NavResult<Self> {
        if waypoints.is_empty() {
            return Err(NavError::InvalidParameter(
                "waypoint list must not be empty".to_string(),
            ));
        }
        Ok(WaypointRoute {
            waypoints,
            index: 0,
        })
    }

    /// The waypoint currently targeted
    pub fn current(&self) -> Point2D {
        self.waypoints[self.index % self.waypoints.len()]
    }

    /// Total number of waypoints reached so far (not wrapped)
    pub fn reached_count(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Distance from the final point of a path to the goal
pub fn goal_cost(path: &[Point2D], goal: &Point2D) -> f64 {
    match path.last() {
        Some(end) => end.distance(goal),
        None => f64::INFINITY,
    }
}

/// Whether any point of a path collides with the map.
///
/// A point outside the map bounds counts as a collision; leaving the
/// known map is never a free move.
pub fn path_in_collision<G: ObstacleMap>(map: &G, path: &[Point2D]) -> bool {
    path.iter().any(|p| match map.world_to_grid(p) {
        Some((ix, iy)) => map.is_occupied(ix, iy),
        None => true,
    })
}

/// Scores rollout batches against the map and the active waypoint.
pub struct TrajectoryScorer {
    route: WaypointRoute,
    collision_penalty: f64,
    waypoint_threshold: f64,
}

impl TrajectoryScorer {
    pub fn new(route: WaypointRoute, collision_penalty: f64, waypoint_threshold: f64) -> Self {
        TrajectoryScorer {
            route,
            collision_penalty,
            waypoint_threshold,
        }
    }

    pub fn route(&self) -> &WaypointRoute {
        &self.route
    }

    pub fn route_mut(&mut self) -> &mut WaypointRoute {
        &mut self.route
    }

    /// Score one rollout batch: per-rollout cost is the goal distance of
    /// the final point, plus a fixed penalty if any point of the rollout
    /// collides (once per rollout, not per colliding point).
    ///
    /// Side effect: if the smallest goal distance in this batch is below
    /// the waypoint threshold, the route advances before returning, so
    /// subsequent calls target the next waypoint. Callers that need
    /// repeatable scores must `route_mut().reset()` between runs.
    pub fn score_batch<G: ObstacleMap>(&mut self, map: &G, paths: &[Vec<Point2D>]) -> Vec<f64> {
        let goal = self.route.current();
        let goal_costs: Vec<f64> = paths.iter().map(|path| goal_cost(path, &goal)).collect();

        let min_goal = goal_costs
            .iter()
            .cloned()
            .min_by_key(|&c| OrderedFloat(c))
            .unwrap_or(f64::INFINITY);
        if min_goal < self.waypoint_threshold {
            self.route.advance();
        }

        goal_costs
            .iter()
            .zip_eq(paths)
            .map(|(&goal_c, path)| {
                if path_in_collision(map, path) {
                    goal_c + self.collision_penalty
                } else {
                    goal_c
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::OccupancyGrid;

    fn empty_map() -> OccupancyGrid {
        OccupancyGrid::new(-10.0, -10.0, 10.0, 10.0, 0.25).unwrap()
    }

    fn scorer(waypoints: Vec<Point2D>) -> TrajectoryScorer {
        TrajectoryScorer::new(WaypointRoute::new(waypoints).unwrap(), 1000.0, 0.3)
    }

    #[test]
    fn test_empty_route_rejected() {
        assert!(WaypointRoute::new(vec![]).is_err());
    }

    #[test]
    fn test_clean_rollout_costs_goal_term_exactly() {
        let map = empty_map();
        let mut scorer = scorer(vec![Point2D::new(5.0, 0.0)]);
        let path = vec![Point2D::origin(), Point2D::new(1.0, 0.0)];

        let costs = scorer.score_batch(&map, &[path]);
        assert!((costs[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_occupied_cell_incurs_penalty_once() {
        let mut map = empty_map();
        map.occupy_world(1.0, 0.0);
        map.occupy_world(2.0, 0.0);
        let mut scorer = scorer(vec![Point2D::new(5.0, 0.0)]);
        // Two colliding points, one penalty
        let path = vec![
            Point2D::new(1.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(3.0, 0.0),
        ];

        let costs = scorer.score_batch(&map, &[path]);
        assert!((costs[0] - (2.0 + 1000.0)).abs() < 1e-10);
    }

    #[test]
    fn test_out_of_bounds_is_collision() {
        let map = empty_map();
        let mut scorer = scorer(vec![Point2D::new(5.0, 0.0)]);
        let path = vec![Point2D::origin(), Point2D::new(11.0, 0.0)];

        let costs = scorer.score_batch(&map, &[path]);
        assert!(costs[0] >= 1000.0);
    }

    #[test]
    fn test_waypoint_advances_and_wraps() {
        let map = empty_map();
        let waypoints = vec![Point2D::new(1.0, 0.0), Point2D::new(2.0, 0.0)];
        let mut scorer = scorer(waypoints.clone());

        // Ends on the first waypoint: advance to the second
        scorer.score_batch(&map, &[vec![Point2D::new(1.0, 0.0)]]);
        assert_eq!(scorer.route().reached_count(), 1);
        assert_eq!(scorer.route().current(), waypoints[1]);

        // Ends on the second: wrap back to the first
        scorer.score_batch(&map, &[vec![Point2D::new(2.0, 0.0)]]);
        assert_eq!(scorer.route().reached_count(), 2);
        assert_eq!(scorer.route().current(), waypoints[0]);
    }

    #[test]
    fn test_waypoint_index_non_decreasing() {
        let map = empty_map();
        let mut scorer = scorer(vec![Point2D::new(1.0, 0.0), Point2D::new(-1.0, 0.0)]);

        let mut last = 0;
        let paths = [
            vec![Point2D::new(5.0, 5.0)],
            vec![Point2D::new(1.0, 0.0)],
            vec![Point2D::new(5.0, 5.0)],
            vec![Point2D::new(-1.0, 0.0)],
        ];
        for path in paths.iter() {
            scorer.score_batch(&map, &[path.clone()]);
            assert!(scorer.route().reached_count() >= last);
            last = scorer.route().reached_count();
        }
        assert_eq!(last, 2);
    }

    #[test]
    fn test_reset_restores_first_waypoint() {
        let map = empty_map();
        let waypoints = vec![Point2D::new(1.0, 0.0), Point2D::new(2.0, 0.0)];
        let mut scorer = scorer(waypoints.clone());

        scorer.score_batch(&map, &[vec![Point2D::new(1.0, 0.0)]]);
        assert_eq!(scorer.route().current(), waypoints[1]);
        scorer.route_mut().reset();
        assert_eq!(scorer.route().current(), waypoints[0]);
    }
}
