//! Boolean occupancy grid over a bounded world-frame region
//!
//! The grid is built once and read-only afterwards from the planner's
//! perspective; it only answers "which cell is this point in" and "is
//! that cell occupied".

use nalgebra::DMatrix;

use crate::common::{NavError, NavResult, ObstacleMap, Point2D};

/// Static occupancy grid map
pub struct OccupancyGrid {
    data: DMatrix<bool>,
    min_x: f64,
    min_y: f64,
    resolution: f64,
    x_width: usize,
    y_width: usize,
}

impl OccupancyGrid {
    /// Create an empty (all free) grid covering the given bounds
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64, resolution: f64) -> NavResult<Self> {
        if resolution <= 0.0 {
            return Err(NavError::MapError(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        if max_x <= min_x || max_y <= min_y {
            return Err(NavError::MapError(
                "map bounds must span a non-empty region".to_string(),
            ));
        }

        let x_width = ((max_x - min_x) / resolution).round() as usize;
        let y_width = ((max_y - min_y) / resolution).round() as usize;

        Ok(OccupancyGrid {
            data: DMatrix::from_element(x_width, y_width, false),
            min_x,
            min_y,
            resolution,
            x_width,
            y_width,
        })
    }

    pub fn x_width(&self) -> usize {
        self.x_width
    }

    pub fn y_width(&self) -> usize {
        self.y_width
    }

    /// Mark a single cell occupied
    pub fn occupy_cell(&mut self, ix: usize, iy: usize) {
        if ix < self.x_width && iy < self.y_width {
            self.data[(ix, iy)] = true;
        }
    }

    /// Mark the cell containing a world-frame point occupied.
    /// Points outside the bounds are ignored.
    pub fn occupy_world(&mut self, x: f64, y: f64) {
        if let Some((ix, iy)) = self.world_to_grid(&Point2D::new(x, y)) {
            self.data[(ix, iy)] = true;
        }
    }

    /// Mark every cell along a world-frame segment occupied, sampled at
    /// half the grid resolution
    pub fn occupy_segment(&mut self, from: Point2D, to: Point2D) {
        let length = from.distance(&to);
        let n = (length / (0.5 * self.resolution)).ceil().max(1.0) as usize;
        for i in 0..=n {
            let s = i as f64 / n as f64;
            self.occupy_world(from.x + s * (to.x - from.x), from.y + s * (to.y - from.y));
        }
    }

    /// World coordinates of occupied cell centers, for plotting
    pub fn occupied_points(&self) -> Vec<Point2D> {
        let mut points = Vec::new();
        for ix in 0..self.x_width {
            for iy in 0..self.y_width {
                if self.data[(ix, iy)] {
                    points.push(Point2D::new(
                        self.min_x + (ix as f64 + 0.5) * self.resolution,
                        self.min_y + (iy as f64 + 0.5) * self.resolution,
                    ));
                }
            }
        }
        points
    }
}

impl ObstacleMap for OccupancyGrid {
    fn world_to_grid(&self, point: &Point2D) -> Option<(usize, usize)> {
        let ix = ((point.x - self.min_x) / self.resolution).floor() as i64;
        let iy = ((point.y - self.min_y) / self.resolution).floor() as i64;

        if ix >= 0 && ix < self.x_width as i64 && iy >= 0 && iy < self.y_width as i64 {
            Some((ix as usize, iy as usize))
        } else {
            None
        }
    }

    fn is_occupied(&self, ix: usize, iy: usize) -> bool {
        self.data[(ix, iy)]
    }
}
