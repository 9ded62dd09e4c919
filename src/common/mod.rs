//! Common types, traits, and error definitions for mppi_nav
//!
//! This module provides the foundational building blocks shared by the
//! motion model, the occupancy map, and the MPPI planner.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
