// MPPI planning module

pub mod rollout;
pub mod scoring;
pub mod mppi;

pub use rollout::*;
pub use scoring::*;
pub use mppi::*;
