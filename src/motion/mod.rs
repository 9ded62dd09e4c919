// Motion models module

pub mod unicycle;

pub use unicycle::*;
