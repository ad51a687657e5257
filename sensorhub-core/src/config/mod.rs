//! Configuration types
//!
//! Board-agnostic capacities and the sink destination model.

pub mod types;

pub use types::*;
