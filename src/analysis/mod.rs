//! Analysis modules.
//!
//! The reporting core: pure numeric statistics and the aggregation
//! functions that build the fixed-shape report structures.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
