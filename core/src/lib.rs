//! N-dimensional binary cellular automaton engine: lattice neighborhoods,
//! Wolfram and life-like rules, and a bounded bit-packed history.

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

pub mod axis;
pub mod config;
pub mod errors;
pub mod io;
pub mod nbhd;
pub mod ndarray;
pub mod population;
pub mod shape;
pub mod sim;

/// Commonly used types.
pub mod prelude {
    pub use crate::axis::{Axis, AXES, MAX_NDIM};
    pub use crate::config::{NeighborhoodSpec, RuleSpec, SessionConfig};
    pub use crate::errors::{EngineError, EngineResult};
    pub use crate::io::Snapshot;
    pub use crate::nbhd::{NeighborOffset, Neighborhood, Parity, Topology};
    pub use crate::ndarray::NdArray;
    pub use crate::population::{NestedCells, Population};
    pub use crate::shape::Shape;
    pub use crate::sim::rule::{LifeLikeRule, Rule, WolframRule, LIFE, RULE_110};
    pub use crate::sim::{History, Session, Stability};
}

#[cfg(test)]
mod tests;
