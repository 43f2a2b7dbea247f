//! Serializable session configuration.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::errors::{EngineError, EngineResult};
use crate::nbhd::{Neighborhood, Topology};
use crate::population::DEFAULT_DENSITY;
use crate::shape::Shape;
use crate::sim::history::DEFAULT_HISTORY_CAPACITY;
use crate::sim::rule::{LifeLikeRule, Rule, WolframRule, DEFAULT_CELL_COUNT, DEFAULT_STATE_COUNT};

/// Everything needed to set up a [`Session`](crate::sim::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of retained generations.
    pub history_capacity: usize,
    /// Probability that a seeded cell is alive.
    pub density: f64,
    /// Transition rule.
    pub rule: RuleSpec,
    /// Neighbor offsets used by the rule.
    pub neighborhood: NeighborhoodSpec,
    /// Seed for the session's random number generator. If `None`, the
    /// generator is seeded from the operating system.
    pub rng_seed: Option<u64>,
    /// Shape to seed immediately, if any.
    pub shape: Option<Shape>,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            density: DEFAULT_DENSITY,
            rule: RuleSpec::default(),
            neighborhood: NeighborhoodSpec::default(),
            rng_seed: None,
            shape: None,
        }
    }
}

/// Serializable description of a [`Rule`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleSpec {
    Wolfram {
        rule: i64,
        #[serde(default = "default_state_count")]
        states: usize,
        #[serde(default = "default_cell_count")]
        cells: usize,
    },
    LifeLike {
        survive: Vec<usize>,
        born: Vec<usize>,
    },
    /// Rule descriptor string such as `W110` or `B3S2,3`.
    Descriptor { descriptor: String },
}
impl Default for RuleSpec {
    fn default() -> Self {
        RuleSpec::LifeLike {
            survive: vec![2, 3],
            born: vec![3],
        }
    }
}

impl RuleSpec {
    /// Builds the rule, validating it.
    pub fn build(&self) -> EngineResult<Rule> {
        match self {
            RuleSpec::Wolfram {
                rule,
                states,
                cells,
            } => {
                let rule = u64::try_from(*rule)
                    .map_err(|_| EngineError::InvalidRule(format!("negative rule {}", rule)))?;
                WolframRule::with_config(rule, *states, *cells).map(Rule::Wolfram)
            }
            RuleSpec::LifeLike { survive, born } => {
                Ok(Rule::LifeLike(LifeLikeRule::new(survive, born)))
            }
            RuleSpec::Descriptor { descriptor } => descriptor.parse(),
        }
    }
}

fn default_state_count() -> usize {
    DEFAULT_STATE_COUNT
}
fn default_cell_count() -> usize {
    DEFAULT_CELL_COUNT
}
fn default_radius() -> usize {
    1
}

/// Serializable description of a neighborhood.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NeighborhoodSpec {
    /// Explicit offset strings such as `x-1|y+1`.
    Offsets { offsets: Vec<String> },
    /// Neighborhood induced by a lattice topology.
    Lattice {
        topology: String,
        #[serde(default = "default_radius")]
        radius: usize,
    },
    /// Moore neighborhood matching the dimensionality of the population.
    Moore {
        #[serde(default = "default_radius")]
        radius: usize,
    },
}
impl Default for NeighborhoodSpec {
    fn default() -> Self {
        NeighborhoodSpec::Moore { radius: 1 }
    }
}

impl NeighborhoodSpec {
    /// Builds the neighborhood, or returns `Ok(None)` for a Moore neighborhood,
    /// which depends on the population.
    pub fn build(&self) -> EngineResult<Option<Neighborhood>> {
        match self {
            NeighborhoodSpec::Offsets { offsets } => Neighborhood::from_strings(offsets).map(Some),
            NeighborhoodSpec::Lattice { topology, radius } => {
                Ok(Some(topology.parse::<Topology>()?.neighborhood(*radius)))
            }
            NeighborhoodSpec::Moore { .. } => Ok(None),
        }
    }
}
