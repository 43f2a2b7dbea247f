//! Detecting when a pattern has settled down.

use itertools::{Itertools, MinMaxResult};

use super::history::History;
use crate::io::Snapshot;

/// Default number of past generations compared against the newest one.
pub const DEFAULT_LOOKBACK: usize = 20;

/// Largest spread of live counts, relative to their mean, for which a window
/// of generations is considered quasi-stable.
pub const QUASI_STABLE_TOLERANCE: f64 = 0.02;

/// How settled the most recent generations are.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stability {
    /// The newest generation exactly repeats one `period` generations
    /// earlier.
    Exact {
        /// Number of generations between repetitions.
        period: usize,
    },
    /// The live count has stayed within a narrow band (or the population has
    /// died out) over the whole window.
    Quasi,
    /// Neither of the above.
    Unstable,
}

impl Stability {
    /// Returns whether the pattern is exactly or approximately stable.
    pub fn is_stable(self) -> bool {
        self != Stability::Unstable
    }
}

/// Classifies the retained generations of a history, considering the newest
/// generation and up to `lookback` generations before it.
pub fn check_stability(history: &History, lookback: usize) -> Stability {
    if history.len() < 2 {
        return Stability::Unstable;
    }
    let window = history
        .iter()
        .rev()
        .take(lookback.saturating_add(1))
        .collect_vec();
    let newest = window[0];

    if let Some(period) = window[1..].iter().position(|&past| past == newest) {
        return Stability::Exact { period: period + 1 };
    }

    if window.len() >= lookback && is_quasi_stable(&window) {
        return Stability::Quasi;
    }

    Stability::Unstable
}

fn is_quasi_stable(window: &[&Snapshot]) -> bool {
    let counts = window.iter().map(|s| s.live_count()).collect_vec();
    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    let range = match counts.iter().minmax() {
        MinMaxResult::NoElements | MinMaxResult::OneElement(_) => 0,
        MinMaxResult::MinMax(min, max) => max - min,
    };
    mean == 0.0 || (range as f64) / mean < QUASI_STABLE_TOLERANCE
}
