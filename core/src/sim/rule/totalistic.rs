use lazy_static::lazy_static;
use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

lazy_static! {
    /// Conway's Game of Life (B3/S23).
    pub static ref LIFE: LifeLikeRule = LifeLikeRule::new(&[2, 3], &[3]);
}

/// A 2-state outer totalistic rule: a cell's next state depends only on its
/// own state and the number of live neighbors.
///
/// Works with any neighborhood, so the same rule applies to every lattice and
/// dimensionality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LifeLikeRule {
    survive: BTreeSet<usize>,
    born: BTreeSet<usize>,
}
impl Default for LifeLikeRule {
    fn default() -> Self {
        LIFE.clone()
    }
}

impl LifeLikeRule {
    /// Constructs a rule from the live-neighbor counts under which a live cell
    /// survives and a dead cell is born.
    pub fn new(survive: &[usize], born: &[usize]) -> Self {
        Self {
            survive: survive.iter().copied().collect(),
            born: born.iter().copied().collect(),
        }
    }

    /// Returns the live-neighbor counts under which a live cell survives.
    pub fn survive(&self) -> &BTreeSet<usize> {
        &self.survive
    }
    /// Returns the live-neighbor counts under which a dead cell is born.
    pub fn born(&self) -> &BTreeSet<usize> {
        &self.born
    }

    /// Returns the largest neighbor count mentioned by the rule.
    pub fn max_count(&self) -> Option<usize> {
        self.survive.iter().chain(&self.born).copied().max()
    }

    /// Returns the next state of a cell given its own state and the states of
    /// its neighbors. Only neighbors in state `1` are counted.
    #[inline]
    pub fn evaluate(&self, cell: u8, neighbors: &[u8]) -> u8 {
        let live_neighbors = neighbors.iter().filter(|&&n| n == 1).count();
        let next = if cell == 1 {
            self.survive.contains(&live_neighbors)
        } else {
            cell == 0 && self.born.contains(&live_neighbors)
        };
        next as u8
    }
}

impl fmt::Display for LifeLikeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}S{}",
            self.born.iter().join(","),
            self.survive.iter().join(","),
        )
    }
}
