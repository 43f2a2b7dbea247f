use lazy_static::lazy_static;
use std::convert::TryFrom;
use std::fmt;

use crate::errors::{EngineError, EngineResult};

/// Number of states used by elementary cellular automata.
pub const DEFAULT_STATE_COUNT: usize = 2;
/// Number of cells (left, self, right) used by elementary cellular automata.
pub const DEFAULT_CELL_COUNT: usize = 3;

/// Largest lookup table a Wolfram rule may build.
const MAX_TABLE_LEN: usize = 1 << 16;

lazy_static! {
    /// Wolfram rule 110, the classic Turing-complete elementary automaton.
    pub static ref RULE_110: WolframRule = WolframRule {
        rule: 110,
        state_count: DEFAULT_STATE_COUNT,
        cell_count: DEFAULT_CELL_COUNT,
        table: build_table(110, DEFAULT_STATE_COUNT, DEFAULT_CELL_COUNT),
    };
}

/// A one-dimensional rule identified by its Wolfram code.
///
/// The lookup table maps every configuration index `k` in
/// `0..state_count^cell_count` to `1` if `rule & state_count^k` is nonzero and
/// `0` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WolframRule {
    rule: u64,
    state_count: usize,
    cell_count: usize,
    table: Vec<u8>,
}

impl WolframRule {
    /// Constructs an elementary (2-state, 3-cell) rule. `rule` must be between
    /// 0 and 255.
    pub fn new(rule: u64) -> EngineResult<Self> {
        Self::with_config(rule, DEFAULT_STATE_COUNT, DEFAULT_CELL_COUNT)
    }

    /// Constructs a rule with a custom number of states and cells per
    /// configuration.
    pub fn with_config(rule: u64, state_count: usize, cell_count: usize) -> EngineResult<Self> {
        if state_count < 2 || cell_count < 1 {
            return Err(EngineError::InvalidRule(format!(
                "need at least 2 states and 1 cell; got {} states and {} cells",
                state_count, cell_count
            )));
        }
        let table_len = pow_usize(state_count, cell_count)
            .filter(|&len| len <= MAX_TABLE_LEN)
            .ok_or_else(|| {
                EngineError::InvalidRule(format!(
                    "{} states and {} cells is too many configurations",
                    state_count, cell_count
                ))
            })?;
        // If the bound does not fit in a `u64`, every `u64` is in range.
        if let Some(limit) = pow_u64(state_count as u64, table_len) {
            if rule >= limit {
                return Err(EngineError::InvalidRule(format!(
                    "rule {} is out of range; expected 0 to {}",
                    rule,
                    limit - 1
                )));
            }
        }
        Ok(Self {
            rule,
            state_count,
            cell_count,
            table: build_table(rule, state_count, cell_count),
        })
    }

    /// Returns the Wolfram code.
    pub fn rule(&self) -> u64 {
        self.rule
    }
    /// Returns the number of cell states.
    pub fn state_count(&self) -> usize {
        self.state_count
    }
    /// Returns the number of cells in a configuration, including the cell
    /// itself.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }
    /// Returns the lookup table, indexed by configuration index.
    pub fn table(&self) -> &[u8] {
        &self.table
    }

    /// Returns the configuration index of a cell and its neighbors: the base
    /// `state_count` number formed by the neighbors in order with the cell
    /// itself inserted in the middle.
    ///
    /// For the elementary configuration this is `left << 2 | cell << 1 |
    /// right`.
    pub fn config_index(&self, cell: u8, neighbors: &[u8]) -> usize {
        let mid = neighbors.len() / 2;
        neighbors[..mid]
            .iter()
            .chain(std::iter::once(&cell))
            .chain(&neighbors[mid..])
            .fold(0, |acc, &state| acc * self.state_count + state as usize)
    }

    /// Returns the next state of a cell given its own state and the states of
    /// its neighbors. Configurations outside the table are dead.
    #[inline]
    pub fn evaluate(&self, cell: u8, neighbors: &[u8]) -> u8 {
        self.table
            .get(self.config_index(cell, neighbors))
            .copied()
            .unwrap_or(0)
    }

    /// Returns whether this rule uses the elementary configuration.
    pub fn is_elementary(&self) -> bool {
        self.state_count == DEFAULT_STATE_COUNT && self.cell_count == DEFAULT_CELL_COUNT
    }
}

impl fmt::Display for WolframRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.rule)?;
        if !self.is_elementary() {
            write!(f, "/{}/{}", self.state_count, self.cell_count)?;
        }
        Ok(())
    }
}

fn build_table(rule: u64, state_count: usize, cell_count: usize) -> Vec<u8> {
    let len = pow_usize(state_count, cell_count).unwrap_or(0);
    (0..len)
        .map(|k| match pow_u64(state_count as u64, k) {
            Some(mask) => (rule & mask != 0) as u8,
            // Masks beyond `u64` share no bits with the rule.
            None => 0,
        })
        .collect()
}

fn pow_usize(base: usize, exp: usize) -> Option<usize> {
    base.checked_pow(u32::try_from(exp).ok()?)
}

fn pow_u64(base: u64, exp: usize) -> Option<u64> {
    base.checked_pow(u32::try_from(exp).ok()?)
}
