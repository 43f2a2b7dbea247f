//! Everything related to the description of a cellular automaton rule,
//! primarily the transition function.

use core::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

mod totalistic;
mod wolfram;

use crate::errors::{EngineError, EngineResult};
use crate::nbhd::Neighborhood;
use crate::population::Population;
pub use totalistic::*;
pub use wolfram::*;

lazy_static! {
    static ref WOLFRAM_REGEX: Regex = Regex::new(r"^[Ww](\d+)(?:/(\d+)/(\d+))?$").unwrap();
    static ref LIFE_LIKE_REGEX: Regex = Regex::new(r"^[Bb]([\d,]*)/?[Ss]([\d,]*)$").unwrap();
}

/// Type alias for a CA transition function that computes the next state of
/// the cell at a position, given the whole population before the step.
pub type TransitionFunction<'a> = Box<dyn 'a + FnMut(&[usize], &Population) -> u8>;

/// Cellular automaton rule.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Wolfram(WolframRule),
    LifeLike(LifeLikeRule),
}
impl Default for Rule {
    fn default() -> Self {
        Rule::LifeLike(LIFE.clone())
    }
}

impl Rule {
    /// Returns the next state of a cell given its own state and the states of
    /// its neighbors, in neighborhood order.
    #[inline]
    pub fn evaluate(&self, cell: u8, neighbors: &[u8]) -> u8 {
        match self {
            Rule::Wolfram(r) => r.evaluate(cell, neighbors),
            Rule::LifeLike(r) => r.evaluate(cell, neighbors),
        }
    }

    /// Returns a function that computes a cell's next state using the given
    /// neighborhood.
    pub fn transition_function<'a>(&'a self, nbhd: &'a Neighborhood) -> TransitionFunction<'a> {
        let mut neighbors = Vec::with_capacity(nbhd.max_len());
        Box::new(move |pos: &[usize], population: &Population| {
            neighbors.clear();
            neighbors.extend(
                nbhd.extractors_at(pos)
                    .iter()
                    .map(|e| e.extract(pos, population)),
            );
            self.evaluate(population[pos], &neighbors)
        })
    }

    /// Returns a description of why this rule does not suit the neighborhood,
    /// or `None` if it does. A mismatch is not an error: cells simply never
    /// reach the configurations the rule describes.
    pub fn neighborhood_mismatch(&self, nbhd: &Neighborhood) -> Option<String> {
        match self {
            Rule::Wolfram(r) if r.cell_count() != nbhd.max_len() + 1 => Some(format!(
                "{} expects {} neighbors but the neighborhood has {}",
                r,
                r.cell_count() - 1,
                nbhd.max_len()
            )),
            Rule::LifeLike(r) => match r.max_count() {
                Some(n) if n > nbhd.max_len() => Some(format!(
                    "{} mentions {} neighbors but the neighborhood has {}",
                    r,
                    n,
                    nbhd.max_len()
                )),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Wolfram(r) => write!(f, "{}", r),
            Rule::LifeLike(r) => write!(f, "{}", r),
        }
    }
}

impl FromStr for Rule {
    type Err = EngineError;

    /// Parses a rule descriptor: `W<n>` (optionally `W<n>/<states>/<cells>`)
    /// for a Wolfram rule, or `B<counts>S<counts>` with comma-separated counts
    /// for a life-like rule.
    fn from_str(s: &str) -> EngineResult<Self> {
        let s = s.trim();
        let invalid = || EngineError::InvalidRule(format!("unrecognized rule descriptor {:?}", s));
        let number = |m: Option<regex::Match<'_>>| -> EngineResult<Option<u64>> {
            m.map(|m| m.as_str().parse().map_err(|_| invalid()))
                .transpose()
        };

        if let Some(captures) = WOLFRAM_REGEX.captures(s) {
            let rule = number(captures.get(1))?.ok_or_else(invalid)?;
            return match (number(captures.get(2))?, number(captures.get(3))?) {
                (Some(states), Some(cells)) => {
                    WolframRule::with_config(rule, states as usize, cells as usize)
                }
                _ => WolframRule::new(rule),
            }
            .map(Rule::Wolfram);
        }

        let captures = LIFE_LIKE_REGEX.captures(s).ok_or_else(invalid)?;
        let mut conditions = [vec![], vec![]];
        for (i, condition) in conditions.iter_mut().enumerate() {
            for count in captures[i + 1].split(',').filter(|c| !c.is_empty()) {
                condition.push(count.parse().map_err(|_| invalid())?);
            }
        }
        let [born, survive] = conditions;
        Ok(Rule::LifeLike(LifeLikeRule::new(&survive, &born)))
    }
}

impl From<WolframRule> for Rule {
    fn from(r: WolframRule) -> Self {
        Rule::Wolfram(r)
    }
}
impl From<LifeLikeRule> for Rule {
    fn from(r: LifeLikeRule) -> Self {
        Rule::LifeLike(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbhd::{Topology, MOORE_1D, MOORE_2D};

    #[test]
    fn test_rule_descriptor_round_trip() {
        for s in &["W110", "W0", "W255", "W30/3/3", "B3S2,3", "BS", "B1,2S", "B12S4,13"] {
            let rule: Rule = s.parse().unwrap();
            assert_eq!(*s, rule.to_string());
            assert_eq!(Ok(rule.clone()), rule.to_string().parse());
        }
        assert_eq!(Ok(Rule::LifeLike(LIFE.clone())), "b3/s2,3".parse());
        assert_eq!(Ok(Rule::Wolfram(RULE_110.clone())), " w110 ".parse());
    }

    #[test]
    fn test_rule_descriptor_errors() {
        for bad in &["", "W", "W256", "W-1", "W99999999999999999999999", "B3", "S23", "B3S2;3", "life"] {
            assert!(
                matches!(bad.parse::<Rule>(), Err(EngineError::InvalidRule(_))),
                "{:?} should not parse",
                bad,
            );
        }
    }

    #[test]
    fn test_neighborhood_mismatch() {
        let rule_110 = Rule::from(RULE_110.clone());
        let life = Rule::default();
        let moore_1d = Neighborhood::from_strings(MOORE_1D).unwrap();
        let moore_2d = Neighborhood::from_strings(MOORE_2D).unwrap();
        assert_eq!(None, rule_110.neighborhood_mismatch(&moore_1d));
        assert!(rule_110.neighborhood_mismatch(&moore_2d).is_some());
        assert_eq!(None, life.neighborhood_mismatch(&moore_2d));
        assert!(life.neighborhood_mismatch(&moore_1d).is_some());
        let tri = Topology::Triangular.neighborhood(1);
        assert_eq!(None, Rule::from(Topology::Triangular.default_rule()).neighborhood_mismatch(&tri));
    }
}
