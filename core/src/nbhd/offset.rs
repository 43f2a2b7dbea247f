//! Symbolic neighbor offsets and the extractors compiled from them.
//!
//! An offset string has one token per axis, joined by `|`. Each token is the
//! axis name optionally followed by a sign and magnitude, e.g. `x+1|y-1|z`.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::axis::AXES;
use crate::errors::{EngineError, EngineResult};
use crate::population::Population;

/// Maximum number of axes in a neighbor offset.
pub const MAX_OFFSET_AXES: usize = 3;

lazy_static! {
    /// Regex matching a single offset token: an axis name optionally followed
    /// by a signed magnitude.
    static ref OFFSET_TOKEN_REGEX: Regex =
        Regex::new(r"^\s*([A-Za-z])\s*(?:([+-])\s*(\d+))?\s*$").unwrap();
}

/// Canonical 1D Moore neighborhood (2 neighbors).
pub const MOORE_1D: &[&str] = &["x-1", "x+1"];
/// Canonical 2D Moore neighborhood (8 neighbors).
pub const MOORE_2D: &[&str] = &[
    "x|y+1", "x+1|y+1", "x+1|y", "x+1|y-1", "x|y-1", "x-1|y-1", "x-1|y", "x-1|y+1",
];
/// Canonical 3D Moore neighborhood (26 neighbors).
pub const MOORE_3D: &[&str] = &[
    "x|y+1|z", "x+1|y+1|z", "x+1|y|z", "x+1|y-1|z", "x|y-1|z", "x-1|y-1|z", "x-1|y|z",
    "x-1|y+1|z", "x|y+1|z+1", "x+1|y+1|z+1", "x+1|y|z+1", "x+1|y-1|z+1", "x|y-1|z+1",
    "x-1|y-1|z+1", "x-1|y|z+1", "x-1|y+1|z+1", "x|y|z+1", "x|y+1|z-1", "x+1|y+1|z-1",
    "x+1|y|z-1", "x+1|y-1|z-1", "x|y-1|z-1", "x-1|y-1|z-1", "x-1|y|z-1", "x-1|y+1|z-1",
    "x|y|z-1",
];

/// Relative position of a neighbor: one signed delta per axis, for the first
/// one to three axes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeighborOffset(pub(crate) Vec<isize>);

impl NeighborOffset {
    /// Constructs an offset from per-axis deltas.
    pub fn new(deltas: Vec<isize>) -> EngineResult<Self> {
        if (1..=MAX_OFFSET_AXES).contains(&deltas.len()) {
            Ok(Self(deltas))
        } else {
            Err(EngineError::MalformedOffset {
                offset: format!("{:?}", deltas),
                reason: format!("expected 1 to {} axes", MAX_OFFSET_AXES),
            })
        }
    }

    /// Returns the delta along each axis.
    #[inline]
    pub fn deltas(&self) -> &[isize] {
        &self.0
    }

    /// Returns the number of axes the offset spans.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Returns whether every delta is zero.
    pub fn is_origin(&self) -> bool {
        self.0.iter().all(|&d| d == 0)
    }

    /// Returns the sum of all deltas, used to determine tile parity.
    pub(crate) fn delta_sum(&self) -> isize {
        self.0.iter().sum()
    }

    /// Compiles the offset into an extractor.
    pub fn extractor(&self) -> NeighborExtractor {
        NeighborExtractor {
            offset: self.clone(),
        }
    }
}

impl fmt::Display for NeighborOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = AXES.iter().zip(&self.0).map(|(axis, &delta)| {
            if delta == 0 {
                axis.name().to_owned()
            } else {
                format!("{}{:+}", axis.name(), delta)
            }
        });
        write!(f, "{}", tokens.format("|"))
    }
}

impl FromStr for NeighborOffset {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        let malformed = |reason: String| EngineError::MalformedOffset {
            offset: s.to_owned(),
            reason,
        };

        let tokens = s.split('|').collect_vec();
        if tokens.len() > MAX_OFFSET_AXES {
            return Err(malformed(format!(
                "expected 1 to {} axes; got {}",
                MAX_OFFSET_AXES,
                tokens.len()
            )));
        }

        let mut deltas = Vec::with_capacity(tokens.len());
        for (&axis, token) in AXES.iter().zip(tokens) {
            let captures = OFFSET_TOKEN_REGEX
                .captures(token)
                .ok_or_else(|| malformed(format!("invalid token {:?}", token)))?;
            let name = &captures[1];
            if !name.eq_ignore_ascii_case(axis.name()) {
                return Err(malformed(format!(
                    "expected axis {:?} but found {:?}",
                    axis.name(),
                    name
                )));
            }
            let delta = match (captures.get(2), captures.get(3)) {
                (Some(sign), Some(magnitude)) => {
                    let magnitude = isize::from_str(magnitude.as_str())
                        .map_err(|e| malformed(format!("bad magnitude: {}", e)))?;
                    if sign.as_str() == "-" {
                        -magnitude
                    } else {
                        magnitude
                    }
                }
                _ => 0,
            };
            deltas.push(delta);
        }
        Self::new(deltas)
    }
}

impl TryFrom<&str> for NeighborOffset {
    type Error = EngineError;

    fn try_from(s: &str) -> EngineResult<Self> {
        s.parse()
    }
}

/// Executable neighbor lookup compiled from a [`NeighborOffset`].
///
/// Lookups wrap toroidally on every axis: stepping before the first cell lands
/// on the last and stepping past the last lands on the first. Axes of the
/// population beyond those the offset spans are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborExtractor {
    offset: NeighborOffset,
}

impl NeighborExtractor {
    /// Returns the offset this extractor was compiled from.
    #[inline]
    pub fn offset(&self) -> &NeighborOffset {
        &self.offset
    }

    /// Returns the state of the neighbor of the cell at `coords`.
    ///
    /// # Panics
    ///
    /// This method panics if `coords` is not a position in `population`.
    #[inline]
    pub fn extract(&self, coords: &[usize], population: &Population) -> u8 {
        assert!(population.shape().contains(coords), "Position out of bounds");
        let idx: usize = coords
            .iter()
            .zip(population.extents())
            .zip(population.strides())
            .enumerate()
            .map(|(i, ((&c, &extent), &stride))| {
                let delta = self.offset.0.get(i).copied().unwrap_or(0);
                wrap(c, delta, extent) * stride
            })
            .sum();
        population.as_flat_slice()[idx]
    }
}

/// Returns `coord + delta` wrapped into `0..extent`.
#[inline]
fn wrap(coord: usize, delta: isize, extent: usize) -> usize {
    (coord as isize + delta).rem_euclid(extent as isize) as usize
}

/// Compiles a list of offset strings into extractors, one per string.
pub fn compile<S: AsRef<str>>(offsets: &[S]) -> EngineResult<Vec<NeighborExtractor>> {
    offsets
        .iter()
        .map(|s| Ok(s.as_ref().parse::<NeighborOffset>()?.extractor()))
        .collect()
}

/// Returns every offset within Chebyshev distance `radius` of the origin in
/// `ndim` dimensions, excluding the origin, with the first axis outermost.
pub fn moore_offsets(ndim: usize, radius: usize) -> EngineResult<Vec<NeighborOffset>> {
    if !(1..=MAX_OFFSET_AXES).contains(&ndim) {
        return Err(EngineError::MalformedOffset {
            offset: format!("Moore neighborhood in {} dimensions", ndim),
            reason: format!("expected 1 to {} axes", MAX_OFFSET_AXES),
        });
    }
    let r = radius as isize;
    Ok((0..ndim)
        .map(|_| -r..=r)
        .multi_cartesian_product()
        .map(NeighborOffset)
        .filter(|offset| !offset.is_origin())
        .collect())
}

fn moore_strings(ndim: usize, radius: usize) -> Vec<String> {
    moore_offsets(ndim, radius)
        .unwrap_or_default()
        .iter()
        .map(NeighborOffset::to_string)
        .collect()
}

/// Returns the offset strings of the 1D Moore neighborhood with the given
/// radius.
pub fn moore_neighbors_1d(radius: usize) -> Vec<String> {
    moore_strings(1, radius)
}
/// Returns the offset strings of the 2D Moore neighborhood with the given
/// radius.
pub fn moore_neighbors_2d(radius: usize) -> Vec<String> {
    moore_strings(2, radius)
}
/// Returns the offset strings of the 3D Moore neighborhood with the given
/// radius.
pub fn moore_neighbors_3d(radius: usize) -> Vec<String> {
    moore_strings(3, radius)
}
