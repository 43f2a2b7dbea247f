//! Enumeration of axes.
//!
//! Axes are ordered `x, y, z, w, u, v`. Every "axis-ascending" traversal in
//! this crate (shapes, populations, neighbor offsets) follows that order, with
//! the first axis outermost.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

pub use Axis::*;

/// Enumeration of the six axes a population may have.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis (outermost).
    X = 0,
    /// Y axis.
    Y = 1,
    /// Z axis.
    Z = 2,
    /// W axis (4th dimension).
    W = 3,
    /// U axis (5th dimension).
    U = 4,
    /// V axis (6th dimension).
    V = 5,
}

impl Axis {
    /// Returns the one-letter lowercase name of the axis, as used in neighbor
    /// offset strings.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::W => "w",
            Axis::U => "u",
            Axis::V => "v",
        }
    }

    /// Returns the position of the axis in axis-ascending order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the axis with the given one-letter name, ignoring case.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            'z' => Some(Axis::Z),
            'w' => Some(Axis::W),
            'u' => Some(Axis::U),
            'v' => Some(Axis::V),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Axis {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Axis::from_char(ch),
            _ => None,
        }
        .ok_or_else(|| EngineError::UnknownAxis(s.to_owned()))
    }
}

/// List of axes in order.
pub const AXES: &[Axis] = &[Axis::X, Axis::Y, Axis::Z, Axis::W, Axis::U, Axis::V];

/// Maximum number of axes in a shape.
pub const MAX_NDIM: usize = AXES.len();

/// Returns a list of axes up to some number of dimensions, or `None` if there
/// are not that many axes.
#[inline]
pub fn ndim_axes(ndim: usize) -> Option<&'static [Axis]> {
    AXES.get(..ndim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order() {
        assert_eq!(Some(&[X, Y, Z, W][..]), ndim_axes(4));
        assert!(X < Y && Y < Z && Z < W && W < U && U < V);
        assert_eq!(None, ndim_axes(7));
    }

    #[test]
    fn test_axis_names() {
        for &ax in AXES {
            assert_eq!(Ok(ax), ax.name().parse());
            assert_eq!(Ok(ax), ax.name().to_uppercase().parse());
        }
        assert!("q".parse::<Axis>().is_err());
        assert!("xy".parse::<Axis>().is_err());
    }
}
