//! Population shapes: a positive extent for each axis.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

use crate::axis::{ndim_axes, Axis, MAX_NDIM};
use crate::errors::{EngineError, EngineResult};

/// Mapping from axis to a positive extent.
///
/// A shape always has at least one axis and at most six. Axes need not be
/// contiguous (a shape may have only `x` and `z`), but all iteration happens
/// in axis-ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Axis, i64>", into = "BTreeMap<Axis, i64>")]
pub struct Shape {
    extents: BTreeMap<Axis, usize>,
}

impl Shape {
    /// Constructs a shape from axis/extent pairs. If an axis appears more
    /// than once, the last extent wins.
    pub fn new(extents: impl IntoIterator<Item = (Axis, usize)>) -> EngineResult<Self> {
        let extents: BTreeMap<Axis, usize> = extents.into_iter().collect();
        if extents.is_empty() {
            return Err(EngineError::EmptyShape);
        }
        if let Some((&axis, _)) = extents.iter().find(|(_, &extent)| extent == 0) {
            return Err(EngineError::InvalidExtent { axis, extent: 0 });
        }
        Ok(Self { extents })
    }

    /// Constructs a shape from a list of extents, assigning axes in order
    /// starting from `x`.
    pub fn with_extents(extents: &[usize]) -> EngineResult<Self> {
        let axes = ndim_axes(extents.len()).ok_or(EngineError::TooManyAxes(extents.len()))?;
        Self::new(axes.iter().copied().zip(extents.iter().copied()))
    }

    /// Returns the number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.extents.len()
    }

    /// Returns the axes of the shape in ascending order.
    pub fn axes(&self) -> impl '_ + Iterator<Item = Axis> {
        self.extents.keys().copied()
    }

    /// Returns the extent along an axis, or `None` if the shape does not have
    /// that axis.
    pub fn extent(&self, axis: Axis) -> Option<usize> {
        self.extents.get(&axis).copied()
    }

    /// Returns the extents in axis-ascending order.
    pub fn extents(&self) -> Vec<usize> {
        self.extents.values().copied().collect()
    }

    /// Returns the total number of cells.
    pub fn cell_count(&self) -> usize {
        self.extents.values().product()
    }

    /// Returns the flat-buffer stride of each axis in axis-ascending order.
    /// The last axis always has stride 1.
    pub fn strides(&self) -> Vec<usize> {
        let extents = self.extents();
        let mut strides = vec![1; extents.len()];
        for i in (0..extents.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * extents[i + 1];
        }
        strides
    }

    /// Returns whether both shapes have exactly the same axes.
    pub fn has_same_axes(&self, other: &Shape) -> bool {
        self.axes().eq(other.axes())
    }

    /// Returns an error unless both shapes have exactly the same axes.
    pub(crate) fn check_same_axes(&self, other: &Shape) -> EngineResult<()> {
        if self.has_same_axes(other) {
            Ok(())
        } else {
            Err(EngineError::AxisMismatch {
                expected: self.axes().join(","),
                got: other.axes().join(","),
            })
        }
    }

    /// Returns whether `coords` is a valid position in this shape.
    pub fn contains(&self, coords: &[usize]) -> bool {
        coords.len() == self.ndim()
            && coords
                .iter()
                .zip(self.extents.values())
                .all(|(&c, &extent)| c < extent)
    }

    /// Returns an iterator over every position in the shape, in
    /// axis-ascending row-major order.
    pub fn iter_coords(&self) -> CoordsIter {
        CoordsIter {
            extents: self.extents(),
            next: Some(vec![0; self.ndim()]),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.extents
                .iter()
                .map(|(axis, extent)| format!("{}: {}", axis, extent))
                .join(", ")
        )
    }
}

impl TryFrom<BTreeMap<Axis, i64>> for Shape {
    type Error = EngineError;

    fn try_from(extents: BTreeMap<Axis, i64>) -> EngineResult<Self> {
        if extents.len() > MAX_NDIM {
            return Err(EngineError::TooManyAxes(extents.len()));
        }
        let mut ret = BTreeMap::new();
        for (axis, extent) in extents {
            match usize::try_from(extent) {
                Ok(n) if n > 0 => {
                    ret.insert(axis, n);
                }
                _ => return Err(EngineError::InvalidExtent { axis, extent }),
            }
        }
        Self::new(ret)
    }
}

impl From<Shape> for BTreeMap<Axis, i64> {
    fn from(shape: Shape) -> Self {
        shape
            .extents
            .into_iter()
            .map(|(axis, extent)| (axis, extent as i64))
            .collect()
    }
}

/// Iterator over all positions in a shape, produced by
/// [`Shape::iter_coords()`].
#[derive(Debug, Clone)]
pub struct CoordsIter {
    extents: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Iterator for CoordsIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let ret = self.next.take()?;
        // Odometer increment, last axis fastest.
        let mut next = ret.clone();
        for i in (0..next.len()).rev() {
            next[i] += 1;
            if next[i] < self.extents[i] {
                self.next = Some(next);
                break;
            }
            next[i] = 0;
        }
        Some(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{X, Y, Z};

    #[test]
    fn test_shape_validation() {
        assert_eq!(Err(EngineError::EmptyShape), Shape::new(vec![]));
        assert_eq!(
            Err(EngineError::InvalidExtent { axis: Y, extent: 0 }),
            Shape::new(vec![(X, 3), (Y, 0)]),
        );
        assert_eq!(
            Err(EngineError::TooManyAxes(7)),
            Shape::with_extents(&[1; 7]),
        );
        let negative: BTreeMap<Axis, i64> = vec![(X, 4), (Z, -2)].into_iter().collect();
        assert_eq!(
            Err(EngineError::InvalidExtent { axis: Z, extent: -2 }),
            Shape::try_from(negative),
        );
    }

    #[test]
    fn test_shape_axis_order() {
        let shape = Shape::new(vec![(Z, 2), (X, 4), (Y, 3)]).unwrap();
        assert_eq!(vec![X, Y, Z], shape.axes().collect::<Vec<_>>());
        assert_eq!(vec![4, 3, 2], shape.extents());
        assert_eq!(vec![6, 2, 1], shape.strides());
        assert_eq!(24, shape.cell_count());
        assert_eq!("{x: 4, y: 3, z: 2}", shape.to_string());
    }

    #[test]
    fn test_shape_iter_coords() {
        let shape = Shape::with_extents(&[2, 3]).unwrap();
        let coords: Vec<Vec<usize>> = shape.iter_coords().collect();
        assert_eq!(
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ],
            coords,
        );
        assert!(coords.iter().all(|c| shape.contains(c)));
        assert!(!shape.contains(&[2, 0]));
        assert!(!shape.contains(&[0]));
    }
}
