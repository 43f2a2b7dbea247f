//! N-dimensional arrays.

use itertools::Itertools;
use std::ops::{Index, IndexMut};

use crate::shape::Shape;

/// N-dimensional array of values of type `T`, with the minimum coordinate 0
/// along every axis.
///
/// Elements are stored in a flat buffer in row-major order: the first axis
/// varies slowest, so the flat order is the same as a depth-first walk over the
/// equivalent nested arrays (`array[x][y][z]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdArray<T> {
    shape: Shape,
    extents: Box<[usize]>,
    strides: Box<[usize]>,
    data: Box<[T]>,
}

impl<T> Index<&[usize]> for NdArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: &[usize]) -> &T {
        &self.data[self.flatten_idx(pos)]
    }
}
impl<T> IndexMut<&[usize]> for NdArray<T> {
    #[inline]
    fn index_mut(&mut self, pos: &[usize]) -> &mut T {
        let idx = self.flatten_idx(pos);
        &mut self.data[idx]
    }
}

impl<T> NdArray<T> {
    /// Creates an `NdArray` from a flat vector.
    ///
    /// # Panics
    ///
    /// This function panics if the length of `data` does not match `shape`.
    #[inline]
    pub fn from_flat_slice(shape: Shape, data: impl Into<Box<[T]>>) -> Self {
        let data = data.into();
        assert_eq!(shape.cell_count(), data.len(), "Wrong size for NdArray");
        let extents = shape.extents().into_boxed_slice();
        let strides = shape.strides().into_boxed_slice();
        Self {
            shape,
            extents,
            strides,
            data,
        }
    }

    /// Creates an `NdArray` by calling `f` on every position, in row-major
    /// order.
    pub fn from_fn(shape: Shape, f: impl FnMut(Vec<usize>) -> T) -> Self {
        let data = shape.iter_coords().map(f).collect_vec();
        Self::from_flat_slice(shape, data)
    }

    /// Returns the flat data behind the array.
    #[inline]
    pub fn as_flat_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the flat data behind the array.
    #[inline]
    pub fn into_flat_slice(self) -> Box<[T]> {
        self.data
    }

    /// Returns the shape of the array.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the extent along each axis, in axis-ascending order.
    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Returns the flat-buffer stride of each axis.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the number of dimensions of the array.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.strides.len()
    }

    /// Returns the element at `pos`, or `None` if `pos` is out of bounds.
    pub fn get(&self, pos: &[usize]) -> Option<&T> {
        if self.shape.contains(pos) {
            Some(&self[pos])
        } else {
            None
        }
    }

    /// Returns an iterator over all the elements in the array, enumerated by
    /// their positions.
    #[inline]
    pub fn iter_enumerated<'a>(&'a self) -> impl 'a + Iterator<Item = (Vec<usize>, &T)> {
        self.shape.iter_coords().zip(&*self.data)
    }

    /// Creates a new array of the same shape by applying a function to every
    /// element in the array.
    #[inline]
    #[must_use = "This method returns a new value instead of mutating its input"]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> NdArray<U> {
        NdArray::from_flat_slice(self.shape.clone(), self.data.iter().map(f).collect_vec())
    }

    /// Returns the index into `data` corresponding to a position.
    #[inline]
    pub(crate) fn flatten_idx(&self, pos: &[usize]) -> usize {
        flatten_idx(&self.strides, pos)
    }
}

impl<T: Clone> NdArray<T> {
    /// Creates an array with every element set to `value`.
    pub fn filled(shape: Shape, value: T) -> Self {
        let data = vec![value; shape.cell_count()];
        Self::from_flat_slice(shape, data)
    }
}

/// Converts a position into a "flattened" `usize` array index, given the
/// strides of each axis.
fn flatten_idx(strides: &[usize], pos: &[usize]) -> usize {
    assert_eq!(strides.len(), pos.len(), "Wrong number of axes for NdArray");
    pos.iter().zip(strides).map(|(&p, &stride)| p * stride).sum()
}

/// Converts a "flattened" `usize` array index into a position for an array
/// with the given shape.
pub(crate) fn unflatten_idx(shape: &Shape, mut idx: usize) -> Vec<usize> {
    assert!(idx < shape.cell_count());
    let extents = shape.extents();
    let mut ret = vec![0; extents.len()];
    for (i, &extent) in extents.iter().enumerate().rev() {
        ret[i] = idx % extent;
        idx /= extent;
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests `flatten_idx()` and `unflatten_idx()`.
    #[test]
    fn test_ndarray_flatten_unflatten_idx() {
        let shape = Shape::with_extents(&[4, 5, 6, 7]).unwrap();
        let strides = shape.strides();
        let count = shape.cell_count();
        let mut last_index = None;
        for pos in shape.iter_coords() {
            let flat_idx = flatten_idx(&strides, &pos);
            assert!(flat_idx < count);
            assert_eq!(pos, unflatten_idx(&shape, flat_idx));
            if let Some(last) = last_index {
                assert_eq!(flat_idx, last + 1);
            }
            last_index = Some(flat_idx);
        }
    }

    #[test]
    fn test_ndarray_index() {
        // x = 0: 0 1 2
        // x = 1: 3 4 5
        let shape = Shape::with_extents(&[2, 3]).unwrap();
        let mut array = NdArray::from_flat_slice(shape, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(5, array[&[1, 2][..]]);
        assert_eq!(1, array[&[0, 1][..]]);
        array[&[1, 0][..]] = 9;
        assert_eq!(&[0, 1, 2, 9, 4, 5][..], array.as_flat_slice());
        assert_eq!(None, array.get(&[2, 0]));
        assert_eq!(Some(&9), array.get(&[1, 0]));
    }

    #[test]
    fn test_ndarray_from_fn() {
        let shape = Shape::with_extents(&[3, 2]).unwrap();
        let array = NdArray::from_fn(shape, |pos| pos[0] * 10 + pos[1]);
        for (pos, &value) in array.iter_enumerated() {
            assert_eq!(pos[0] * 10 + pos[1], value);
        }
        assert_eq!(array.map(|&v| v + 1)[&[2, 1][..]], 22);
    }
}
