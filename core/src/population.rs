//! Creating, resizing and stepping populations.
//!
//! A population is an N-dimensional grid of binary cells. Every operation here
//! is pure: inputs are borrowed and a new population is returned.

use itertools::Itertools;
use rand::Rng;

use crate::errors::{EngineError, EngineResult};
use crate::ndarray::{unflatten_idx, NdArray};
use crate::shape::Shape;

/// Default probability that a seeded cell is alive.
pub const DEFAULT_DENSITY: f64 = 0.5;

/// N-dimensional grid of binary cell states (`0` or `1`).
pub type Population = NdArray<u8>;

/// Returns an error unless `density` is a probability.
pub fn check_density(density: f64) -> EngineResult<()> {
    if (0.0..=1.0).contains(&density) {
        Ok(())
    } else {
        Err(EngineError::InvalidDensity(density))
    }
}

/// Creates a population matching `shape` in which each cell is independently
/// alive with probability `density`.
pub fn seed<R: Rng + ?Sized>(shape: &Shape, density: f64, rng: &mut R) -> EngineResult<Population> {
    check_density(density)?;
    let cells = (0..shape.cell_count())
        .map(|_| rng.random_bool(density) as u8)
        .collect_vec();
    Ok(Population::from_flat_slice(shape.clone(), cells))
}

/// Resizes a population to `new_shape`.
///
/// Each axis is adjusted independently: growing appends dead cells at the end
/// of the axis and shrinking truncates from the end. Both shapes must have the
/// same axes.
pub fn resize(population: &Population, new_shape: &Shape) -> EngineResult<Population> {
    population.shape().check_same_axes(new_shape)?;
    if population.shape() == new_shape {
        return Ok(population.clone());
    }
    Ok(Population::from_fn(new_shape.clone(), |pos| {
        population.get(&pos).copied().unwrap_or(0)
    }))
}

/// Computes the next generation of a population.
///
/// `transition` is called once for every position in axis-ascending row-major
/// order and is always given the full population from before the step, so no
/// newly-computed cell is ever visible to another cell's transition.
pub fn step(
    population: &Population,
    mut transition: impl FnMut(&[usize], &Population) -> u8,
) -> Population {
    Population::from_fn(population.shape().clone(), |pos| {
        transition(&pos, population)
    })
}

impl Population {
    /// Returns the number of live cells.
    pub fn live_count(&self) -> usize {
        self.as_flat_slice().iter().filter(|&&cell| cell == 1).count()
    }

    /// Returns the positions of all live cells in row-major order.
    pub fn live_cells(&self) -> Vec<Vec<usize>> {
        self.as_flat_slice()
            .iter()
            .positions(|&cell| cell == 1)
            .map(|idx| unflatten_idx(self.shape(), idx))
            .collect()
    }

    /// Creates a population of dead cells with live cells at the given
    /// positions. Out-of-bounds positions are ignored.
    pub fn with_live_cells<'a>(
        shape: Shape,
        live: impl IntoIterator<Item = &'a [usize]>,
    ) -> Self {
        let mut ret = Self::filled(shape, 0);
        for pos in live {
            if ret.shape().contains(pos) {
                ret[pos] = 1;
            }
        }
        ret
    }

    /// Converts the population to nested sequences, outermost axis first.
    pub fn to_nested(&self) -> NestedCells {
        fn build(extents: &[usize], cells: &[u8]) -> NestedCells {
            match extents {
                [] | [_] => NestedCells::Cells(cells.to_vec()),
                [len, inner @ ..] => {
                    let chunk = cells.len() / len;
                    NestedCells::Nested(cells.chunks(chunk).map(|c| build(inner, c)).collect())
                }
            }
        }
        build(&self.shape().extents(), self.as_flat_slice())
    }

    /// Creates a population from nested sequences, assigning axes in order
    /// starting from `x`.
    pub fn from_nested(nested: &NestedCells) -> EngineResult<Self> {
        let extents = nested.extents()?;
        let shape = Shape::with_extents(&extents)?;
        let mut cells = Vec::with_capacity(shape.cell_count());
        nested.flatten_into(&mut cells);
        Ok(Self::from_flat_slice(shape, cells))
    }
}

/// Population cells as nested sequences, the way renderers and configuration
/// layers usually hold them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedCells {
    /// Innermost axis.
    Cells(Vec<u8>),
    /// Any other axis.
    Nested(Vec<NestedCells>),
}

impl NestedCells {
    /// Returns the extent along each axis, checking that no level is ragged.
    fn extents(&self) -> EngineResult<Vec<usize>> {
        match self {
            NestedCells::Cells(cells) if !cells.is_empty() => Ok(vec![cells.len()]),
            NestedCells::Nested(children) if !children.is_empty() => {
                let inner = children
                    .iter()
                    .map(NestedCells::extents)
                    .collect::<EngineResult<Vec<_>>>()?;
                if !inner.iter().all_equal() {
                    return Err(EngineError::RaggedCells);
                }
                let mut ret = vec![children.len()];
                ret.extend_from_slice(&inner[0]);
                Ok(ret)
            }
            _ => Err(EngineError::RaggedCells),
        }
    }

    fn flatten_into(&self, out: &mut Vec<u8>) {
        match self {
            NestedCells::Cells(cells) => out.extend(cells.iter().map(|&c| (c != 0) as u8)),
            NestedCells::Nested(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::axis::{X, Y, Z};

    fn proptest_shape() -> impl Strategy<Value = Shape> {
        prop::collection::vec(1..6_usize, 1..=4)
            .prop_map(|extents| Shape::with_extents(&extents).unwrap())
    }

    proptest! {
        /// Tests that seeded populations always match their shape exactly.
        #[test]
        fn test_seed_matches_shape(
            shape in proptest_shape(),
            density in 0.0..1.0_f64,
            rng_seed: u64,
        ) {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let population = seed(&shape, density, &mut rng).unwrap();
            prop_assert_eq!(&shape, population.shape());
            prop_assert_eq!(shape.cell_count(), population.as_flat_slice().len());
            prop_assert!(population.as_flat_slice().iter().all(|&c| c <= 1));
            // Nested form has exactly the shape's extents at every level.
            let nested = population.to_nested();
            prop_assert_eq!(Ok(shape.extents()), nested.extents());
            prop_assert_eq!(Ok(population), Population::from_nested(&nested));
        }

        /// Tests that resizing to the same shape changes nothing.
        #[test]
        fn test_resize_idempotent(shape in proptest_shape(), rng_seed: u64) {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let population = seed(&shape, DEFAULT_DENSITY, &mut rng).unwrap();
            prop_assert_eq!(Ok(population.clone()), resize(&population, &shape));
        }

        /// Tests that growing and then shrinking back restores the original.
        #[test]
        fn test_resize_grow_shrink(
            extents in prop::collection::vec(1..5_usize, 2),
            growth in prop::collection::vec(0..3_usize, 2),
            rng_seed: u64,
        ) {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let shape = Shape::with_extents(&extents).unwrap();
            let grown_extents = extents.iter().zip(&growth).map(|(a, b)| a + b).collect_vec();
            let grown_shape = Shape::with_extents(&grown_extents).unwrap();
            let population = seed(&shape, DEFAULT_DENSITY, &mut rng).unwrap();
            let grown = resize(&population, &grown_shape).unwrap();
            prop_assert_eq!(population.live_count(), grown.live_count());
            prop_assert_eq!(Ok(population), resize(&grown, &shape));
        }
    }

    #[test]
    fn test_seed_density_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let shape = Shape::with_extents(&[4, 4]).unwrap();
        assert_eq!(0, seed(&shape, 0.0, &mut rng).unwrap().live_count());
        assert_eq!(16, seed(&shape, 1.0, &mut rng).unwrap().live_count());
        assert_eq!(
            Err(EngineError::InvalidDensity(1.5)),
            seed(&shape, 1.5, &mut rng),
        );
    }

    #[test]
    fn test_resize_pads_and_truncates() {
        // x = 0: 1 0
        // x = 1: 0 1
        let shape = Shape::with_extents(&[2, 2]).unwrap();
        let population = Population::from_flat_slice(shape, vec![1, 0, 0, 1]);
        let wide = Shape::with_extents(&[1, 3]).unwrap();
        assert_eq!(
            &[1, 0, 0][..],
            resize(&population, &wide).unwrap().as_flat_slice(),
        );
        let tall = Shape::with_extents(&[3, 1]).unwrap();
        assert_eq!(
            &[1, 0, 0][..],
            resize(&population, &tall).unwrap().as_flat_slice(),
        );
        let other_axes = Shape::new(vec![(X, 2), (Z, 2)]).unwrap();
        assert!(matches!(
            resize(&population, &other_axes),
            Err(EngineError::AxisMismatch { .. }),
        ));
        // The input was not touched.
        assert_eq!(&[1, 0, 0, 1][..], population.as_flat_slice());
    }

    #[test]
    fn test_step_sees_pre_step_population() {
        // Each cell becomes its left neighbor's state. If writes were visible
        // the single live cell would smear across the whole row.
        let shape = Shape::new(vec![(X, 5)]).unwrap();
        let population = Population::from_flat_slice(shape, vec![1, 0, 0, 0, 0]);
        let next = step(&population, |pos, pre| {
            let left = (pos[0] + 4) % 5;
            pre[&[left][..]]
        });
        assert_eq!(&[0, 1, 0, 0, 0][..], next.as_flat_slice());
        assert_eq!(vec![vec![1]], next.live_cells());
    }

    #[test]
    fn test_nested_ragged() {
        let ragged = NestedCells::Nested(vec![
            NestedCells::Cells(vec![0, 1]),
            NestedCells::Cells(vec![1]),
        ]);
        assert_eq!(Err(EngineError::RaggedCells), Population::from_nested(&ragged));
        assert_eq!(
            Err(EngineError::RaggedCells),
            Population::from_nested(&NestedCells::Nested(vec![])),
        );
        let shape = Shape::new(vec![(X, 2), (Y, 1)]).unwrap();
        let population = Population::with_live_cells(shape, vec![&[1, 0][..]]);
        assert_eq!(
            NestedCells::Nested(vec![NestedCells::Cells(vec![0]), NestedCells::Cells(vec![1])]),
            population.to_nested(),
        );
    }
}
