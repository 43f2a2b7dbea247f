//! Neighborhoods: which cells are consulted to compute a cell's next state.

pub mod lattice;
pub mod offset;

use itertools::Itertools;

use crate::errors::{EngineError, EngineResult};
pub use lattice::{neighborhood, Topology};
pub use offset::{
    compile, moore_neighbors_1d, moore_neighbors_2d, moore_neighbors_3d, moore_offsets,
    NeighborExtractor, NeighborOffset, MAX_OFFSET_AXES, MOORE_1D, MOORE_2D, MOORE_3D,
};

/// Orientation parity of a tile, `(x + y) mod 2`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Parity {
    /// `(x + y)` is even ("up" triangles, octagons).
    Even,
    /// `(x + y)` is odd ("down" triangles, squares).
    Odd,
}

impl Parity {
    /// Returns the parity of the tile at `coords`, considering the first two
    /// axes.
    #[inline]
    pub fn of(coords: &[usize]) -> Self {
        Self::from_sum(coords.iter().take(2).sum::<usize>() as isize)
    }

    /// Returns `Even` if `n` is even, or `Odd` otherwise.
    #[inline]
    pub fn from_sum(n: isize) -> Self {
        if n.rem_euclid(2) == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Returns the parity of a tile displaced by `offset` from a tile with this
    /// parity.
    #[inline]
    pub fn shifted_by(self, offset: &NeighborOffset) -> Self {
        match (self, Self::from_sum(offset.delta_sum())) {
            (a, Parity::Even) => a,
            (Parity::Even, Parity::Odd) => Parity::Odd,
            (Parity::Odd, Parity::Odd) => Parity::Even,
        }
    }
}

/// Compiled set of neighbor extractors.
///
/// Most lattices use the same offsets for every cell. Lattices with two tile
/// orientations (triangular, truncated square) use a different set depending on
/// the [`Parity`] of the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Neighborhood {
    /// Same offsets for every cell.
    Uniform(Vec<NeighborExtractor>),
    /// Offsets depend on the parity of the cell.
    Parity {
        /// Offsets for cells where `(x + y)` is even.
        even: Vec<NeighborExtractor>,
        /// Offsets for cells where `(x + y)` is odd.
        odd: Vec<NeighborExtractor>,
    },
}

impl Neighborhood {
    /// Constructs a uniform neighborhood from offsets.
    pub fn from_offsets(offsets: impl IntoIterator<Item = NeighborOffset>) -> Self {
        Neighborhood::Uniform(offsets.into_iter().map(|o| o.extractor()).collect())
    }

    /// Constructs a parity-dependent neighborhood from offsets.
    pub fn from_parity_offsets(
        even: impl IntoIterator<Item = NeighborOffset>,
        odd: impl IntoIterator<Item = NeighborOffset>,
    ) -> Self {
        Neighborhood::Parity {
            even: even.into_iter().map(|o| o.extractor()).collect(),
            odd: odd.into_iter().map(|o| o.extractor()).collect(),
        }
    }

    /// Compiles a uniform neighborhood from offset strings.
    pub fn from_strings<S: AsRef<str>>(offsets: &[S]) -> EngineResult<Self> {
        compile(offsets).map(Neighborhood::Uniform)
    }

    /// Returns the Moore neighborhood of the given radius in 1 to 3
    /// dimensions.
    pub fn moore(ndim: usize, radius: usize) -> EngineResult<Self> {
        moore_offsets(ndim, radius).map(Self::from_offsets)
    }

    /// Returns the extractors that apply to the cell at `coords`.
    #[inline]
    pub fn extractors_at(&self, coords: &[usize]) -> &[NeighborExtractor] {
        match self {
            Neighborhood::Uniform(extractors) => extractors,
            Neighborhood::Parity { even, odd } => match Parity::of(coords) {
                Parity::Even => even,
                Parity::Odd => odd,
            },
        }
    }

    /// Returns the offsets that apply to the cell at `coords`.
    pub fn offsets_at(&self, coords: &[usize]) -> Vec<&NeighborOffset> {
        self.offsets(Parity::of(coords))
    }

    /// Returns the extractors that apply to cells with the given parity.
    pub fn extractors_for(&self, parity: Parity) -> &[NeighborExtractor] {
        match (self, parity) {
            (Neighborhood::Uniform(extractors), _) => extractors,
            (Neighborhood::Parity { even, .. }, Parity::Even) => even,
            (Neighborhood::Parity { odd, .. }, Parity::Odd) => odd,
        }
    }

    /// Returns the offsets that apply to cells with the given parity.
    pub fn offsets(&self, parity: Parity) -> Vec<&NeighborOffset> {
        self.extractors_for(parity)
            .iter()
            .map(NeighborExtractor::offset)
            .collect()
    }

    /// Returns the offset strings that apply to cells with the given parity.
    pub fn offset_strings(&self, parity: Parity) -> Vec<String> {
        self.offsets(parity).iter().map(|o| o.to_string()).collect()
    }

    /// Returns whether the offsets depend on the parity of the cell.
    pub fn is_parity_dependent(&self) -> bool {
        matches!(self, Neighborhood::Parity { .. })
    }

    /// Returns the largest number of neighbors any cell has.
    pub fn max_len(&self) -> usize {
        match self {
            Neighborhood::Uniform(extractors) => extractors.len(),
            Neighborhood::Parity { even, odd } => even.len().max(odd.len()),
        }
    }

    /// Returns whether no cell has any neighbors.
    pub fn is_empty(&self) -> bool {
        self.max_len() == 0
    }

    /// Returns the number of axes spanned by the widest offset.
    pub fn ndim(&self) -> usize {
        let widest = |extractors: &[NeighborExtractor]| {
            extractors.iter().map(|e| e.offset().ndim()).max().unwrap_or(0)
        };
        match self {
            Neighborhood::Uniform(extractors) => widest(extractors),
            Neighborhood::Parity { even, odd } => widest(even).max(widest(odd)),
        }
    }

    /// Returns an error unless the neighborhood can be used on a population
    /// with `ndim` axes.
    pub fn check_ndim(&self, ndim: usize) -> EngineResult<()> {
        let own_ndim = self.ndim();
        let min_ndim = if self.is_parity_dependent() { 2 } else { 1 };
        if own_ndim <= ndim && min_ndim <= ndim {
            Ok(())
        } else {
            let offsets = match self {
                Neighborhood::Uniform(extractors) => extractors,
                Neighborhood::Parity { even, .. } => even,
            };
            Err(EngineError::MalformedOffset {
                offset: offsets.iter().map(|e| e.offset()).join(", "),
                reason: format!(
                    "neighborhood spans {} axes but the population has {}",
                    own_ndim.max(min_ndim),
                    ndim
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity() {
        assert_eq!(Parity::Even, Parity::of(&[0, 0]));
        assert_eq!(Parity::Odd, Parity::of(&[3, 4, 1]));
        assert_eq!(Parity::Even, Parity::of(&[3, 5, 1]));
        let offset: NeighborOffset = "x-1|y".parse().unwrap();
        assert_eq!(Parity::Odd, Parity::Even.shifted_by(&offset));
        assert_eq!(Parity::Even, Parity::Odd.shifted_by(&offset));
        let offset: NeighborOffset = "x+1|y+1".parse().unwrap();
        assert_eq!(Parity::Odd, Parity::Odd.shifted_by(&offset));
    }

    #[test]
    fn test_neighborhood_ndim_check() {
        let moore_2d = Neighborhood::from_strings(MOORE_2D).unwrap();
        assert_eq!(2, moore_2d.ndim());
        assert!(moore_2d.check_ndim(2).is_ok());
        assert!(moore_2d.check_ndim(4).is_ok());
        assert!(matches!(
            moore_2d.check_ndim(1),
            Err(EngineError::MalformedOffset { .. })
        ));
        let tri = neighborhood(Topology::Triangular, 1);
        assert!(tri.check_ndim(1).is_err());
        assert!(Neighborhood::moore(1, 0).unwrap().check_ndim(1).is_ok());
    }

    #[test]
    fn test_extractors_at_parity() {
        let tri = neighborhood(Topology::Triangular, 1);
        assert_eq!(tri.extractors_for(Parity::Even), tri.extractors_at(&[2, 4]));
        assert_eq!(tri.extractors_for(Parity::Odd), tri.extractors_at(&[2, 3]));
        assert_ne!(tri.offsets(Parity::Even), tri.offsets(Parity::Odd));
        assert_eq!(tri.offsets(Parity::Odd), tri.offsets_at(&[0, 1]));
    }
}
