//! Lattice topologies and the neighborhoods they induce.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{Neighborhood, NeighborOffset, Parity};
use crate::errors::{EngineError, EngineResult};
use crate::sim::rule::LifeLikeRule;

/// Radius-1 neighbors of an "up" triangle (even parity).
const TRI_UP: &[[isize; 2]] = &[[-1, 0], [1, 0], [0, -1], [-1, -1], [1, -1], [0, 1]];
/// Radius-1 neighbors of a "down" triangle (odd parity).
const TRI_DOWN: &[[isize; 2]] = &[[-1, 0], [1, 0], [0, 1], [-1, 1], [1, 1], [0, -1]];

/// Radius-1 neighbors of an octagon in the truncated square tiling (even
/// parity).
const TRUNC_SQ_OCTAGON: &[[isize; 2]] = &[
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, -1],
    [0, 1],
    [1, -1],
    [1, 0],
    [1, 1],
];
/// Radius-1 neighbors of a square in the truncated square tiling (odd parity).
const TRUNC_SQ_SQUARE: &[[isize; 2]] = &[[-1, 0], [1, 0], [0, -1], [0, 1]];

/// Face-diagonal neighbors in a face-centered cubic lattice.
const FCC_12: &[[isize; 3]] = &[
    [1, 1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [1, 0, -1],
    [-1, 0, 1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, 1, -1],
    [0, -1, 1],
    [0, -1, -1],
];

/// Hexagonal prism neighbors: six in the plane and seven in each adjacent
/// layer.
const HEX_PRISM_20: &[[isize; 3]] = &[
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [-1, 0, 1],
    [0, 1, 1],
    [0, -1, 1],
    [1, -1, 1],
    [-1, 1, 1],
    [0, 0, -1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, -1],
    [0, -1, -1],
    [1, -1, -1],
    [-1, 1, -1],
];

/// Lattice topology: how cells tile the plane or fill space, and therefore
/// which cells are adjacent.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topology {
    Square,
    Hexagonal,
    Triangular,
    TruncatedSquare,
    Cubic,
    Fcc,
    HexagonalPrism,
}

impl Default for Topology {
    fn default() -> Self {
        Topology::Square
    }
}

impl Topology {
    /// Every topology, 2D before 3D.
    pub const ALL: &'static [Topology] = &[
        Topology::Square,
        Topology::Hexagonal,
        Topology::Triangular,
        Topology::TruncatedSquare,
        Topology::Cubic,
        Topology::Fcc,
        Topology::HexagonalPrism,
    ];

    /// Returns the canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Topology::Square => "square",
            Topology::Hexagonal => "hexagonal",
            Topology::Triangular => "triangular",
            Topology::TruncatedSquare => "truncated_square",
            Topology::Cubic => "cubic",
            Topology::Fcc => "fcc",
            Topology::HexagonalPrism => "hexagonal_prism",
        }
    }

    /// Returns a short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Topology::Square => "Square",
            Topology::Hexagonal => "Hex",
            Topology::Triangular => "Tri",
            Topology::TruncatedSquare => "Trunc Sq",
            Topology::Cubic => "Cubic",
            Topology::Fcc => "FCC",
            Topology::HexagonalPrism => "Hex Prism",
        }
    }

    /// Returns the number of dimensions of the lattice (2 or 3).
    pub fn ndim(self) -> usize {
        match self {
            Topology::Square
            | Topology::Hexagonal
            | Topology::Triangular
            | Topology::TruncatedSquare => 2,
            Topology::Cubic | Topology::Fcc | Topology::HexagonalPrism => 3,
        }
    }

    /// Returns the largest number of radius-1 neighbors any cell has.
    pub fn neighbor_count(self) -> usize {
        match self {
            Topology::Square => 8,
            Topology::Hexagonal => 6,
            Topology::Triangular => 6,
            Topology::TruncatedSquare => 8,
            Topology::Cubic => 26,
            Topology::Fcc => 12,
            Topology::HexagonalPrism => 20,
        }
    }

    /// Returns whether cells have two orientations with different neighbors.
    pub fn is_parity_dependent(self) -> bool {
        matches!(self, Topology::Triangular | Topology::TruncatedSquare)
    }

    /// Returns the life-like rule that suits this lattice.
    pub fn default_rule(self) -> LifeLikeRule {
        match self {
            Topology::Square => LifeLikeRule::new(&[2, 3], &[3]),
            Topology::Hexagonal => LifeLikeRule::new(&[3, 4], &[2]),
            Topology::Triangular => LifeLikeRule::new(&[2, 3], &[2]),
            Topology::TruncatedSquare => LifeLikeRule::new(&[2, 3], &[3]),
            Topology::Cubic => LifeLikeRule::new(&[4, 5], &[5]),
            Topology::Fcc => LifeLikeRule::new(&[3, 4], &[4]),
            Topology::HexagonalPrism => LifeLikeRule::new(&[5, 6, 7], &[5]),
        }
    }

    /// Returns every topology with the given number of dimensions.
    pub fn for_dimension(ndim: usize) -> impl Iterator<Item = Topology> {
        Self::ALL.iter().copied().filter(move |t| t.ndim() == ndim)
    }

    /// Returns the topology used when none is configured.
    pub fn default_for_dimension(ndim: usize) -> Topology {
        if ndim == 3 {
            Topology::Cubic
        } else {
            Topology::Square
        }
    }

    /// Returns the neighborhood of this topology with the given radius.
    pub fn neighborhood(self, radius: usize) -> Neighborhood {
        neighborhood(self, radius)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Topology {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(|c: char| c == '-' || c == ' ', "_");
        match normalized.as_str() {
            "square" | "sq" => Ok(Topology::Square),
            "hexagonal" | "hex" => Ok(Topology::Hexagonal),
            "triangular" | "tri" => Ok(Topology::Triangular),
            "truncated_square" | "trunc_sq" => Ok(Topology::TruncatedSquare),
            "cubic" | "cube" => Ok(Topology::Cubic),
            "fcc" => Ok(Topology::Fcc),
            "hexagonal_prism" | "hex_prism" => Ok(Topology::HexagonalPrism),
            _ => Err(EngineError::UnknownTopology(s.to_owned())),
        }
    }
}

/// Returns the neighborhood of a topology with the given radius.
///
/// Offsets within each parity set are sorted lexicographically. Radius 0
/// yields an empty neighborhood.
pub fn neighborhood(topology: Topology, radius: usize) -> Neighborhood {
    let r = radius as isize;
    match topology {
        Topology::Square | Topology::Cubic => Neighborhood::from_offsets(
            super::moore_offsets(topology.ndim(), radius).unwrap_or_default(),
        ),
        Topology::Hexagonal => Neighborhood::from_offsets(
            (-r..=r)
                .flat_map(|dq| (-r..=r).map(move |dr| [dq, dr]))
                .filter(|&[dq, dr]| (dq, dr) != (0, 0))
                .filter(|&[dq, dr]| dq.abs().max(dr.abs()).max((dq + dr).abs()) <= r)
                .map(|d| NeighborOffset(d.to_vec())),
        ),
        Topology::Triangular => parity_bfs(to_offsets(TRI_UP), to_offsets(TRI_DOWN), radius),
        Topology::TruncatedSquare => parity_bfs(
            to_offsets(TRUNC_SQ_OCTAGON),
            to_offsets(TRUNC_SQ_SQUARE),
            radius,
        ),
        Topology::Fcc => {
            let base = to_offsets(FCC_12);
            Neighborhood::from_offsets(bfs(3, radius, Parity::Even, |_| &base))
        }
        Topology::HexagonalPrism => {
            let base = to_offsets(HEX_PRISM_20);
            Neighborhood::from_offsets(bfs(3, radius, Parity::Even, |_| &base))
        }
    }
}

/// Expands parity-dependent radius-1 offsets to `radius`, once from an even
/// origin and once from an odd one.
fn parity_bfs(
    even_base: Vec<NeighborOffset>,
    odd_base: Vec<NeighborOffset>,
    radius: usize,
) -> Neighborhood {
    let base_for = |parity: Parity| match parity {
        Parity::Even => &even_base,
        Parity::Odd => &odd_base,
    };
    Neighborhood::from_parity_offsets(
        bfs(2, radius, Parity::Even, base_for),
        bfs(2, radius, Parity::Odd, base_for),
    )
}

/// Breadth-first expansion from the origin for exactly `radius` steps, using
/// `base_for(parity)` as the edges leaving a cell of that parity. Returns
/// every visited offset except the origin.
fn bfs<'a>(
    ndim: usize,
    radius: usize,
    origin_parity: Parity,
    base_for: impl Fn(Parity) -> &'a Vec<NeighborOffset>,
) -> Vec<NeighborOffset> {
    let origin = NeighborOffset(vec![0; ndim]);
    let mut visited = BTreeSet::new();
    visited.insert(origin.clone());
    let mut frontier = vec![origin.clone()];
    for _ in 0..radius {
        let mut next_frontier = vec![];
        for cell in &frontier {
            for edge in base_for(origin_parity.shifted_by(cell)) {
                let neighbor = add(cell, edge);
                if visited.insert(neighbor.clone()) {
                    next_frontier.push(neighbor);
                }
            }
        }
        frontier = next_frontier;
    }
    visited.remove(&origin);
    visited.into_iter().collect()
}

fn add(a: &NeighborOffset, b: &NeighborOffset) -> NeighborOffset {
    NeighborOffset(a.0.iter().zip(&b.0).map(|(x, y)| x + y).collect())
}

fn to_offsets<const N: usize>(table: &[[isize; N]]) -> Vec<NeighborOffset> {
    table.iter().map(|d| NeighborOffset(d.to_vec())).collect()
}
