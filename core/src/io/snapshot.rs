//! Bit-packed population snapshots.
//!
//! Cells are packed eight per byte in row-major order, most significant bit
//! first. Any padding bits in the final byte are zero.

use itertools::Itertools;
use std::fmt;

use crate::errors::{EngineError, EngineResult};
use crate::population::Population;
use crate::shape::Shape;

/// Compact immutable encoding of one generation.
///
/// A snapshot does not record its shape, only the number of cells; it is
/// unpacked using the shape of the session it belongs to.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Snapshot {
    cell_count: usize,
    bytes: Box<[u8]>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot({} cells, {} live)",
            self.cell_count,
            self.live_count()
        )
    }
}

impl Snapshot {
    /// Packs a population into a snapshot.
    pub fn pack(population: &Population) -> Self {
        let cells = population.as_flat_slice();
        Self {
            cell_count: cells.len(),
            bytes: pack_bits(cells).into_boxed_slice(),
        }
    }

    /// Reconstructs the population, which must have the given shape.
    pub fn unpack(&self, shape: &Shape) -> EngineResult<Population> {
        self.check_shape(shape)?;
        Ok(Population::from_flat_slice(
            shape.clone(),
            unpack_bits(&self.bytes, self.cell_count),
        ))
    }

    /// Wraps bytes previously returned by [`Snapshot::as_bytes()`] for a
    /// population with the given shape.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>, shape: &Shape) -> EngineResult<Self> {
        let mut bytes = bytes.into();
        let cell_count = shape.cell_count();
        if bytes.len() != byte_len(cell_count) {
            return Err(EngineError::SnapshotSizeMismatch {
                snapshot_cells: bytes.len() * 8,
                shape_cells: cell_count,
            });
        }
        let byte_count = bytes.len();
        if let Some(last) = bytes.last_mut() {
            let used_bits = cell_count - (byte_count - 1) * 8;
            *last &= !(0xFF_u8.checked_shr(used_bits as u32).unwrap_or(0));
        }
        Ok(Self { cell_count, bytes })
    }

    /// Returns the packed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
    /// Returns the packed bytes.
    #[inline]
    pub fn into_bytes(self) -> Box<[u8]> {
        self.bytes
    }
    /// Returns the number of cells encoded.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }
    /// Returns the number of live cells encoded.
    pub fn live_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    fn check_shape(&self, shape: &Shape) -> EngineResult<()> {
        if self.cell_count == shape.cell_count() {
            Ok(())
        } else {
            Err(EngineError::SnapshotSizeMismatch {
                snapshot_cells: self.cell_count,
                shape_cells: shape.cell_count(),
            })
        }
    }
}

/// Returns the number of bytes needed to pack `cell_count` cells.
#[inline]
fn byte_len(cell_count: usize) -> usize {
    (cell_count + 7) / 8
}

/// Packs binary cells eight per byte, most significant bit first. Any nonzero
/// cell is packed as a `1`.
pub fn pack_bits(cells: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0_u8; byte_len(cells.len())];
    for i in cells.iter().positions(|&cell| cell != 0) {
        bytes[i >> 3] |= 1 << (7 - (i & 7));
    }
    bytes
}

/// Unpacks `cell_count` binary cells from bytes produced by [`pack_bits()`].
///
/// # Panics
///
/// This function panics if `bytes` is too short to hold `cell_count` cells.
pub fn unpack_bits(bytes: &[u8], cell_count: usize) -> Vec<u8> {
    assert!(bytes.len() * 8 >= cell_count, "Not enough bytes to unpack");
    (0..cell_count)
        .map(|i| (bytes[i >> 3] >> (7 - (i & 7))) & 1)
        .collect()
}
