//! Formats for exporting/importing populations.

mod snapshot;

pub use snapshot::{pack_bits, unpack_bits, Snapshot};
