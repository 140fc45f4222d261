//! Byte layout of headers and the size seam into the block serializer.
//!
//! Layout of the serialized header, all integers little-endian:
//!
//! | offset | size | field             |
//! |--------|------|-------------------|
//! | 0      | 4    | `version`         |
//! | 4      | 32   | `prev_block_hash` |
//! | 36     | 32   | `merkle_root`     |
//! | 68     | 4    | `time`            |
//! | 72     | 4    | `bits`            |
//! | 76     | 4    | `nonce`           |

use crate::constants::{HASH_SIZE, HEADER_SIZE};
use crate::BlockHeader;

/// Whether witness data takes part in a serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WitnessMode {
    With,
    Without,
}

/// Serialized byte length of a value, as reported by the block serializer.
pub trait SerializedSize {
    fn serialized_size(&self, mode: WitnessMode) -> usize;
}

/// Serialize the consensus fields of a header into its fixed 80-byte form.
pub fn header_bytes(header: &BlockHeader) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out[0..4].copy_from_slice(&header.version.to_le_bytes());
    out[4..4 + HASH_SIZE].copy_from_slice(header.prev_block_hash.as_bytes());
    out[36..36 + HASH_SIZE].copy_from_slice(header.merkle_root.as_bytes());
    out[68..72].copy_from_slice(&header.time.to_le_bytes());
    out[72..76].copy_from_slice(&header.bits.to_le_bytes());
    out[76..80].copy_from_slice(&header.nonce.to_le_bytes());
    out
}

/// Length of the CompactSize prefix used for vector lengths.
pub fn compact_size_len(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

impl SerializedSize for BlockHeader {
    fn serialized_size(&self, _mode: WitnessMode) -> usize {
        HEADER_SIZE
    }
}
