//! Block weight.
//!
//! `weight = stripped_size * 4 + witness_size`, computed from the two
//! serializations the serializer already offers:
//! `weight = stripped_size * (WITNESS_SCALE_FACTOR - 1) + total_size`.

use crate::constants::WITNESS_SCALE_FACTOR;
use crate::encode::{SerializedSize, WitnessMode};
use crate::{Block, Transaction};

/// Consensus weight of a block.
pub fn block_weight<T: Transaction>(block: &Block<T>) -> i64 {
    let stripped = block.serialized_size(WitnessMode::Without);
    let total = block.serialized_size(WitnessMode::With);
    weight_from_sizes(stripped, total)
}

/// Weight from a stripped and a total serialized size.
pub fn weight_from_sizes(stripped_size: usize, total_size: usize) -> i64 {
    let stripped = i64::try_from(stripped_size).unwrap_or(i64::MAX);
    let total = i64::try_from(total_size).unwrap_or(i64::MAX);
    stripped
        .saturating_mul(WITNESS_SCALE_FACTOR - 1)
        .saturating_add(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockHeader;
    use std::cell::Cell;
    use std::fmt;

    /// Transaction with fixed base and witness byte counts.
    struct SizedTx {
        base: usize,
        witness: usize,
        size_calls: Cell<usize>,
    }

    impl SizedTx {
        fn new(base: usize, witness: usize) -> Self {
            Self {
                base,
                witness,
                size_calls: Cell::new(0),
            }
        }
    }

    impl fmt::Display for SizedTx {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "SizedTx(base={}, witness={})", self.base, self.witness)
        }
    }

    impl SerializedSize for SizedTx {
        fn serialized_size(&self, mode: WitnessMode) -> usize {
            self.size_calls.set(self.size_calls.get() + 1);
            match mode {
                WitnessMode::With => self.base + self.witness,
                WitnessMode::Without => self.base,
            }
        }
    }

    #[test]
    fn empty_block_weighs_four_times_its_size() {
        let block: Block<SizedTx> = Block::new(BlockHeader::default(), vec![]);
        // 80-byte header + 1-byte tx count
        assert_eq!(block_weight(&block), 4 * 81);
    }

    #[test]
    fn witness_bytes_count_once_base_bytes_four_times() {
        let block = Block::new(
            BlockHeader::default(),
            vec![SizedTx::new(200, 100), SizedTx::new(50, 0)],
        );
        let stripped = 80 + 1 + 250;
        assert_eq!(block_weight(&block), stripped * 4 + 100);
    }

    #[test]
    fn serializer_consulted_once_per_mode() {
        let block = Block::new(BlockHeader::default(), vec![SizedTx::new(10, 5)]);
        let _ = block_weight(&block);
        assert_eq!(block.txs[0].size_calls.get(), 2);
    }

    #[test]
    fn weight_from_sizes_matches_formula() {
        assert_eq!(weight_from_sizes(0, 0), 0);
        assert_eq!(weight_from_sizes(100, 100), 400);
        assert_eq!(weight_from_sizes(100, 160), 460);
    }

    #[test]
    fn weight_saturates_instead_of_overflowing() {
        assert_eq!(weight_from_sizes(usize::MAX, usize::MAX), i64::MAX);
    }
}
