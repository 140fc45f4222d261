use quarry_core::{
    weight::{block_weight, weight_from_sizes},
    Block, BlockHeader, Hash256, HashCacheStats, SerializedSize, WitnessMode,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fmt;

#[derive(Clone)]
struct WitnessTx {
    base: usize,
    witness: usize,
}

impl fmt::Display for WitnessTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WitnessTx(base={}, witness={})", self.base, self.witness)
    }
}

impl SerializedSize for WitnessTx {
    fn serialized_size(&self, mode: WitnessMode) -> usize {
        match mode {
            WitnessMode::With => self.base + self.witness,
            WitnessMode::Without => self.base,
        }
    }
}

fn random_header(rng: &mut StdRng) -> BlockHeader {
    BlockHeader::new(
        rng.gen(),
        Hash256(rng.gen()),
        Hash256(rng.gen()),
        rng.gen(),
        rng.gen(),
        rng.gen(),
    )
}

#[test]
fn weight_monotonic_in_witness_size() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..32 {
        let txs: Vec<WitnessTx> = (0..rng.gen_range(1..20))
            .map(|_| WitnessTx {
                base: rng.gen_range(60..500),
                witness: rng.gen_range(0..300),
            })
            .collect();
        let mut block = Block::new(random_header(&mut rng), txs);
        let mut last = block_weight(&block);
        for _ in 0..10 {
            let i = rng.gen_range(0..block.txs.len());
            block.txs[i].witness += rng.gen_range(0..100);
            let w = block_weight(&block);
            assert!(w >= last, "weight decreased: {last} -> {w}");
            last = w;
        }
    }
}

#[test]
fn weight_equals_stripped_times_four_plus_witness() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..32 {
        let txs: Vec<WitnessTx> = (0..rng.gen_range(0..300))
            .map(|_| WitnessTx {
                base: rng.gen_range(60..500),
                witness: rng.gen_range(0..300),
            })
            .collect();
        let block = Block::new(BlockHeader::default(), txs);
        let stripped = block.serialized_size(WitnessMode::Without) as i64;
        let total = block.serialized_size(WitnessMode::With) as i64;
        assert_eq!(block_weight(&block), stripped * 4 + (total - stripped));
    }
}

#[test]
fn witnessless_block_weight_is_four_times_size() {
    let block = Block::new(
        BlockHeader::default(),
        vec![WitnessTx { base: 120, witness: 0 }; 300],
    );
    // 300 transactions need a 3-byte length prefix
    let size = 80 + 3 + 300 * 120;
    assert_eq!(block.serialized_size(WitnessMode::With), size);
    assert_eq!(block.weight(), 4 * size as i64);
    assert_eq!(weight_from_sizes(size, size), 4 * size as i64);
}

#[test]
fn mining_style_nonce_sweep_misses_every_time() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut header = random_header(&mut rng);
    let stats = HashCacheStats::new();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..100 {
        header.nonce = header.nonce.wrapping_add(1);
        assert!(seen.insert(header.identity_hash(&stats)));
        header.identity_hash(&stats);
    }
    assert_eq!(stats.misses(), 100);
    assert_eq!(stats.hits(), 100);
}

#[test]
fn stats_handles_are_independent() {
    let mut header = BlockHeader::default();
    let a = HashCacheStats::new();
    let b = HashCacheStats::new();
    header.identity_hash(&a);
    header.identity_hash(&b);
    assert_eq!((a.hits(), a.misses()), (0, 1));
    assert_eq!((b.hits(), b.misses()), (1, 0));
}
