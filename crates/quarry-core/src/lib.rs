pub mod constants;
pub mod encode;
pub mod error;
pub mod identity;
pub mod mine;
pub mod neoscrypt;
pub mod pow;
pub mod profile;
pub mod target;
pub mod weight;

pub use encode::{SerializedSize, WitnessMode};
pub use error::{HashParseError, PowError, ProfileError, TargetError};
pub use identity::HashCacheStats;
pub use pow::PowStats;
pub use profile::{PowConfig, PowProfile};
pub use target::Target;

use constants::{HASH_SIZE, HEADER_SIZE};
use identity::{cache_key, IdentityMemo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// A 32-byte hash in internal byte order.
///
/// Text form (`Display` / `FromStr`) is the byte-reversed hex string block
/// explorers and logs use; [`Hash256::as_bytes`] is the order that is hashed
/// and serialized.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash256(pub [u8; HASH_SIZE]);

impl Hash256 {
    pub const fn zero() -> Self {
        Self([0u8; HASH_SIZE])
    }

    pub const fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rev = self.0;
        rev.reverse();
        f.write_str(&hex::encode(rev))
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH_SIZE {
            return Err(HashParseError::Length {
                expected: HASH_SIZE,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(&bytes);
        arr.reverse();
        Ok(Self(arr))
    }
}

impl From<[u8; HASH_SIZE]> for Hash256 {
    fn from(value: [u8; HASH_SIZE]) -> Self {
        Self(value)
    }
}

/// Block header: the six consensus fields plus a memo of the identity hash.
///
/// The memo is keyed on `(nonce, time)` only. Changing `version`,
/// `prev_block_hash`, `merkle_root` or `bits` on a header that has already
/// been hashed leaves a stale memo until `nonce` or `time` changes; call
/// [`BlockHeader::clear_identity_cache`] after such edits.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block_hash: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    #[serde(skip)]
    memo: Option<IdentityMemo>,
}

impl PartialEq for BlockHeader {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.prev_block_hash == other.prev_block_hash
            && self.merkle_root == other.merkle_root
            && self.time == other.time
            && self.bits == other.bits
            && self.nonce == other.nonce
    }
}

impl Eq for BlockHeader {}

impl BlockHeader {
    pub fn new(
        version: i32,
        prev_block_hash: Hash256,
        merkle_root: Hash256,
        time: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            prev_block_hash,
            merkle_root,
            time,
            bits,
            nonce,
            memo: None,
        }
    }

    /// The fixed 80-byte serialization.
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        encode::header_bytes(self)
    }

    /// Current `(nonce, time)` cache key.
    pub fn cache_key(&self) -> u64 {
        cache_key(self.nonce, self.time)
    }

    /// Identity hash, served from the memo while `(nonce, time)` is unchanged.
    pub fn identity_hash(&mut self, stats: &HashCacheStats) -> Hash256 {
        let key = self.cache_key();
        if let Some(memo) = self.memo.filter(|m| m.key == key) {
            stats.record_hit();
            return memo.hash;
        }

        let hash = identity::compute_identity_hash(self);
        self.memo = Some(IdentityMemo { key, hash });
        stats.record_miss();
        trace!(nonce = self.nonce, time = self.time, %hash, "identity hash cache miss");
        hash
    }

    /// Identity hash computed from scratch; ignores and keeps the memo.
    pub fn compute_identity_hash(&self) -> Hash256 {
        identity::compute_identity_hash(self)
    }

    /// The memoized identity hash, if it is current for `(nonce, time)`.
    pub fn cached_identity_hash(&self) -> Option<Hash256> {
        let key = self.cache_key();
        self.memo.filter(|m| m.key == key).map(|m| m.hash)
    }

    pub fn clear_identity_cache(&mut self) {
        self.memo = None;
    }

    /// Proof-of-work hash. Never cached.
    pub fn pow_hash(&self, profile: PowProfile) -> Hash256 {
        pow::pow_hash(self, profile)
    }

    /// Check this header's PoW hash against its own `bits`.
    pub fn check_proof_of_work(&self, profile: PowProfile) -> Result<(), PowError> {
        target::check_proof_of_work(&self.pow_hash(profile), self.bits)
    }
}

/// What a block needs from its transactions: a rendering and serialized sizes.
pub trait Transaction: fmt::Display + SerializedSize {}

impl<T: fmt::Display + SerializedSize> Transaction for T {}

/// A header plus its ordered transactions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block<T> {
    pub header: BlockHeader,
    pub txs: Vec<T>,
}

impl<T: Transaction> Block<T> {
    pub fn new(header: BlockHeader, txs: Vec<T>) -> Self {
        Self { header, txs }
    }

    /// Identity hash of the block's header.
    pub fn hash(&mut self, stats: &HashCacheStats) -> Hash256 {
        self.header.identity_hash(stats)
    }

    pub fn weight(&self) -> i64 {
        weight::block_weight(self)
    }
}

impl<T: Transaction> SerializedSize for Block<T> {
    fn serialized_size(&self, mode: WitnessMode) -> usize {
        let prefix = self
            .header
            .serialized_size(mode)
            .saturating_add(encode::compact_size_len(self.txs.len() as u64));
        self.txs
            .iter()
            .fold(prefix, |acc, tx| acc.saturating_add(tx.serialized_size(mode)))
    }
}

impl<T: Transaction> fmt::Display for Block<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        let hash = h
            .cached_identity_hash()
            .unwrap_or_else(|| h.compute_identity_hash());
        writeln!(
            f,
            "Block(hash={}, ver=0x{:08x}, hashPrevBlock={}, hashMerkleRoot={}, nTime={}, nBits={:08x}, nNonce={}, vtx={})",
            hash,
            h.version,
            h.prev_block_hash,
            h.merkle_root,
            h.time,
            h.bits,
            h.nonce,
            self.txs.len()
        )?;
        for tx in &self.txs {
            writeln!(f, "  {tx}")?;
        }
        Ok(())
    }
}
