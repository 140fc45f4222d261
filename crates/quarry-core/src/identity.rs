//! Identity hash of a block header.
//!
//! The identity hash is a keyed BLAKE2s-256 digest over a 112-byte message:
//! the 80-byte serialized header followed by a second copy of the merkle root.
//! The 32-byte key is taken from the message itself, bytes 58..=89:
//!
//! ```text
//!  58        68              80        90
//!  | mr[22..32] | time bits nonce | mr[0..10] |
//! ```
//!
//! It is cheap to compute and is what indexes, relay dedup and logs use.
//! It is not the proof-of-work hash, see [`crate::pow`].

use crate::constants::{HASH_SIZE, HEADER_SIZE, IDENTITY_KEY_OFFSET, IDENTITY_MESSAGE_SIZE};
use crate::encode::header_bytes;
use crate::{BlockHeader, Hash256};
use blake2::{digest::Mac, Blake2sMac256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hit and miss counters for the header identity cache.
///
/// Passed explicitly by the caller; share one handle per component or test.
#[derive(Debug, Default)]
pub struct HashCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HashCacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

/// Memoized identity hash, valid while `key` matches the header's `(nonce, time)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IdentityMemo {
    pub(crate) key: u64,
    pub(crate) hash: Hash256,
}

/// Pack `(nonce, time)` into the 64-bit cache key.
pub fn cache_key(nonce: u32, time: u32) -> u64 {
    (u64::from(nonce) << 32) | u64::from(time)
}

/// Build the 112-byte identity message for a header.
pub fn identity_message(header: &BlockHeader) -> [u8; IDENTITY_MESSAGE_SIZE] {
    let mut msg = [0u8; IDENTITY_MESSAGE_SIZE];
    msg[..HEADER_SIZE].copy_from_slice(&header_bytes(header));
    msg[HEADER_SIZE..].copy_from_slice(header.merkle_root.as_bytes());
    msg
}

/// Slice the 32-byte BLAKE2s key out of an identity message.
pub fn identity_key(message: &[u8; IDENTITY_MESSAGE_SIZE]) -> [u8; HASH_SIZE] {
    let mut key = [0u8; HASH_SIZE];
    key.copy_from_slice(&message[IDENTITY_KEY_OFFSET..IDENTITY_KEY_OFFSET + HASH_SIZE]);
    key
}

/// Compute the identity hash without consulting or updating any cache.
pub fn compute_identity_hash(header: &BlockHeader) -> Hash256 {
    let msg = identity_message(header);
    let key = identity_key(&msg);
    Hash256(blake2s_keyed(&msg, &key))
}

/// BLAKE2s-256 in keyed mode with a full 32-byte key.
pub(crate) fn blake2s_keyed(message: &[u8], key: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    let mut mac = Blake2sMac256::new(&(*key).into());
    mac.update(message);
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest[..]);
    out
}
