// Consensus-critical: the PoW hash input is exactly the 80-byte header.
//! Proof-of-work hashing.
//!
//! The PoW hash is NeoScrypt over the serialized header under the configured
//! [`PowProfile`]. It is recomputed on every call; miners change the nonce on
//! every attempt so there is nothing worth caching.

use crate::encode::header_bytes;
use crate::neoscrypt::{neoscrypt, neoscrypt_counted};
use crate::profile::PowProfile;
use crate::{BlockHeader, Hash256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts PoW work as it is performed inside the hasher.
#[derive(Debug, Default)]
pub struct PowStats {
    computations: AtomicU64,
    mixes: AtomicU64,
}

impl PowStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed NeoScrypt hashes.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Completed SMix passes over the scratchpad.
    pub fn mixes(&self) -> u64 {
        self.mixes.load(Ordering::Relaxed)
    }

    pub(crate) fn record_computation(&self) {
        self.computations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_mix(&self) {
        self.mixes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Compute the proof-of-work hash of a header.
pub fn pow_hash(header: &BlockHeader, profile: PowProfile) -> Hash256 {
    Hash256(neoscrypt(&header_bytes(header), &profile.params()))
}

/// [`pow_hash`], with the hasher reporting its mixing passes and the finished
/// hash to `stats`.
pub fn pow_hash_counted(header: &BlockHeader, profile: PowProfile, stats: &PowStats) -> Hash256 {
    Hash256(neoscrypt_counted(
        &header_bytes(header),
        &profile.params(),
        Some(stats),
    ))
}
