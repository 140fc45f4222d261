//! Compact difficulty targets and the proof-of-work threshold check.
//!
//! `bits = (size << 24) | mantissa`, where the target is
//! `mantissa * 256^(size - 3)` and bit 23 of the mantissa is a sign bit.
//! Targets and hashes compare as 256-bit little-endian integers.

use crate::constants::HASH_SIZE;
use crate::error::{PowError, TargetError};
use crate::Hash256;
use std::cmp::Ordering;
use std::fmt;

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// A decoded 256-bit difficulty target, little-endian.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Target([u8; HASH_SIZE]);

impl Target {
    /// Decode a compact `bits` value.
    pub fn from_compact(bits: u32) -> Result<Self, TargetError> {
        let size = (bits >> 24) as usize;
        let word = bits & MANTISSA_MASK;

        if word != 0 && bits & SIGN_BIT != 0 {
            return Err(TargetError::Negative(bits));
        }
        if word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32)) {
            return Err(TargetError::Overflow(bits));
        }

        let mut out = [0u8; HASH_SIZE];
        if size <= 3 {
            let value = word >> (8 * (3 - size));
            out[..4].copy_from_slice(&value.to_le_bytes());
        } else {
            let shift = size - 3;
            for (i, byte) in word.to_le_bytes().iter().enumerate() {
                if let Some(slot) = out.get_mut(shift + i) {
                    *slot = *byte;
                }
            }
        }

        if out.iter().all(|&b| b == 0) {
            return Err(TargetError::Zero(bits));
        }
        Ok(Self(out))
    }

    pub fn as_le_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// `true` when `hash <= target`.
    pub fn is_met_by(&self, hash: &Hash256) -> bool {
        compare_le(hash.as_bytes(), &self.0) != Ordering::Greater
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({self})")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.0;
        be.reverse();
        f.write_str(&hex::encode(be))
    }
}

fn compare_le(a: &[u8; HASH_SIZE], b: &[u8; HASH_SIZE]) -> Ordering {
    a.iter().rev().cmp(b.iter().rev())
}

/// Check a proof-of-work hash against the compact target in `bits`.
pub fn check_proof_of_work(pow_hash: &Hash256, bits: u32) -> Result<(), PowError> {
    let target = Target::from_compact(bits)?;
    if !target.is_met_by(pow_hash) {
        return Err(PowError::InsufficientWork {
            hash: pow_hash.to_string(),
            target: target.to_string(),
        });
    }
    Ok(())
}
