//! Proof-of-work profile flag word.
//!
//! The profile selects the NeoScrypt variant used for proof-of-work. Its
//! numeric value is consensus-relevant and is kept bit-for-bit:
//!
//! | bits  | meaning                                                        |
//! |-------|----------------------------------------------------------------|
//! | 0     | `SCRYPT_CORE`: scrypt(1024, 1, 1) with Salsa20/8 only          |
//! | 4..1  | KDF selector: 0 = FastKDF-BLAKE2s, 1 = PBKDF2-HMAC-SHA256      |
//! | 7..5  | r factor, `r = 2^f` (extended only)                            |
//! | 12..8 | N factor, `N = 2^(f+1)` (extended only)                        |
//! | 31    | `EXTENDED`: take N and r from the factor fields                |
//!
//! Bits 30..13 carry no meaning and are ignored, as are the factor fields when
//! `EXTENDED` is clear. KDF selectors other than 1 resolve to FastKDF. The
//! raw word is stored as given so it always round-trips; the only word that
//! fails to construct is one whose scratchpad exceeds `MAX_POW_MEMORY`.

use crate::constants::MAX_POW_MEMORY;
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key derivation function wrapped around the mixing core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kdf {
    FastKdfBlake2s,
    Pbkdf2Sha256,
}

/// Resolved NeoScrypt parameters for a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowParams {
    /// Number of scratchpad entries, a power of two.
    pub n: usize,
    /// Block size multiplier; one entry is `128 * r` bytes.
    pub r: usize,
    /// Rounds of the Salsa20 / ChaCha20 core.
    pub rounds: usize,
    /// Run a ChaCha20 pass alongside the Salsa20 pass and XOR the results.
    pub double_mix: bool,
    pub kdf: Kdf,
}

impl PowParams {
    /// Scratch memory needed for one hash: V plus the X, Y and Z working blocks.
    pub fn memory_bytes(&self) -> u64 {
        (self.n as u64 + 3) * self.r as u64 * 128
    }
}

/// Validated proof-of-work profile flag word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PowProfile(u32);

impl PowProfile {
    /// Use the scrypt core: N = 1024, r = 1, Salsa20/8, no ChaCha pass.
    pub const SCRYPT_CORE: u32 = 1 << 0;
    /// Select PBKDF2-HMAC-SHA256 instead of FastKDF-BLAKE2s.
    pub const KDF_SHA256: u32 = 1 << 1;
    /// Take N and r from the factor fields.
    pub const EXTENDED: u32 = 1 << 31;

    const KDF_SHIFT: u32 = 1;
    const KDF_MASK: u32 = 0xf << Self::KDF_SHIFT;
    const R_FACTOR_SHIFT: u32 = 5;
    const R_FACTOR_MASK: u32 = 0x7 << Self::R_FACTOR_SHIFT;
    const N_FACTOR_SHIFT: u32 = 8;
    const N_FACTOR_MASK: u32 = 0x1f << Self::N_FACTOR_SHIFT;

    /// NeoScrypt(128, 2, 1) with Salsa20/20 and ChaCha20/20 and FastKDF-BLAKE2s.
    pub const NEOSCRYPT: Self = Self(0);
    /// Scrypt(1024, 1, 1) with Salsa20/8 and PBKDF2-HMAC-SHA256.
    pub const SCRYPT: Self = Self(Self::SCRYPT_CORE | Self::KDF_SHA256);

    /// Wrap a raw flag word, rejecting only profiles over the memory cap.
    pub fn from_bits(bits: u32) -> Result<Self, ProfileError> {
        let (n, r) = Self(bits).dimensions();
        let required = (n + 3) * r * 128;
        if required > MAX_POW_MEMORY {
            return Err(ProfileError::MemoryLimit {
                required,
                limit: MAX_POW_MEMORY,
            });
        }
        Ok(Self(bits))
    }

    /// Build an extended profile with explicit `N = 2^(n_factor+1)` and `r = 2^r_factor`.
    pub fn extended(base: Self, n_factor: u32, r_factor: u32) -> Result<Self, ProfileError> {
        if n_factor > 0x1f || r_factor > 0x7 {
            return Err(ProfileError::FactorOutOfRange { n_factor, r_factor });
        }
        let factors = (n_factor << Self::N_FACTOR_SHIFT) | (r_factor << Self::R_FACTOR_SHIFT);
        let bits = (base.0 & (Self::SCRYPT_CORE | Self::KDF_MASK)) | Self::EXTENDED | factors;
        Self::from_bits(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub fn kdf(self) -> Kdf {
        if (self.0 & Self::KDF_MASK) >> Self::KDF_SHIFT == 1 {
            Kdf::Pbkdf2Sha256
        } else {
            Kdf::FastKdfBlake2s
        }
    }

    /// Resolve the mixing parameters this profile selects.
    pub fn params(self) -> PowParams {
        let (n, r) = self.dimensions();
        let scrypt_core = self.contains(Self::SCRYPT_CORE);
        PowParams {
            n: n as usize,
            r: r as usize,
            rounds: if scrypt_core { 8 } else { 20 },
            double_mix: !scrypt_core,
            kdf: self.kdf(),
        }
    }

    // (N, r) as wide integers; extended N may reach 2^32.
    fn dimensions(self) -> (u64, u64) {
        if self.contains(Self::EXTENDED) {
            let n_factor = (self.0 & Self::N_FACTOR_MASK) >> Self::N_FACTOR_SHIFT;
            let r_factor = (self.0 & Self::R_FACTOR_MASK) >> Self::R_FACTOR_SHIFT;
            (1u64 << (n_factor + 1), 1u64 << r_factor)
        } else if self.contains(Self::SCRYPT_CORE) {
            (1024, 1)
        } else {
            (128, 2)
        }
    }
}

impl Default for PowProfile {
    fn default() -> Self {
        Self::NEOSCRYPT
    }
}

impl fmt::Debug for PowProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PowProfile({:#x})", self.0)
    }
}

impl fmt::Display for PowProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NEOSCRYPT => f.write_str("neoscrypt"),
            Self::SCRYPT => f.write_str("scrypt"),
            other => write!(f, "{:#x}", other.0),
        }
    }
}

impl TryFrom<u32> for PowProfile {
    type Error = ProfileError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<PowProfile> for u32 {
    fn from(profile: PowProfile) -> Self {
        profile.0
    }
}

impl FromStr for PowProfile {
    type Err = ProfileError;

    /// Accepts `neoscrypt`, `scrypt`, `0x`-prefixed hex or decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "neoscrypt" => return Ok(Self::NEOSCRYPT),
            "scrypt" => return Ok(Self::SCRYPT),
            _ => {}
        }
        let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse::<u32>(),
        }
        .map_err(|_| ProfileError::Unparsable(s.to_string()))?;
        Self::from_bits(bits)
    }
}

/// Node-wide proof-of-work configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowConfig {
    pub profile: PowProfile,
}
