//! Error types for the fallible edges of the core.
//!
//! Hashing itself is total; only text parsing, profile decoding and
//! difficulty target handling can fail.

use thiserror::Error;

/// Errors produced when parsing a [`Hash256`](crate::Hash256) from text.
#[derive(Debug, Error)]
pub enum HashParseError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid hash length: expected {expected} bytes, got {got} bytes")]
    Length { expected: usize, got: usize },
}

/// Errors produced when building a proof-of-work profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("extended factors out of range: n_factor {n_factor} (max 31), r_factor {r_factor} (max 7)")]
    FactorOutOfRange { n_factor: u32, r_factor: u32 },

    #[error("profile requires {required} bytes of scratch memory, limit is {limit}")]
    MemoryLimit { required: u64, limit: u64 },

    #[error("unrecognised profile `{0}`")]
    Unparsable(String),
}

/// Errors produced when decoding a compact difficulty target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("compact target {0:#010x} is negative")]
    Negative(u32),

    #[error("compact target {0:#010x} overflows 256 bits")]
    Overflow(u32),

    #[error("compact target {0:#010x} decodes to zero")]
    Zero(u32),
}

/// Errors produced by proof-of-work checks and mining.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PowError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("proof-of-work hash {hash} is above target {target}")]
    InsufficientWork { hash: String, target: String },
}
