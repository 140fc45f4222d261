pub const HASH_SIZE: usize = 32;

/// Serialized header: version, prev hash, merkle root, time, bits, nonce.
pub const HEADER_SIZE: usize = 4 + HASH_SIZE + HASH_SIZE + 4 + 4 + 4;
/// Identity hash message: the serialized header followed by the merkle root again.
pub const IDENTITY_MESSAGE_SIZE: usize = HEADER_SIZE + HASH_SIZE;
/// First byte of the identity hash key inside the identity message.
pub const IDENTITY_KEY_OFFSET: usize = 58;

pub const WITNESS_SCALE_FACTOR: i64 = 4;

/// Upper bound on NeoScrypt scratch memory a profile may request (256 MiB).
pub const MAX_POW_MEMORY: u64 = 256 * 1024 * 1024;
