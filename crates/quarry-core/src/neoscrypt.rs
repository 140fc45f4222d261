//! NeoScrypt memory-hard hashing.
//!
//! `password = salt = 80-byte header`, `p = 1`, 32-byte output:
//!
//! 1. `X = KDF(header, header)`, `128 * r` bytes.
//! 2. Double mix only: `Z = SMix_ChaCha(X)`.
//! 3. `X = SMix_Salsa(X)`, then `X ^= Z` if double mixing.
//! 4. `out = KDF(header, X)`, 32 bytes.
//!
//! SMix is scrypt's ROMix over `N` scratchpad entries; BlockMix is scrypt's
//! BlockMix with the core (Salsa20 or ChaCha20) and round count taken from
//! the profile. Words are little-endian.

use crate::constants::{HASH_SIZE, HEADER_SIZE};
use crate::identity::blake2s_keyed;
use crate::pow::PowStats;
use crate::profile::{Kdf, PowParams};
use sha2::Sha256;

const BLOCK_WORDS: usize = 16;

const FASTKDF_BUFFER_SIZE: usize = 256;
const FASTKDF_ITERATIONS: usize = 32;
const PRF_INPUT_SIZE: usize = 64;
const PRF_KEY_SIZE: usize = 32;
const PRF_OUTPUT_SIZE: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Core {
    Salsa,
    ChaCha,
}

/// Hash an 80-byte header with the given parameters.
pub fn neoscrypt(input: &[u8; HEADER_SIZE], params: &PowParams) -> [u8; HASH_SIZE] {
    neoscrypt_counted(input, params, None)
}

/// [`neoscrypt`], reporting each SMix pass and the finished hash to `stats`.
pub(crate) fn neoscrypt_counted(
    input: &[u8; HEADER_SIZE],
    params: &PowParams,
    stats: Option<&PowStats>,
) -> [u8; HASH_SIZE] {
    let words = 32 * params.r;

    let mut seed = vec![0u8; words * 4];
    derive(params.kdf, input, input, &mut seed);
    let mut x = to_words(&seed);

    let mut y = vec![0u32; words];
    let mut v = vec![0u32; words * params.n];

    if params.double_mix {
        let mut z = x.clone();
        smix(&mut z, &mut v, &mut y, params, Core::ChaCha, stats);
        smix(&mut x, &mut v, &mut y, params, Core::Salsa, stats);
        xor_words(&mut x, &z);
    } else {
        smix(&mut x, &mut v, &mut y, params, Core::Salsa, stats);
    }

    let mixed = to_bytes(&x);
    let mut out = [0u8; HASH_SIZE];
    derive(params.kdf, input, &mixed, &mut out);
    if let Some(stats) = stats {
        stats.record_computation();
    }
    out
}

fn derive(kdf: Kdf, password: &[u8], salt: &[u8], output: &mut [u8]) {
    match kdf {
        Kdf::FastKdfBlake2s => fastkdf(password, salt, output),
        Kdf::Pbkdf2Sha256 => pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, 1, output),
    }
}

/// FastKDF-BLAKE2s.
///
/// `password` must be at least 64 bytes and `salt` at least 32; inputs longer
/// than the 256-byte buffer are truncated, as is the output.
fn fastkdf(password: &[u8], salt: &[u8], output: &mut [u8]) {
    debug_assert!(password.len() >= PRF_INPUT_SIZE && salt.len() >= PRF_KEY_SIZE);
    let password = &password[..password.len().min(FASTKDF_BUFFER_SIZE)];
    let salt = &salt[..salt.len().min(FASTKDF_BUFFER_SIZE)];

    // Each buffer is the input repeated to 256 bytes plus a tail mirroring its head.
    let mut a = [0u8; FASTKDF_BUFFER_SIZE + PRF_INPUT_SIZE];
    fill_repeating(&mut a[..FASTKDF_BUFFER_SIZE], password);
    a[FASTKDF_BUFFER_SIZE..].copy_from_slice(&password[..PRF_INPUT_SIZE]);

    let mut b = [0u8; FASTKDF_BUFFER_SIZE + PRF_KEY_SIZE];
    fill_repeating(&mut b[..FASTKDF_BUFFER_SIZE], salt);
    b[FASTKDF_BUFFER_SIZE..].copy_from_slice(&salt[..PRF_KEY_SIZE]);

    let mut ptr = 0usize;
    for _ in 0..FASTKDF_ITERATIONS {
        let mut key = [0u8; PRF_KEY_SIZE];
        key.copy_from_slice(&b[ptr..ptr + PRF_KEY_SIZE]);
        let prf = blake2s_keyed(&a[ptr..ptr + PRF_INPUT_SIZE], &key);

        ptr = prf.iter().map(|&byte| byte as usize).sum::<usize>() & (FASTKDF_BUFFER_SIZE - 1);
        xor_bytes(&mut b[ptr..ptr + PRF_OUTPUT_SIZE], &prf);

        if ptr < PRF_KEY_SIZE {
            // head modified, refresh tail
            b.copy_within(ptr..PRF_KEY_SIZE, FASTKDF_BUFFER_SIZE + ptr);
        }
        if FASTKDF_BUFFER_SIZE - ptr < PRF_OUTPUT_SIZE {
            // tail modified, refresh head
            let spill = PRF_OUTPUT_SIZE - (FASTKDF_BUFFER_SIZE - ptr);
            b.copy_within(FASTKDF_BUFFER_SIZE..FASTKDF_BUFFER_SIZE + spill, 0);
        }
    }

    let out_len = output.len().min(FASTKDF_BUFFER_SIZE);
    let head = FASTKDF_BUFFER_SIZE - ptr;
    if head >= out_len {
        xor_bytes(&mut b[ptr..ptr + out_len], &a[..out_len]);
        output[..out_len].copy_from_slice(&b[ptr..ptr + out_len]);
    } else {
        xor_bytes(&mut b[ptr..FASTKDF_BUFFER_SIZE], &a[..head]);
        xor_bytes(&mut b[..out_len - head], &a[head..out_len]);
        output[..head].copy_from_slice(&b[ptr..FASTKDF_BUFFER_SIZE]);
        output[head..out_len].copy_from_slice(&b[..out_len - head]);
    }
}

fn smix(
    x: &mut [u32],
    v: &mut [u32],
    y: &mut [u32],
    params: &PowParams,
    core: Core,
    stats: Option<&PowStats>,
) {
    let len = x.len();
    let last = BLOCK_WORDS * (2 * params.r - 1);
    let mask = params.n - 1;

    for entry in v.chunks_exact_mut(len).take(params.n) {
        entry.copy_from_slice(x);
        block_mix(x, y, params.r, core, params.rounds);
    }
    for _ in 0..params.n {
        let j = x[last] as usize & mask;
        xor_words(x, &v[j * len..(j + 1) * len]);
        block_mix(x, y, params.r, core, params.rounds);
    }
    if let Some(stats) = stats {
        stats.record_mix();
    }
}

fn block_mix(x: &mut [u32], y: &mut [u32], r: usize, core: Core, rounds: usize) {
    let blocks = 2 * r;
    let mut t = [0u32; BLOCK_WORDS];
    t.copy_from_slice(&x[(blocks - 1) * BLOCK_WORDS..]);

    for i in 0..blocks {
        let block = &x[i * BLOCK_WORDS..(i + 1) * BLOCK_WORDS];
        for (w, b) in t.iter_mut().zip(block) {
            *w ^= b;
        }
        match core {
            Core::Salsa => salsa(&mut t, rounds),
            Core::ChaCha => chacha(&mut t, rounds),
        }
        y[i * BLOCK_WORDS..(i + 1) * BLOCK_WORDS].copy_from_slice(&t);
    }

    // even blocks first, then odd
    for i in 0..r {
        x[i * BLOCK_WORDS..(i + 1) * BLOCK_WORDS]
            .copy_from_slice(&y[2 * i * BLOCK_WORDS..(2 * i + 1) * BLOCK_WORDS]);
        x[(i + r) * BLOCK_WORDS..(i + r + 1) * BLOCK_WORDS]
            .copy_from_slice(&y[(2 * i + 1) * BLOCK_WORDS..(2 * i + 2) * BLOCK_WORDS]);
    }
}

/// Salsa20 core with feed-forward.
fn salsa(b: &mut [u32; BLOCK_WORDS], rounds: usize) {
    let mut x = *b;
    for _ in 0..rounds / 2 {
        // columns
        salsa_quarter(&mut x, 0, 4, 8, 12);
        salsa_quarter(&mut x, 5, 9, 13, 1);
        salsa_quarter(&mut x, 10, 14, 2, 6);
        salsa_quarter(&mut x, 15, 3, 7, 11);
        // rows
        salsa_quarter(&mut x, 0, 1, 2, 3);
        salsa_quarter(&mut x, 5, 6, 7, 4);
        salsa_quarter(&mut x, 10, 11, 8, 9);
        salsa_quarter(&mut x, 15, 12, 13, 14);
    }
    for (w, s) in b.iter_mut().zip(x) {
        *w = w.wrapping_add(s);
    }
}

#[inline(always)]
fn salsa_quarter(x: &mut [u32; BLOCK_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

/// ChaCha20 core with feed-forward.
fn chacha(b: &mut [u32; BLOCK_WORDS], rounds: usize) {
    let mut x = *b;
    for _ in 0..rounds / 2 {
        chacha_quarter(&mut x, 0, 4, 8, 12);
        chacha_quarter(&mut x, 1, 5, 9, 13);
        chacha_quarter(&mut x, 2, 6, 10, 14);
        chacha_quarter(&mut x, 3, 7, 11, 15);
        chacha_quarter(&mut x, 0, 5, 10, 15);
        chacha_quarter(&mut x, 1, 6, 11, 12);
        chacha_quarter(&mut x, 2, 7, 8, 13);
        chacha_quarter(&mut x, 3, 4, 9, 14);
    }
    for (w, s) in b.iter_mut().zip(x) {
        *w = w.wrapping_add(s);
    }
}

#[inline(always)]
fn chacha_quarter(x: &mut [u32; BLOCK_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(16);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(12);
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(8);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(7);
}

fn fill_repeating(dst: &mut [u8], src: &[u8]) {
    for chunk in dst.chunks_mut(src.len()) {
        chunk.copy_from_slice(&src[..chunk.len()]);
    }
}

fn xor_bytes(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

fn xor_words(dst: &mut [u32], src: &[u32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

fn to_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
