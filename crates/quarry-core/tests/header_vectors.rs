use quarry_core::{BlockHeader, Hash256, HashCacheStats, PowProfile, PowStats};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct HeaderFields {
    version: i32,
    prev_block_hash: String,
    merkle_root: String,
    time: u32,
    bits: u32,
    nonce: u32,
}

#[derive(Debug, Deserialize)]
struct HeaderVector {
    name: String,
    header: HeaderFields,
    serialized_hex: String,
    identity_hash_hex: String,
    pow_neoscrypt_hex: String,
    pow_scrypt_hex: String,
}

fn vectors_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("vectors")
        .join("headers.json")
}

// Vector files store hashes in internal byte order.
fn parse_raw32(s: &str) -> Hash256 {
    let bytes = hex::decode(s).expect("hex");
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Hash256(arr)
}

fn load() -> Vec<(HeaderVector, BlockHeader)> {
    let data = fs::read_to_string(vectors_path()).expect("vector file");
    let vectors: Vec<HeaderVector> = serde_json::from_str(&data).expect("parse json");
    assert!(!vectors.is_empty());
    vectors
        .into_iter()
        .map(|v| {
            let header = BlockHeader::new(
                v.header.version,
                parse_raw32(&v.header.prev_block_hash),
                parse_raw32(&v.header.merkle_root),
                v.header.time,
                v.header.bits,
                v.header.nonce,
            );
            (v, header)
        })
        .collect()
}

#[test]
fn serialization_vectors() {
    for (v, header) in load() {
        assert_eq!(
            hex::encode(header.serialize()),
            v.serialized_hex,
            "serialized bytes mismatch for {}",
            v.name
        );
    }
}

#[test]
fn identity_hash_vectors() {
    let stats = HashCacheStats::new();
    for (v, mut header) in load() {
        let cached = header.identity_hash(&stats);
        assert_eq!(
            hex::encode(cached.as_bytes()),
            v.identity_hash_hex,
            "identity hash mismatch for {}",
            v.name
        );
        assert_eq!(header.compute_identity_hash(), cached, "pure hash for {}", v.name);
        assert_eq!(header.identity_hash(&stats), cached, "cached hash for {}", v.name);
    }
}

#[test]
fn pow_hash_vectors() {
    let stats = PowStats::new();
    let mut expected_calls = 0;
    for (v, header) in load() {
        let neo = quarry_core::pow::pow_hash_counted(&header, PowProfile::NEOSCRYPT, &stats);
        assert_eq!(
            hex::encode(neo.as_bytes()),
            v.pow_neoscrypt_hex,
            "neoscrypt pow hash mismatch for {}",
            v.name
        );
        let scrypt = quarry_core::pow::pow_hash_counted(&header, PowProfile::SCRYPT, &stats);
        assert_eq!(
            hex::encode(scrypt.as_bytes()),
            v.pow_scrypt_hex,
            "scrypt pow hash mismatch for {}",
            v.name
        );
        expected_calls += 2;
    }
    assert_eq!(stats.computations(), expected_calls);
    // neoscrypt mixes twice, scrypt once
    assert_eq!(stats.mixes(), expected_calls / 2 * 3);
}
