use criterion::{criterion_group, criterion_main, Criterion};
use quarry_core::{BlockHeader, Hash256, HashCacheStats, PowProfile};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

fn random_header(rng: &mut StdRng) -> BlockHeader {
    BlockHeader::new(
        rng.gen(),
        Hash256(rng.gen()),
        Hash256(rng.gen()),
        rng.gen(),
        0x1e0f_ffff,
        0,
    )
}

fn bench_identity(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let stats = HashCacheStats::new();

    c.bench_function("identity_hash_hit", |b| {
        let mut header = random_header(&mut rng);
        header.identity_hash(&stats);
        b.iter(|| black_box(header.identity_hash(&stats)));
    });

    c.bench_function("identity_hash_miss", |b| {
        let mut header = random_header(&mut rng);
        b.iter(|| {
            header.nonce = header.nonce.wrapping_add(1);
            black_box(header.identity_hash(&stats))
        });
    });
}

fn bench_pow(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let header = random_header(&mut rng);

    c.bench_function("pow_hash_neoscrypt", |b| {
        b.iter(|| black_box(header.pow_hash(PowProfile::NEOSCRYPT)));
    });
    c.bench_function("pow_hash_scrypt", |b| {
        b.iter(|| black_box(header.pow_hash(PowProfile::SCRYPT)));
    });
}

criterion_group!(benches, bench_identity, bench_pow);
criterion_main!(benches);
