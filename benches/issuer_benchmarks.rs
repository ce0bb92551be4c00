use accountd::auth::{BcryptHasher, PasswordHasher, TokenIssuer};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_id_issuance(c: &mut Criterion) {
    let issuer = TokenIssuer::new(1).unwrap();

    c.bench_function("next_raw_id", |b| b.iter(|| black_box(issuer.next_raw_id())));

    c.bench_function("next_account_id", |b| {
        b.iter(|| black_box(issuer.next_account_id()))
    });

    c.bench_function("issue_session_token", |b| {
        b.iter(|| black_box(issuer.issue_session_token()))
    });
}

fn bench_password_hashing(c: &mut Criterion) {
    let hasher = BcryptHasher::new(4);
    let digest = hasher.hash("p1").unwrap();

    c.bench_function("bcrypt_hash_cost_4", |b| {
        b.iter(|| hasher.hash(black_box("p1")))
    });

    c.bench_function("bcrypt_verify_cost_4", |b| {
        b.iter(|| hasher.verify(black_box("p1"), black_box(&digest)))
    });
}

criterion_group!(benches, bench_id_issuance, bench_password_hashing);
criterion_main!(benches);
