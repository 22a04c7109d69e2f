//! # Chaincode Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | preimage | signed `transfer` call: authentication, nonce, preimage write |
//! | batch | `batchExecute` over N recorded transfers |
//! | query | `balanceOf` through the query stub |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cc_tests::fixtures::{Channel, Signer, NONCE};

fn bench_preimage(c: &mut Criterion) {
    let mut group = c.benchmark_group("preimage");
    group.measurement_time(Duration::from_secs(5));

    let alice = Signer::new(1);
    let to = Signer::new(2).address().to_base58();
    let mut channel = Channel::open("tok");
    let mut nonce = NONCE;

    group.bench_function("signed_transfer", |b| {
        b.iter(|| {
            nonce += 1;
            let resp = channel.submit("a1", &alice, "transfer", &[&to, "1"], nonce);
            black_box(resp.is_ok())
        })
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.measurement_time(Duration::from_secs(10));

    let alice = Signer::new(1);
    let to = Signer::new(2).address().to_base58();

    for size in [1u64, 10, 50] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("transfers", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut channel = Channel::open("tok");
                    channel.mint(&alice.address(), 1_000_000);
                    let ids: Vec<String> = (0..size).map(|i| format!("{i:04x}")).collect();
                    for (i, tx) in ids.iter().enumerate() {
                        channel.submit(tx, &alice, "transfer", &[&to, "1"], NONCE + i as u64);
                    }
                    (channel, ids)
                },
                |(mut channel, ids)| {
                    let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                    black_box(channel.batch_txs("ffff", &ids))
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut channel = Channel::open("tok");
    let alice = Signer::new(1);
    channel.mint(&alice.address(), 10);
    let args = [alice.address().to_base58()];

    c.bench_function("query/balance_of", |b| {
        b.iter(|| black_box(channel.invoke("b1", "balanceOf", &args)))
    });
}

criterion_group!(benches, bench_preimage, bench_batch, bench_query);
criterion_main!(benches);
