// Codec benchmarks: canonical encoding, decoding, transaction ids, and
// group id computation over a representative payment.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use algokit_transact::crypto::Ed25519Signer;
use algokit_transact::identity::Address;
use algokit_transact::msgpack::CanonicalMsgpack;
use algokit_transact::transaction::{
    compute_group_id, sign_transaction, PaymentTransactionFields, Transaction,
    TransactionBuilder, TransactionId,
};

fn payment(n: u64) -> Transaction {
    TransactionBuilder::new(Address::new([1u8; 32]), 1_000 + n, 2_000 + n)
        .genesis_id("testnet-v1.0")
        .genesis_hash([0x48u8; 32])
        .fee(1_000)
        .note(format!("invoice #{n:06}").into_bytes())
        .build(PaymentTransactionFields {
            receiver: Address::new([2u8; 32]),
            amount: 1_000_000,
            close_remainder_to: None,
        })
        .expect("valid payment")
}

fn bench_encode(c: &mut Criterion) {
    let tx = payment(42);
    let len = tx.encode().expect("encodes").len();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(len as u64));
    group.bench_function("encode", |b| b.iter(|| black_box(&tx).encode()));
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let bytes = payment(42).encode().expect("encodes");

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| Transaction::decode(black_box(&bytes)))
    });
    group.finish();
}

fn bench_id(c: &mut Criterion) {
    let tx = payment(42);
    c.bench_function("codec/id", |b| b.iter(|| black_box(&tx).id()));
}

fn bench_sign(c: &mut Criterion) {
    let signer = Ed25519Signer::from_seed(&[7u8; 32]);
    let tx = payment(42);
    c.bench_function("codec/sign", |b| {
        b.iter(|| sign_transaction(black_box(&tx), &signer))
    });
}

fn bench_group_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/group_id");

    for size in [2, 8, 16] {
        let txs: Vec<_> = (0..size).map(payment).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &txs, |b, txs| {
            b.iter(|| compute_group_id(txs))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_id,
    bench_sign,
    bench_group_id
);
criterion_main!(benches);
