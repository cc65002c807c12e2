use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use peerwire::protocol::{decode_query_hit, generate_id};
use peerwire::{Message, MessageHeader, MessageType, QueryHit, ResourceEntry};

fn sample_header(msg_type: MessageType) -> MessageHeader {
    MessageHeader::new(msg_type, 0x0A00_0001, 8601, 0xDEAD_BEEF)
}

fn sample_hit(count: u16) -> QueryHit {
    QueryHit::new(
        (0..count)
            .map(|i| ResourceEntry::new(i, u32::from(i) * 31))
            .collect(),
    )
}

fn bench_header(c: &mut Criterion) {
    let mut group = c.benchmark_group("header");
    let header = sample_header(MessageType::Query).with_length(128);
    let encoded = header.to_bytes();

    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("encode", |b| {
        b.iter(|| black_box(black_box(&header).to_bytes()));
    });
    group.bench_function("decode", |b| {
        b.iter(|| black_box(MessageHeader::from_bytes(black_box(&encoded)).unwrap()));
    });
    group.bench_function("generate_id", |b| {
        b.iter(|| {
            black_box(generate_id(
                black_box(8601),
                black_box(0x0A00_0001),
                black_box(1_700_000_000_000),
            ))
        });
    });

    group.finish();
}

fn bench_query_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_hit");

    for count in [1u16, 16, 1024] {
        let hit = sample_hit(count);
        let message = hit.to_message(sample_header(MessageType::QueryHit)).unwrap();
        let encoded = message.encode();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_function(format!("encode_{count}"), |b| {
            b.iter(|| {
                let message = hit.to_message(sample_header(MessageType::QueryHit)).unwrap();
                black_box(message.encode())
            });
        });
        group.bench_function(format!("decode_{count}"), |b| {
            b.iter(|| {
                let message = Message::decode(encoded.clone()).unwrap();
                black_box(decode_query_hit(&message).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_header, bench_query_hit);
criterion_main!(benches);
