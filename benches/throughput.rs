//! Encode/decode throughput for the wire path.
//!
//! Run with `cargo bench --bench throughput`.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use modbus_accessor::{
    build_request, coerce, decode_frame, encode_frame, parse_response, Accessor, FunctionCode,
};

fn bench_build_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_request");
    let accessors = [
        Accessor::holding_registers(0, "voltage", 2),
        Accessor::new(FunctionCode::WriteSingleCoil, 10, "pump", 1, true),
        Accessor::new(FunctionCode::WriteMultipleRegisters, 20, "setpoints", 16, true)
            .with_write_value(0x1234),
    ];

    for accessor in &accessors {
        group.bench_with_input(
            BenchmarkId::from_parameter(accessor.function().name()),
            accessor,
            |b, acc| b.iter(|| build_request(black_box(acc))),
        );
    }
    group.finish();
}

fn bench_encode_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");
    for size in [5usize, 64, 253] {
        let pdu = vec![0x03u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pdu, |b, pdu| {
            b.iter(|| encode_frame(black_box(1), 1, black_box(pdu)))
        });
    }
    group.finish();
}

fn bench_decode_and_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_parse");
    for registers in [1usize, 2, 4, 60] {
        let mut response = vec![0u8; 512];
        let pdu_len = 2 + registers * 2;
        response[5] = (pdu_len + 1) as u8;
        response[6] = 1;
        response[7] = 0x03;
        response[8] = (registers * 2) as u8;

        group.bench_with_input(
            BenchmarkId::from_parameter(registers),
            &response,
            |b, frame| {
                b.iter(|| {
                    let pdu = decode_frame(black_box(frame)).ok()?;
                    parse_response(&pdu).ok()
                })
            },
        );
    }
    group.finish();
}

fn bench_coerce(c: &mut Criterion) {
    let eight = [0x40, 0x09, 0x21, 0xFB, 0x54, 0x44, 0x2D, 0x18];
    c.bench_function("coerce/8", |b| b.iter(|| coerce(black_box(&eight), true)));

    let text = b"METER-0042-REV-B";
    c.bench_function("coerce/text", |b| b.iter(|| coerce(black_box(text), false)));
}

criterion_group!(
    benches,
    bench_build_request,
    bench_encode_frame,
    bench_decode_and_parse,
    bench_coerce
);
criterion_main!(benches);
