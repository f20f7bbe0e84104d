use criterion::{criterion_group, criterion_main, Criterion};
use rreplica::{DecoderConfig, RespFrame, RespStreamDecoder};
use std::hint::black_box;

const DATA: &str = "+OK\r\n-ERR\r\n:1000\r\n$6\r\nfoobar\r\n$-1\r\n*2\r\n+hello\r\n$5\r\nworld\r\n+foo\r\n$3\r\nbar\r\n*3\r\n$3\r\nset\r\n$5\r\nhello\r\n$5\r\nworld\r\n*2\r\n*2\r\n:1\r\n:2\r\n*-1\r\n";

fn decode_whole(decoder: &mut RespStreamDecoder, buf: &[u8]) -> anyhow::Result<Vec<RespFrame>> {
    Ok(decoder.decode(buf)?)
}

fn decode_chunked(
    decoder: &mut RespStreamDecoder,
    buf: &[u8],
    chunk: usize,
) -> anyhow::Result<Vec<RespFrame>> {
    let mut frames = Vec::new();
    for piece in buf.chunks(chunk) {
        decoder.feed(piece)?;
    }
    frames.extend(decoder.drain());
    Ok(frames)
}

fn criterion_benchmark(c: &mut Criterion) {
    let config = DecoderConfig::default().with_buffer_capacity(4096);
    let mut decoder = RespStreamDecoder::new(config);

    c.bench_function("decode_whole", |b| {
        b.iter(|| decode_whole(&mut decoder, black_box(DATA.as_bytes())))
    });

    c.bench_function("decode_chunked_7", |b| {
        b.iter(|| decode_chunked(&mut decoder, black_box(DATA.as_bytes()), 7))
    });

    c.bench_function("decode_byte_by_byte", |b| {
        b.iter(|| decode_chunked(&mut decoder, black_box(DATA.as_bytes()), 1))
    });

    let payload = "x".repeat(64 * 1024);
    let bulk = format!("${}\r\n{}\r\n", payload.len(), payload);
    c.bench_function("decode_64k_bulk", |b| {
        b.iter(|| decode_chunked(&mut decoder, black_box(bulk.as_bytes()), 1460))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
