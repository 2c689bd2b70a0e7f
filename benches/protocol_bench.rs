//! Benchmarks for carmine protocol operations

use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};

use carmine::protocol::{encode_command, read_reply, Command};

fn protocol_benchmarks(c: &mut Criterion) {
    let set = Command::new("SET").arg("user:1000:name").arg("a".repeat(256));
    c.bench_function("encode_set_256b", |b| {
        b.iter(|| encode_command(&set));
    });

    let mset = {
        let mut cmd = Command::new("MSET");
        for i in 0..32 {
            cmd = cmd.arg(format!("key:{}", i)).arg(format!("value:{}", i));
        }
        cmd
    };
    c.bench_function("encode_mset_32_pairs", |b| {
        b.iter(|| encode_command(&mset));
    });

    let bulk_reply = {
        let payload = "x".repeat(1024);
        format!("${}\r\n{}\r\n", payload.len(), payload).into_bytes()
    };
    c.bench_function("parse_bulk_1k", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(bulk_reply.as_slice());
            read_reply(&mut cursor).unwrap()
        });
    });

    let array_reply = {
        let mut buf = b"*64\r\n".to_vec();
        for i in 0..64 {
            let item = format!("member:{}", i);
            buf.extend_from_slice(format!("${}\r\n{}\r\n", item.len(), item).as_bytes());
        }
        buf
    };
    c.bench_function("parse_array_64", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(array_reply.as_slice());
            read_reply(&mut cursor).unwrap()
        });
    });
}

criterion_group!(benches, protocol_benchmarks);
criterion_main!(benches);
