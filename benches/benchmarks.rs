use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use bytedict::Dict;
use std::collections::HashMap;

// Benchmarking module for Dict.
// These benchmarks are not exhaustive, and they focus on KPIs like set, get, del, etc.
// To run benchmarks, use the following command:
// cargo bench --bench benchmarks

const SEED: u32 = 0xdead_beef;
const N: usize = 10_000;

fn keys() -> Vec<Vec<u8>> {
    (0..N).map(|i| format!("key-{i}").into_bytes()).collect()
}

fn filled_dict(keys: &[Vec<u8>]) -> Dict<usize> {
    let mut dict = Dict::new(SEED, N);
    for (i, key) in keys.iter().enumerate() {
        dict.set(key, i);
    }
    dict
}

fn bench_set(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("Dict, N=1e4, set", |b| {
        let mut dict = Dict::new(SEED, N);
        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                black_box(dict.set(key, i));
            }
        })
    });
}

fn bench_insert_hashmap(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("HashMap, N=1e4, insert", |b| {
        let mut map = HashMap::new();
        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                black_box(map.insert(key.clone(), i));
            }
        })
    });
}

fn bench_get(c: &mut Criterion) {
    let keys = keys();
    let dict = filled_dict(&keys);
    c.bench_function("Dict, N=1e4, get", |b| {
        b.iter(|| {
            black_box(dict.get(&keys[N / 2]));
        })
    });
}

fn bench_get_hashmap(c: &mut Criterion) {
    let keys = keys();
    let mut map = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i);
    }
    c.bench_function("HashMap, N=1e4, get", |b| {
        b.iter(|| {
            black_box(map.get(&keys[N / 2]));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let keys = keys();
    let dict = filled_dict(&keys);
    c.bench_function("Dict, N=1e4, get miss", |b| {
        b.iter(|| {
            black_box(dict.get(b"missing-key"));
        })
    });
}

fn bench_get_chained(c: &mut Criterion) {
    let keys = keys();
    let mut dict = filled_dict(&keys);
    // A small bucket array forces long collision chains.
    dict.resize(64);
    c.bench_function("Dict, N=1e4, get at capacity 64", |b| {
        b.iter(|| {
            black_box(dict.get(&keys[N / 2]));
        })
    });
}

fn bench_del_set(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("Dict, N=1e4, del + set at N/2", |b| {
        let mut dict = filled_dict(&keys);
        b.iter(|| {
            black_box(dict.del(&keys[N / 2]));
            black_box(dict.set(&keys[N / 2], 0));
        })
    });
}

fn bench_resize(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("Dict, N=1e4, resize cycle", |b| {
        let mut dict = filled_dict(&keys);
        b.iter(|| {
            dict.resize(black_box(N / 4));
            dict.resize(black_box(N));
        })
    });
}

fn bench_iter(c: &mut Criterion) {
    let keys = keys();
    let dict = filled_dict(&keys);
    c.bench_function("Dict, N=1e4, iterate", |b| {
        b.iter(|| {
            black_box(dict.iter().count());
        })
    });
}

fn bench_clone(c: &mut Criterion) {
    let keys = keys();
    let dict = filled_dict(&keys);
    c.bench_function("Dict, N=1e4, clone", |b| {
        b.iter(|| {
            black_box(dict.clone());
        })
    });
}

fn bench_difference(c: &mut Criterion) {
    let keys = keys();
    let dict = filled_dict(&keys);
    let mut other = Dict::new(SEED + 1, N);
    for key in keys.iter().take(N / 2) {
        other.set(key, 0);
    }
    c.bench_function("Dict, N=1e4, difference", |b| {
        b.iter(|| {
            black_box(dict.difference(&other).count());
        })
    });
}

criterion_group!(
    benches,
    bench_set,
    bench_insert_hashmap,
    bench_get,
    bench_get_hashmap,
    bench_get_miss,
    bench_get_chained,
    bench_del_set,
    bench_resize,
    bench_iter,
    bench_clone,
    bench_difference,
);
criterion_main!(benches);
