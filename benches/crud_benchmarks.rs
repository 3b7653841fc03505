use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;
use lazy_ostree::{OSAvlMap, OSAvlSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_ordered");

    group.bench_function(BenchmarkId::new("OSAvlMap", N), |b| {
        b.iter(|| {
            let mut map = OSAvlMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_insert_random");

    group.bench_function(BenchmarkId::new("OSAvlMap", N), |b| {
        b.iter(|| {
            let mut map = OSAvlMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let os_map: OSAvlMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_get_random");

    group.bench_function(BenchmarkId::new("OSAvlMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = os_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = bt_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);

    let mut group = c.benchmark_group("map_remove_random");

    group.bench_function(BenchmarkId::new("OSAvlMap", N), |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<OSAvlMap<i64, i64>>(),
            |mut map| {
                for &k in &keys {
                    map.remove(&k);
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
            |mut map| {
                for &k in &keys {
                    map.remove(&k);
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Order-statistic Benchmarks ─────────────────────────────────────────────

fn bench_count_less(c: &mut Criterion) {
    let keys = random_keys(N);
    let os_map: OSAvlMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("count_less_random");

    group.bench_function(BenchmarkId::new("OSAvlMap", N), |b| {
        b.iter(|| {
            let mut total = 0usize;
            for &k in keys.iter().step_by(10) {
                total = total.wrapping_add(os_map.count_less(&k));
            }
            total
        });
    });

    // A BTreeMap has to walk the range to answer the same question.
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut total = 0usize;
            for &k in keys.iter().step_by(10) {
                total = total.wrapping_add(bt_map.range(..k).count());
            }
            total
        });
    });

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let os_map: OSAvlMap<i64, i64> = random_keys(N).into_iter().map(|k| (k, k)).collect();

    c.bench_function("select_all_ranks", |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in 1..=N {
                if let Some((key, _)) = os_map.select(k) {
                    sum = sum.wrapping_add(key);
                }
            }
            sum
        });
    });
}

fn bench_shift_from(c: &mut Criterion) {
    let keys = ordered_keys(N);

    let mut group = c.benchmark_group("shift_from");

    group.bench_function(BenchmarkId::new("OSAvlMap", N), |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k * 1_000, k)).collect::<OSAvlMap<i64, i64>>(),
            |mut map| {
                for &k in &keys {
                    map.shift_from(k * 1_000, 1).unwrap();
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    // Rebuilding the suffix is the only way to move keys in a BTreeMap.
    group.bench_function(BenchmarkId::new("BTreeMap", N / 10), |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k * 1_000, k)).collect::<BTreeMap<i64, i64>>(),
            |mut map| {
                for &k in keys.iter().take(N / 10) {
                    let moved = map.split_off(&(k * 1_000));
                    map.extend(moved.into_iter().map(|(key, v)| (key + 1, v)));
                }
                map
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_mixed(c: &mut Criterion) {
    let keys = random_keys(N);

    c.bench_function("set_insert_shift_query", |b| {
        b.iter(|| {
            let mut set = OSAvlSet::new();
            for &k in &keys {
                set.insert(k);
                if k % 7 == 0 {
                    set.shift_from(k, 3).unwrap();
                }
            }
            black_box(set.predecessor_or_equal(&(i64::MAX / 2)));
            set
        });
    });
}

criterion_group!(map_benches, bench_map_insert_ordered, bench_map_insert_random, bench_map_get_random, bench_map_remove_random,);

criterion_group!(order_statistic_benches, bench_count_less, bench_select, bench_shift_from,);

criterion_group!(set_benches, bench_set_mixed,);

criterion_main!(map_benches, order_statistic_benches, set_benches);
