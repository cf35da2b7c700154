// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_aabb_tree::{Aabb, AabbTree, InsertMethod, QueryFlags, Traversal};

fn rect(x0: f64, y0: f64, w: f64, h: f64) -> Aabb<f64> {
    Aabb::new([(x0, x0 + w), (y0, y0 + h)]).unwrap()
}

fn gen_grid_rects(n: usize, cell: f64, scale: f64) -> Vec<Aabb<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(rect(x0, y0, cell * scale, cell * scale));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, size: f64, seed: u64) -> Vec<Aabb<f64>> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * (extent - size);
            let y0 = rng.next_f64() * (extent - size);
            rect(x0, y0, size, size)
        })
        .collect()
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(rect(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn gen_cubes_i64(n: i64, cell: i64) -> Vec<Aabb<i64>> {
    let mut out = Vec::new();
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                out.push(
                    Aabb::new([
                        (x * cell, x * cell + cell),
                        (y * cell, y * cell + cell),
                        (z * cell, z * cell + cell),
                    ])
                    .unwrap(),
                );
            }
        }
    }
    out
}

fn build(rects: &[Aabb<f64>], method: InsertMethod) -> AabbTree<f64, u32> {
    let mut tree = AabbTree::with_method(method);
    for (i, r) in rects.iter().cloned().enumerate() {
        tree.add(r, i as u32).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for method in [InsertMethod::Volume, InsertMethod::Perimeter] {
        for &n in &[16usize, 32, 64] {
            let rects = gen_grid_rects(n, 10.0, 1.0);
            group.throughput(Throughput::Elements((n * n) as u64));
            group.bench_function(format!("{method:?}_grid_n{n}"), |b| {
                b.iter_batched(
                    || rects.clone(),
                    |rects| black_box(build(&rects, method).depth()),
                    BatchSize::SmallInput,
                )
            });
        }
        let rects = gen_random_rects(4096, 2000.0, 12.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(rects.len() as u64));
        group.bench_function(format!("{method:?}_random"), |b| {
            b.iter_batched(
                || rects.clone(),
                |rects| black_box(build(&rects, method).depth()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query_box(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_box");
    let rects = gen_clustered_rects(16, 256, 128.0);
    let tree = build(&rects, InsertMethod::Volume);
    let probes = gen_random_rects(256, 2000.0, 64.0, 0xFACE_FEED_CAFE_BABE);
    for traversal in [Traversal::DepthFirst, Traversal::BreadthFirst] {
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("{traversal:?}_values"), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for p in &probes {
                    total += tree
                        .overlap_values(p, traversal, QueryFlags::default())
                        .unwrap()
                        .len();
                }
                black_box(total)
            })
        });
        group.bench_function(format!("{traversal:?}_does_overlap"), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for p in &probes {
                    if tree
                        .does_overlap(p, traversal, QueryFlags::CLOSED)
                        .unwrap()
                    {
                        total += 1;
                    }
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

fn bench_query_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_tree");
    let tree = build(&gen_grid_rects(64, 10.0, 1.5), InsertMethod::Volume);
    let other = build(
        &gen_random_rects(512, 640.0, 8.0, 0xBADC_F00D_1234_5678),
        InsertMethod::Volume,
    );
    for traversal in [Traversal::DepthFirst, Traversal::BreadthFirst] {
        for flags in [QueryFlags::empty(), QueryFlags::UNIQUE] {
            group.bench_function(format!("{traversal:?}_{flags:?}"), |b| {
                b.iter(|| black_box(tree.overlap_pairs(&other, traversal, flags).unwrap().len()))
            });
        }
    }
    group.finish();
}

fn bench_cubes_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("cubes_i64");
    let cubes = gen_cubes_i64(12, 10);
    group.throughput(Throughput::Elements(cubes.len() as u64));
    group.bench_function("insert_then_query", |b| {
        b.iter_batched(
            || cubes.clone(),
            |cubes| {
                let mut tree = AabbTree::new();
                for (i, c) in cubes.into_iter().enumerate() {
                    tree.add(c, i).unwrap();
                }
                let probe = Aabb::new([(25_i64, 55), (25, 55), (25, 55)]).unwrap();
                let hits = tree
                    .overlap_values(&probe, Traversal::DepthFirst, QueryFlags::default())
                    .unwrap()
                    .len();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_query_box,
    bench_query_tree,
    bench_cubes_i64,
);
criterion_main!(benches);
