// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use waymark_collide::{Aabb, Obb, PairGrid};

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

fn gen_label_boxes(count: usize, width: f64, height: f64, seed: u64) -> Vec<Obb> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(seed);
    for _ in 0..count {
        let center = Point::new(rng.next_f64() * width, rng.next_f64() * height);
        let rotation = (rng.next_f64() - 0.5) * 0.4;
        let dims = Vec2::new(60.0 + rng.next_f64() * 120.0, 14.0 + rng.next_f64() * 12.0);
        out.push(Obb::new(center, rotation, dims));
    }
    out
}

fn gen_clustered_boxes(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Obb> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 1920.0, rng.next_f64() * 1080.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Obb::new(
                Point::new(cx + dx, cy + dy),
                0.0,
                Vec2::new(90.0, 20.0),
            ));
        }
    }
    out
}

fn aabbs_of(boxes: &[Obb]) -> Vec<Aabb> {
    boxes.iter().map(Obb::aabb).collect()
}

fn bench_grid_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_uniform");
    for &count in &[512usize, 2048, 8192] {
        let boxes = gen_label_boxes(count, 1920.0, 1080.0, 0xCAFE_F00D_DEAD_BEEF);
        let aabbs = aabbs_of(&boxes);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("resize_intersect_n{}", count), |b| {
            b.iter_batched(
                PairGrid::new,
                |mut grid| {
                    grid.resize((8, 5), (1920.0, 1080.0));
                    let hits = grid
                        .intersect(&aabbs)
                        .iter()
                        .filter(|&&(i, j)| boxes[i].intersects(&boxes[j]))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_grid_reused(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_reused");
    let boxes = gen_label_boxes(4096, 1920.0, 1080.0, 0xBADC_F00D_1234_5678);
    let aabbs = aabbs_of(&boxes);
    group.throughput(Throughput::Elements(4096));
    group.bench_function("intersect_warm_buffers", |b| {
        let mut grid = PairGrid::new();
        grid.resize((8, 5), (1920.0, 1080.0));
        b.iter(|| {
            let pairs = grid.intersect(&aabbs).len();
            black_box(pairs);
        })
    });
    group.finish();
}

fn bench_grid_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_clustered");
    let boxes = gen_clustered_boxes(16, 256, 160.0);
    let aabbs = aabbs_of(&boxes);
    group.throughput(Throughput::Elements((16 * 256) as u64));
    group.bench_function("resize_intersect", |b| {
        b.iter_batched(
            PairGrid::new,
            |mut grid| {
                grid.resize((8, 5), (1920.0, 1080.0));
                let hits = grid
                    .intersect(&aabbs)
                    .iter()
                    .filter(|&&(i, j)| boxes[i].intersects(&boxes[j]))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force");
    for &count in &[512usize, 2048] {
        let boxes = gen_label_boxes(count, 1920.0, 1080.0, 0xFACE_FEED_CAFE_BABE);
        let aabbs = aabbs_of(&boxes);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("all_pairs_n{}", count), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for i in 0..boxes.len() {
                    for j in (i + 1)..boxes.len() {
                        if aabbs[i].intersects(&aabbs[j]) && boxes[i].intersects(&boxes[j]) {
                            hits += 1;
                        }
                    }
                }
                black_box(hits);
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_grid_uniform,
    bench_grid_reused,
    bench_grid_clustered,
    bench_brute_force,
);
criterion_main!(benches);
