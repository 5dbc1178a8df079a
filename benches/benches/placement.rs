// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Vec2};
use waymark_labels::{
    FrameOptions, Kind, Label, LabelSet, Labels, Mesh, NoCache, Options, StyleId, Tile, TileId,
    View,
};

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

fn gen_tile(id: TileId, label_count: usize, rng: &mut Rng) -> Tile {
    let mut labels = Vec::with_capacity(label_count);
    for _ in 0..label_count {
        let anchor = Point::new(rng.next_f64() * 1920.0, rng.next_f64() * 1080.0);
        let dims = Vec2::new(60.0 + rng.next_f64() * 120.0, 18.0 + rng.next_f64() * 8.0);
        let group = rng.next_u64() % 8;
        labels.push(Label::new(
            rng.next_u64(),
            Kind::Text,
            anchor,
            dims,
            Options {
                priority: (rng.next_u64() % 10) as f64,
                repeat_group: group,
                repeat_distance: if group == 0 { 0.0 } else { 120.0 },
                ..Options::default()
            },
        ));
    }
    let mut tile = Tile::new(0, id, false, Affine::IDENTITY);
    tile.meshes
        .push(Mesh::Labels(LabelSet::new(StyleId(0), labels)));
    tile
}

fn gen_tiles(tile_count: usize, per_tile: usize) -> Vec<Tile> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..tile_count)
        .map(|i| gen_tile(TileId::new(10, i as i32, 0), per_tile, &mut rng))
        .collect()
}

fn frame_view() -> View {
    View {
        width: 1920.0,
        height: 1080.0,
        zoom: 10.5,
        world_to_screen: Affine::IDENTITY,
    }
}

fn bench_first_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_frame");
    for &(tiles, per_tile) in &[(4usize, 128usize), (16, 128), (16, 512)] {
        group.throughput(Throughput::Elements((tiles * per_tile) as u64));
        group.bench_function(format!("t{}_l{}", tiles, per_tile), |b| {
            b.iter_batched(
                || (Labels::new(), gen_tiles(tiles, per_tile)),
                |(mut labels, mut set)| {
                    let run = labels.update_label_set(
                        &frame_view(),
                        0.016,
                        &mut set,
                        &NoCache,
                        &FrameOptions::default(),
                    );
                    black_box(run);
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_state");
    group.throughput(Throughput::Elements((16 * 128) as u64));
    group.bench_function("t16_l128_settled", |b| {
        b.iter_batched(
            || {
                let mut labels = Labels::new();
                let mut set = gen_tiles(16, 128);
                // Let fades settle so the measured frame is pure placement.
                for _ in 0..20 {
                    labels.update_label_set(
                        &frame_view(),
                        0.1,
                        &mut set,
                        &NoCache,
                        &FrameOptions::default(),
                    );
                }
                (labels, set)
            },
            |(mut labels, mut set)| {
                let run = labels.update_label_set(
                    &frame_view(),
                    0.016,
                    &mut set,
                    &NoCache,
                    &FrameOptions::default(),
                );
                black_box(run);
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_transitions_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions_only");
    group.throughput(Throughput::Elements((16 * 128) as u64));
    group.bench_function("t16_l128", |b| {
        b.iter_batched(
            || {
                let mut labels = Labels::new();
                let mut set = gen_tiles(16, 128);
                labels.update_label_set(
                    &frame_view(),
                    0.016,
                    &mut set,
                    &NoCache,
                    &FrameOptions::default(),
                );
                (labels, set)
            },
            |(labels, mut set)| {
                let run = labels.update_transitions(&frame_view(), 0.016, &mut set);
                black_box(run);
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_first_frame,
    bench_steady_state,
    bench_transitions_only,
);
criterion_main!(benches);
