use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use sift_memory::{ArenaOptions, PageArena};
use sift_sorter::prefix::{bytes_prefix, LexicographicRecordComparator, UnsignedPrefix};
use sift_sorter::{InMemorySorter, SorterOptions};
use sift_types::RecordPointer;

const SEED: u64 = 0x5eed_50f7;
const RECORD_COUNT: usize = 10_000;
const PAYLOAD_LEN: usize = 32;

#[derive(Clone, Copy, Debug)]
enum Workload {
    // Unique prefixes: every comparison resolves in the buffer.
    Distinct,
    // One shared prefix: every comparison chases both record pointers.
    Colliding,
}

fn seed_records(workload: Workload) -> (PageArena, Vec<(RecordPointer, u64)>) {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut arena = PageArena::new(ArenaOptions::default()).expect("arena");
    let mut inserts = Vec::with_capacity(RECORD_COUNT);
    for _ in 0..RECORD_COUNT {
        let mut payload = [0u8; PAYLOAD_LEN];
        rng.fill(&mut payload[..]);
        let prefix = match workload {
            Workload::Distinct => bytes_prefix(&payload),
            Workload::Colliding => {
                payload[..8].fill(b'k');
                0
            }
        };
        let pointer = arena.append(&payload).expect("append");
        inserts.push((pointer, prefix));
    }
    (arena, inserts)
}

fn bench_insert(c: &mut Criterion) {
    let (_arena, inserts) = seed_records(Workload::Distinct);
    let mut group = c.benchmark_group("insert");
    group.bench_function(BenchmarkId::new("records", RECORD_COUNT), |b| {
        b.iter_batched(
            || {
                InMemorySorter::new(
                    UnsignedPrefix,
                    LexicographicRecordComparator,
                    SorterOptions {
                        initial_capacity: 16,
                        ..SorterOptions::default()
                    },
                )
                .expect("sorter")
            },
            |mut sorter| {
                for (pointer, prefix) in &inserts {
                    sorter.insert_record(*pointer, *prefix).expect("insert");
                }
                black_box(sorter.num_records())
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    group.sample_size(30);
    for workload in [Workload::Distinct, Workload::Colliding] {
        let (arena, inserts) = seed_records(workload);
        group.bench_with_input(
            BenchmarkId::new("prefixes", format!("{workload:?}")),
            &workload,
            |b, _| {
                b.iter_batched(
                    || {
                        let mut sorter = InMemorySorter::new(
                            UnsignedPrefix,
                            LexicographicRecordComparator,
                            SorterOptions::default(),
                        )
                        .expect("sorter");
                        for (pointer, prefix) in &inserts {
                            sorter.insert_record(*pointer, *prefix).expect("insert");
                        }
                        sorter
                    },
                    |mut sorter| {
                        let mut iter = sorter.sorted_iterator(&arena);
                        let mut walked = 0usize;
                        while iter.has_next() {
                            iter.advance();
                            walked += 1;
                        }
                        black_box(walked)
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_sort);
criterion_main!(benches);
