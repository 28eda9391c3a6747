use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use secflake::{CreatorConfig, IdCreator, SystemClock, ThreadRandom, TimeSource};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    secs: u64,
}

impl TimeSource for FixedMockTime {
    fn current_secs(&self) -> u64 {
        self.secs
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks the hot path of a single caller.
fn bench_creator<T>(c: &mut Criterion, group_name: &str, creator_factory: impl Fn() -> IdCreator<T>)
where
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let creator = creator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(creator.create());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks contention on one shared creator.
fn bench_creator_threaded<T>(
    c: &mut Criterion,
    group_name: &str,
    creator_factory: impl Fn() -> IdCreator<T>,
) where
    T: TimeSource + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for threads in [1, 2, 4, 8].into_iter().filter(|&t| t <= num_cpus::get()) {
        let total = TOTAL_IDS * threads;
        group.throughput(Throughput::Elements(total as u64));

        group.bench_function(format!("threads/{threads}/elems/{total}"), |b| {
            b.iter_custom(|iters| {
                let mut elapsed = core::time::Duration::ZERO;
                for _ in 0..iters {
                    let creator = Arc::new(creator_factory());
                    let barrier = Barrier::new(threads + 1);
                    let start = scope(|s| {
                        for _ in 0..threads {
                            let creator = Arc::clone(&creator);
                            let barrier = &barrier;
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..TOTAL_IDS {
                                    black_box(creator.create());
                                }
                            });
                        }
                        barrier.wait();
                        Instant::now()
                    });
                    elapsed += start.elapsed();
                }
                elapsed
            });
        });
    }

    group.finish();
}

fn benchmark_mock_fixed_clock(c: &mut Criterion) {
    bench_creator(c, "creator/fixed_clock", || {
        IdCreator::with_sources(
            &CreatorConfig::new(1, 16, 0),
            FixedMockTime { secs: 1 },
            ThreadRandom,
        )
    });
}

fn benchmark_mock_fixed_clock_borrowing(c: &mut Criterion) {
    // 256 IDs per second: most of each iteration runs on borrowed seconds.
    bench_creator(c, "creator/fixed_clock_borrowing", || {
        IdCreator::with_sources(
            &CreatorConfig::new(1, 8, 0),
            FixedMockTime { secs: 1 },
            ThreadRandom,
        )
    });
}

fn benchmark_system_clock(c: &mut Criterion) {
    bench_creator::<SystemClock>(c, "creator/system_clock", || IdCreator::new(1, 16, 0));
}

fn benchmark_system_clock_threaded(c: &mut Criterion) {
    bench_creator_threaded::<SystemClock>(c, "creator/system_clock_threaded", || {
        IdCreator::new(1, 16, 0)
    });
}

criterion_group!(
    benches,
    benchmark_mock_fixed_clock,
    benchmark_mock_fixed_clock_borrowing,
    benchmark_system_clock,
    benchmark_system_clock_threaded,
);
criterion_main!(benches);
