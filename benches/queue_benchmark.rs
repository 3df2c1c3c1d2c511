/*!
 * Blocking Queue Benchmarks
 *
 * Uncontended operation cost, handoff latency and multi-producer throughput
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use sync_queue::BlockingQueue;

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");

    group.bench_function("enqueue_try_dequeue", |b| {
        let queue = BlockingQueue::<u64>::new();
        b.iter(|| {
            queue.enqueue(black_box(1));
            black_box(queue.try_dequeue());
        });
    });

    for batch in [1usize, 16, 256] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("enqueue_all_drain", batch), &batch, |b, &batch| {
            let queue = BlockingQueue::<u64>::new();
            b.iter(|| {
                queue.enqueue_all(0..batch as u64);
                black_box(queue.dequeue_all());
            });
        });
    }

    group.finish();
}

fn bench_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("handoff");

    group.bench_function("dequeue_with_wait", |b| {
        let queue = Arc::new(BlockingQueue::<u64>::new());

        b.iter(|| {
            let queue_clone = queue.clone();
            let handle = thread::spawn(move || queue_clone.dequeue_with_wait());

            queue.enqueue(42);
            black_box(handle.join().unwrap());
        });
    });

    group.finish();
}

fn bench_producers(c: &mut Criterion) {
    let mut group = c.benchmark_group("producers");
    const PER_PRODUCER: u64 = 1_000;

    for producers in [1u64, 2, 4, 8] {
        group.throughput(Throughput::Elements(producers * PER_PRODUCER));
        group.bench_with_input(
            BenchmarkId::from_parameter(producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let queue = Arc::new(BlockingQueue::<u64>::new());

                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let queue_clone = queue.clone();
                            thread::spawn(move || {
                                for i in 0..PER_PRODUCER {
                                    queue_clone.enqueue(i);
                                }
                            })
                        })
                        .collect();

                    let mut received = 0;
                    while received < producers * PER_PRODUCER {
                        received += queue.dequeue_all().len() as u64;
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_handoff, bench_producers);
criterion_main!(benches);
