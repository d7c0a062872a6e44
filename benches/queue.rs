use std::sync::{Arc, Barrier};
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rw_list::LinkedList;

const ITEMS: usize = 500;
const OPS: usize = 200;

// each worker splices into the middle, looks its value up and takes it out again
fn contended_splice(threads: usize) {
    let list: Arc<LinkedList<usize>> = Arc::new((0..ITEMS).collect());
    let barrier = Arc::new(Barrier::new(threads));

    let handles = (0..threads)
        .map(|t| {
            let list = list.clone();
            let barrier = barrier.clone();

            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS {
                    let value = ITEMS + t * OPS + i;
                    let _ = list.insert(list.len() / 2, value);
                    // the index can go stale before the removal, that's fine here
                    if let Some(index) = list.index_of(&value) {
                        let _ = list.remove_at(index);
                    }
                }
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap();
    }
}

fn rw_list_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended-splice");
    for threads in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &n| {
            b.iter(|| contended_splice(n))
        });
    }
    group.finish();
}

fn rw_list_readers(c: &mut Criterion) {
    let list: Arc<LinkedList<usize>> = Arc::new((0..ITEMS).collect());
    c.bench_function("index-of-under-writer", |b| {
        b.iter(|| {
            let writer = {
                let list = list.clone();
                thread::spawn(move || {
                    for _ in 0..OPS {
                        list.insert(0, ITEMS).unwrap();
                        list.remove_at(0).unwrap();
                    }
                })
            };
            for _ in 0..OPS {
                assert!(list.index_of(&(ITEMS - 1)).is_some());
            }
            writer.join().unwrap();
        })
    });
}

fn rw_list_scan(c: &mut Criterion) {
    let list: LinkedList<usize> = (0..ITEMS).collect();
    c.bench_function("index-of-last", |b| b.iter(|| list.index_of(&(ITEMS - 1))));
    c.bench_function("size-walk", |b| b.iter(|| list.size()));
}

criterion_group!(benches, rw_list_contended, rw_list_readers, rw_list_scan);
criterion_main!(benches);
