//! Acquire/release throughput of the recycling pool.

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use recycling_pool::{FrameScheduler, Pool, Poolable};

#[derive(Default)]
struct Body {
    active: bool,
    velocity: [f32; 3],
}

impl Poolable for Body {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("recycling_pool");

    let mut pool = Pool::with_factory(1024, Body::default).unwrap();
    group.bench_function("acquire_release", |b| {
        b.iter(|| {
            let h = pool.acquire_with(|body| body.velocity = [1.0, 0.0, 0.0]).unwrap();
            black_box(pool.release(h));
        });
    });

    let mut pool = Pool::with_factory(1024, Body::default).unwrap();
    let mut held = Vec::with_capacity(512);
    group.bench_function("burst_512", |b| {
        b.iter(|| {
            for _ in 0..512 {
                held.push(pool.acquire().unwrap());
            }
            for h in held.drain(..) {
                pool.release(h);
            }
        });
    });

    let mut pool = Pool::with_factory(256, Body::default).unwrap();
    let mut frames = FrameScheduler::new();
    group.bench_function("deferred_release_frame", |b| {
        b.iter(|| {
            for _ in 0..64 {
                let h = pool.acquire().unwrap();
                pool.deferred_release(h, Duration::from_millis(16), &mut frames);
            }
            black_box(frames.advance(Duration::from_millis(16), &mut pool));
        });
    });

    group.finish();
}

criterion_group!(benches, entrypoint);
criterion_main!(benches);
