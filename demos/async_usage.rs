//! Deferred release driven by the tokio timer

use recycling_pool::{LocalScheduler, Pool, Poolable};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::sleep;

#[derive(Debug, Default)]
struct Explosion {
    playing: bool,
    radius: f32,
}

impl Poolable for Explosion {
    fn set_active(&mut self, active: bool) {
        self.playing = active;
    }

    fn is_active(&self) -> bool {
        self.playing
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    println!("=== recycling_pool - Async Examples ===\n");

    let local = LocalSet::new();
    local.run_until(run()).await;
}

async fn run() {
    let pool = Rc::new(RefCell::new(
        Pool::with_factory(2, Explosion::default).unwrap(),
    ));
    let mut scheduler = LocalScheduler::new(Rc::clone(&pool));

    // Example 1: Timed release
    println!("1. Timed Release:");
    {
        let mut p = pool.borrow_mut();
        for radius in [1.0, 2.5, 4.0] {
            let boom = p.acquire_with(|e| e.radius = radius).unwrap();
            let delay = Duration::from_millis((radius * 40.0) as u64);
            p.deferred_release(boom, delay, &mut scheduler);
        }
        let radii: Vec<f32> = p.iter_in_use().map(|(_, e)| e.radius).collect();
        println!("   Playing radii {:?}, capacity {}", radii, p.capacity());
    }

    while pool.borrow().in_use_count() > 0 {
        sleep(Duration::from_millis(50)).await;
        println!("   In use: {}", pool.borrow().in_use_count());
    }
    println!();

    // Example 2: Cancelling a release
    println!("2. Cancelled Release:");
    let (boom, pending) = {
        let mut p = pool.borrow_mut();
        let boom = p.acquire().unwrap();
        let pending = p.deferred_release(boom, Duration::from_millis(20), &mut scheduler);
        (boom, pending)
    };
    let cancelled = pool.borrow().cancel_deferred_release(pending, &mut scheduler);
    sleep(Duration::from_millis(50)).await;
    println!(
        "   Cancelled: {}, still in use: {}",
        cancelled,
        pool.borrow().is_in_use(boom)
    );
}
