//! Basic usage examples for Pool

use recycling_pool::{Pool, PoolConfiguration, Poolable, ReleaseOutcome};

#[derive(Debug, Default)]
struct Bullet {
    active: bool,
    x: f32,
    y: f32,
}

impl Poolable for Bullet {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn main() {
    env_logger::init();

    println!("=== recycling_pool - Basic Examples ===\n");

    // Example 1: Acquire and release
    simple_pool();

    // Example 2: Growth when the pool runs dry
    growing_pool();

    // Example 3: Duplicate and stale releases
    release_outcomes();

    // Example 4: Metrics and health
    metrics_and_health();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let mut pool = Pool::with_factory(3, Bullet::default).unwrap();

    let bullet = pool
        .acquire_with(|b| {
            b.x = 10.0;
            b.y = -4.0;
        })
        .unwrap();
    let b = pool.get(bullet).unwrap();
    println!("   Got bullet at ({}, {}), active: {}", b.x, b.y, b.active);

    pool.release(bullet);
    println!("   Available after release: {}\n", pool.available_count());
}

fn growing_pool() {
    println!("2. Growing Pool:");
    let config = PoolConfiguration::new()
        .with_capacity(2)
        .with_name("bullets")
        .with_factory(Bullet::default);
    let mut pool = Pool::new(config).unwrap();

    let handles: Vec<_> = (0..5).map(|_| pool.acquire().unwrap()).collect();
    println!("   Acquired {} bullets", handles.len());
    println!(
        "   Capacity: {} (initial {})\n",
        pool.capacity(),
        pool.initial_capacity()
    );
}

fn release_outcomes() {
    println!("3. Release Outcomes:");
    let mut pool = Pool::with_factory(1, Bullet::default).unwrap();

    let first = pool.acquire().unwrap();
    println!("   First release:  {:?}", pool.release(first));
    println!("   Second release: {:?}", pool.release(first));

    let second = pool.acquire().unwrap();
    let outcome = pool.release(first);
    assert_eq!(outcome, ReleaseOutcome::Stale);
    println!("   Old handle after reuse: {:?}", outcome);
    println!("   Current holder still in use: {}\n", pool.is_in_use(second));
}

fn metrics_and_health() {
    println!("4. Metrics and Health:");
    let mut pool = Pool::with_factory(5, Bullet::default).unwrap();

    let _a = pool.acquire().unwrap();
    let _b = pool.acquire().unwrap();

    let health = pool.get_health_status();
    println!("   Health: {}", if health.is_healthy { "Healthy" } else { "Unhealthy" });
    println!("   Utilization: {:.1}%", health.utilization * 100.0);
    println!("   In use: {}, Available: {}", health.in_use_objects, health.available_objects);

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    let mut keys: Vec<_> = metrics.keys().collect();
    keys.sort();
    for key in keys {
        println!("     {}: {}", key, metrics[key]);
    }
}
