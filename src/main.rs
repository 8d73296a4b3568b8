// recycling_pool demo binary
// Run examples with: cargo run --example basic

use recycling_pool::{FrameScheduler, Pool, PoolConfiguration, Poolable};
use std::time::Duration;

#[derive(Debug, Default)]
struct Shell {
    visible: bool,
    lifetime: f32,
}

impl Poolable for Shell {
    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }

    fn is_active(&self) -> bool {
        self.visible
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== recycling_pool ===");
    println!("Run: cargo run --example basic");
    println!();

    let config = PoolConfiguration::new()
        .with_capacity(4)
        .with_name("shells")
        .with_factory(Shell::default);
    let mut pool = Pool::new(config)?;
    let mut frames = FrameScheduler::new();

    // Fire six shells, each living a little longer than the last.
    for i in 0..6u64 {
        let shell = pool.acquire_with(|s| s.lifetime = 0.1 * (i + 1) as f32)?;
        pool.deferred_release(shell, Duration::from_millis(100 * (i + 1)), &mut frames);
    }
    println!("  Capacity after volley: {}", pool.capacity());

    let airtime: f32 = pool.iter_in_use().map(|(_, shell)| shell.lifetime).sum();
    println!("  Total airtime: {:.1}s", airtime);

    let step = Duration::from_millis(50);
    while pool.in_use_count() > 0 {
        frames.advance(step, &mut pool);
        println!(
            "  t={:>4?} in use: {} available: {}",
            frames.now(),
            pool.in_use_count(),
            pool.available_count()
        );
    }

    let health = pool.get_health_status();
    println!();
    println!("  Healthy: {}", health.is_healthy());
    for warning in &health.warnings {
        println!("  Warning: {}", warning);
    }

    Ok(())
}
