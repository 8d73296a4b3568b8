//! Advanced features: host contexts, fallible factories, Prometheus export

use recycling_pool::{FrameScheduler, Pool, PoolConfiguration, PoolError, Poolable};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug)]
struct Particle {
    id: usize,
    enabled: bool,
}

impl Poolable for Particle {
    fn set_active(&mut self, active: bool) {
        self.enabled = active;
    }

    fn is_active(&self) -> bool {
        self.enabled
    }
}

struct Scene {
    particles: Pool<Particle>,
    frame: u32,
}

fn particles(scene: &mut Scene) -> &mut Pool<Particle> {
    &mut scene.particles
}

fn main() {
    env_logger::init();

    println!("=== recycling_pool - Advanced Features ===\n");

    // Example 1: Pool living inside a scene
    scene_context();

    // Example 2: Factory failures
    fallible_factory();

    // Example 3: Prometheus metrics
    prometheus_export();
}

fn particle_factory() -> impl FnMut() -> Particle {
    let mut next = 0;
    move || {
        next += 1;
        Particle {
            id: next,
            enabled: false,
        }
    }
}

fn scene_context() {
    println!("1. Scene Context:");

    let config = PoolConfiguration::new()
        .with_capacity(3)
        .with_name("particles")
        .with_factory(particle_factory());
    let mut scene = Scene {
        particles: Pool::new(config).unwrap(),
        frame: 0,
    };
    let mut frames = FrameScheduler::<Scene>::new();

    for i in 1..=3 {
        let p = scene.particles.acquire().unwrap();
        scene
            .particles
            .deferred_release_in(p, Duration::from_millis(16 * i), &mut frames, particles);
    }

    while scene.particles.in_use_count() > 0 {
        frames.advance(Duration::from_millis(16), &mut scene);
        scene.frame += 1;
        let live: Vec<usize> = scene.particles.iter_in_use().map(|(_, p)| p.id).collect();
        println!("   Frame {}: live particles {:?}", scene.frame, live);
    }
    println!();
}

fn fallible_factory() {
    println!("2. Fallible Factory:");

    let mut budget = 2;
    let config = PoolConfiguration::new()
        .with_capacity(2)
        .with_fallible_factory(move || {
            if budget == 0 {
                return Err("particle budget exhausted");
            }
            budget -= 1;
            Ok(Particle {
                id: budget,
                enabled: false,
            })
        });
    let mut pool = Pool::new(config).unwrap();

    let _a = pool.acquire().unwrap();
    let _b = pool.acquire().unwrap();
    match pool.acquire() {
        Ok(_) => println!("   Unexpected growth"),
        Err(PoolError::Factory(source)) => println!("   Growth failed: {}", source),
        Err(e) => println!("   Error: {}", e),
    }
    println!();
}

fn prometheus_export() {
    println!("3. Prometheus Export:");

    let mut pool = Pool::with_factory(2, particle_factory()).unwrap();
    for _ in 0..3 {
        pool.acquire().unwrap();
    }

    let mut tags = HashMap::new();
    tags.insert("scene".to_string(), "demo".to_string());

    print!("{}", pool.export_metrics_prometheus("particles", Some(&tags)));
}
