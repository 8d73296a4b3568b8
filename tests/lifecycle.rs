//! End-to-end acquire/release behaviour through the public API.

use recycling_pool::{
    FrameScheduler, Handle, Membership, Pool, PoolConfiguration, PoolError, Poolable,
    ReleaseOutcome,
};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Default)]
struct Enemy {
    active: bool,
    activations: u32,
    hp: u32,
}

impl Poolable for Enemy {
    fn set_active(&mut self, active: bool) {
        if active {
            self.activations += 1;
        }
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn enemies(capacity: usize) -> Pool<Enemy> {
    Pool::with_factory(capacity, Enemy::default).unwrap()
}

fn assert_partitioned(pool: &Pool<Enemy>, held: &[Handle]) {
    assert_eq!(pool.in_use_count(), held.len());
    assert_eq!(pool.available_count() + pool.in_use_count(), pool.capacity());
    for h in held {
        assert_eq!(pool.membership(*h), Some(Membership::InUse));
    }
}

#[test]
fn construct_five() {
    let pool = enemies(5);

    assert_eq!(pool.capacity(), 5);
    assert_eq!(pool.available_count(), 5);
    assert_eq!(pool.in_use_count(), 0);
    assert_eq!(pool.iter_in_use().count(), 0);
}

#[test]
fn construct_rejects_bad_configuration() {
    assert!(matches!(
        Pool::with_factory(0, Enemy::default),
        Err(PoolError::Configuration(_))
    ));
    assert!(matches!(
        Pool::<Enemy>::new(PoolConfiguration::new()),
        Err(PoolError::Configuration(_))
    ));
}

#[test]
fn acquire_five_then_sixth_grows() {
    let mut pool = enemies(5);

    let held: Vec<_> = (0..5).map(|_| pool.acquire().unwrap()).collect();
    assert_eq!(pool.available_count(), 0);
    assert_eq!(held.iter().collect::<HashSet<_>>().len(), 5);
    for h in &held {
        assert_eq!(pool.get(*h).unwrap().activations, 1);
        assert!(pool.get(*h).unwrap().active);
    }

    let sixth = pool.acquire().unwrap();
    assert_eq!(pool.capacity(), 6);
    assert_eq!(pool.initial_capacity(), 5);
    assert!(pool.is_in_use(sixth));
    let mut all = held.clone();
    all.push(sixth);
    assert_partitioned(&pool, &all);
}

#[test]
fn release_twice_yields_one_entry() {
    let mut pool = enemies(3);
    let h = pool.acquire().unwrap();

    pool.release(h);
    pool.release(h);
    assert_eq!(pool.available_count(), 3);

    let all: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();
    assert_eq!(all.iter().map(|h| h.index()).collect::<HashSet<_>>().len(), 3);
    assert_eq!(pool.capacity(), 3);
}

#[test]
fn release_of_untracked_handle_is_harmless() {
    let mut pool = enemies(2);
    let h = pool.acquire().unwrap();
    pool.release(h);

    assert_eq!(pool.release(h), ReleaseOutcome::AlreadyAvailable);
    assert_eq!(pool.available_count(), 2);
    assert!(!pool.get(h).is_some_and(|e| e.active));
}

#[test]
fn lifo_order() {
    let mut pool = enemies(4);
    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();

    pool.release(a);
    pool.release(b);

    assert_eq!(pool.acquire().unwrap().index(), b.index());
    assert_eq!(pool.acquire().unwrap().index(), a.index());
}

#[test]
fn deferred_release_waits_for_scheduled_time() {
    let mut pool = enemies(2);
    let mut frames = FrameScheduler::new();
    let h = pool.acquire_with(|e| e.hp = 30).unwrap();
    assert_eq!(pool.get(h).unwrap().hp, 30);

    pool.deferred_release(h, Duration::from_secs(2), &mut frames);

    for _ in 0..19 {
        frames.advance(Duration::from_millis(100), &mut pool);
        assert!(pool.is_in_use(h));
    }
    frames.advance(Duration::from_millis(100), &mut pool);
    assert_eq!(pool.membership(h), Some(Membership::Available));

    frames.advance(Duration::from_secs(2), &mut pool);
    assert_eq!(pool.get_metrics().total_released, 1);
    assert_eq!(pool.get_metrics().duplicate_releases, 0);
}

#[test]
fn mixed_sequence_keeps_partition() {
    let mut pool = enemies(4);
    let mut frames = FrameScheduler::new();
    let mut held = Vec::new();

    for round in 0..50u64 {
        held.push(pool.acquire().unwrap());
        if round % 4 == 0 {
            let h = held.remove(0);
            pool.deferred_release(h, Duration::from_millis(10 * (round % 3)), &mut frames);
            frames.advance(Duration::from_millis(30), &mut pool);
            assert!(!pool.is_in_use(h));
        } else if round % 4 == 1 {
            let h = held.pop().unwrap();
            pool.release(h);
        }
        assert_partitioned(&pool, &held);
    }

    let metrics = pool.get_metrics();
    assert_eq!(metrics.in_use_objects, held.len());
    assert_eq!(metrics.capacity, pool.capacity());
}
