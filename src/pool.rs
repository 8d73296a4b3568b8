//! Core recycling pool

use crate::config::{Factory, PoolConfiguration};
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};
use crate::poolable::Poolable;
use crate::scheduler::{Schedule, TimerId};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

/// Reference to an object owned by a [`Pool`].
///
/// A handle stays valid from the acquisition that produced it until the object
/// is acquired again. After that it is stale and every pool operation treats
/// it as foreign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    epoch: u64,
}

impl Handle {
    /// Slot of the object inside its pool
    pub fn index(&self) -> usize {
        self.index
    }

    /// Acquisition count of the slot when this handle was issued
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Which collection a pooled object currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Available,
    InUse,
}

/// Result of [`Pool::release`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The object moved back to the available stack
    Released,

    /// The object was already available; nothing was pushed
    AlreadyAvailable,

    /// The object has been acquired again since this handle was issued
    Stale,

    /// The handle does not belong to this pool
    Unknown,
}

/// A release scheduled with [`Pool::deferred_release`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRelease {
    handle: Handle,
    timer: TimerId,
}

impl PendingRelease {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Timer to pass to [`Schedule::cancel`]
    pub fn timer(&self) -> TimerId {
        self.timer
    }
}

struct Slot<T> {
    value: T,
    state: Membership,
    epoch: u64,
}

/// Growable pool of reusable objects.
///
/// Objects are created up front, handed out with [`acquire`](Pool::acquire)
/// and put back with [`release`](Pool::release). When nothing is available the
/// pool creates one more object instead of failing. Objects are never
/// destroyed while the pool lives.
///
/// # Examples
///
/// ```
/// use recycling_pool::{Pool, Poolable, ReleaseOutcome};
///
/// #[derive(Default)]
/// struct Bullet {
///     alive: bool,
///     speed: f32,
/// }
///
/// impl Poolable for Bullet {
///     fn set_active(&mut self, active: bool) { self.alive = active; }
///     fn is_active(&self) -> bool { self.alive }
/// }
///
/// let mut pool = Pool::with_factory(2, Bullet::default).unwrap();
///
/// let bullet = pool.acquire_with(|b| b.speed = 12.0).unwrap();
/// assert!(pool.get(bullet).unwrap().alive);
///
/// assert_eq!(pool.release(bullet), ReleaseOutcome::Released);
/// assert_eq!(pool.release(bullet), ReleaseOutcome::AlreadyAvailable);
/// assert_eq!(pool.available_count(), 2);
/// ```
pub struct Pool<T> {
    name: String,
    slots: Vec<Slot<T>>,
    available: Vec<usize>,
    in_use: HashSet<usize>,
    factory: Factory<T>,
    initial_capacity: usize,
    metrics: MetricsTracker,
}

impl<T: Poolable> Pool<T> {
    /// Create a pool and pre-create `config.capacity` inactive objects.
    ///
    /// Fails if the capacity is zero, no factory is configured, or the factory
    /// fails for any of the initial objects.
    pub fn new(config: PoolConfiguration<T>) -> PoolResult<Self> {
        let PoolConfiguration {
            capacity,
            name,
            factory,
        } = config;

        if capacity == 0 {
            return Err(PoolError::Configuration(
                "capacity must be greater than zero".to_string(),
            ));
        }

        let Some(mut factory) = factory else {
            return Err(PoolError::Configuration("no factory configured".to_string()));
        };

        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let mut value = factory().map_err(PoolError::Factory)?;
            value.set_active(false);
            slots.push(Slot {
                value,
                state: Membership::Available,
                epoch: 0,
            });
        }

        log::debug!("Pool '{}' created with {} objects", name, capacity);

        Ok(Self {
            name,
            slots,
            available: (0..capacity).collect(),
            in_use: HashSet::with_capacity(capacity),
            factory,
            initial_capacity: capacity,
            metrics: MetricsTracker::new(),
        })
    }

    /// Create a pool from a capacity and an infallible factory
    pub fn with_factory<F>(capacity: usize, factory: F) -> PoolResult<Self>
    where
        F: FnMut() -> T + 'static,
    {
        Self::new(
            PoolConfiguration::new()
                .with_capacity(capacity)
                .with_factory(factory),
        )
    }

    /// Acquire an object without re-initializing it
    pub fn acquire(&mut self) -> PoolResult<Handle> {
        self.acquire_with(|_| {})
    }

    /// Acquire an object, run `initializer` on it and activate it.
    ///
    /// The most recently released object is reused first. If none is
    /// available a new one is created, so this only fails when the factory
    /// does.
    pub fn acquire_with<F>(&mut self, initializer: F) -> PoolResult<Handle>
    where
        F: FnOnce(&mut T),
    {
        while let Some(index) = self.available.pop() {
            let slot = &mut self.slots[index];
            slot.state = Membership::InUse;
            slot.epoch += 1;
            self.in_use.insert(index);

            // The host flipped this object on behind our back. Leave it with
            // whoever did that and try the next one.
            if slot.value.is_active() {
                self.metrics.consistency_faults += 1;
                log::error!("Pool '{}': {}", self.name, PoolError::Consistency { index });
                continue;
            }

            return Ok(self.hand_out(index, initializer));
        }

        let value = (self.factory)().map_err(PoolError::Factory)?;
        let index = self.slots.len();
        self.slots.push(Slot {
            value,
            state: Membership::InUse,
            epoch: 1,
        });
        self.in_use.insert(index);
        self.metrics.total_grown += 1;

        log::warn!(
            "Pool '{}' ran dry, grew to {} objects (initial {})",
            self.name,
            self.slots.len(),
            self.initial_capacity
        );

        Ok(self.hand_out(index, initializer))
    }

    fn hand_out<F>(&mut self, index: usize, initializer: F) -> Handle
    where
        F: FnOnce(&mut T),
    {
        let slot = &mut self.slots[index];
        initializer(&mut slot.value);
        slot.value.set_active(true);
        self.metrics.total_acquired += 1;

        log::debug!("Pool '{}' acquired slot {} (epoch {})", self.name, index, slot.epoch);

        Handle {
            index,
            epoch: slot.epoch,
        }
    }

    /// Deactivate the object and make it available again.
    ///
    /// Never fails. Releasing twice leaves a single entry on the available
    /// stack, and stale or foreign handles are ignored.
    pub fn release(&mut self, handle: Handle) -> ReleaseOutcome {
        let Some(slot) = self.slots.get_mut(handle.index) else {
            log::warn!(
                "Pool '{}' ignored release of unknown slot {}",
                self.name,
                handle.index
            );
            return ReleaseOutcome::Unknown;
        };

        if slot.epoch != handle.epoch {
            self.metrics.stale_releases += 1;
            log::debug!(
                "Pool '{}' ignored stale release of slot {} (epoch {}, now {})",
                self.name,
                handle.index,
                handle.epoch,
                slot.epoch
            );
            return ReleaseOutcome::Stale;
        }

        slot.value.set_active(false);

        match slot.state {
            Membership::InUse => {
                slot.state = Membership::Available;
                self.in_use.remove(&handle.index);
                self.available.push(handle.index);
                self.metrics.total_released += 1;

                log::debug!("Pool '{}' released slot {}", self.name, handle.index);
                ReleaseOutcome::Released
            }
            Membership::Available => {
                self.metrics.duplicate_releases += 1;
                ReleaseOutcome::AlreadyAvailable
            }
        }
    }

    /// Release `handle` once `delay` has passed on `scheduler`.
    ///
    /// The release is skipped if the object has been acquired again by the
    /// time it fires. Cancel it with
    /// [`cancel_deferred_release`](Pool::cancel_deferred_release).
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::{FrameScheduler, Pool, Poolable};
    /// use std::time::Duration;
    ///
    /// struct Puff(bool);
    ///
    /// impl Poolable for Puff {
    ///     fn set_active(&mut self, active: bool) { self.0 = active; }
    ///     fn is_active(&self) -> bool { self.0 }
    /// }
    ///
    /// let mut pool = Pool::with_factory(1, || Puff(false)).unwrap();
    /// let mut frames = FrameScheduler::new();
    ///
    /// let puff = pool.acquire().unwrap();
    /// pool.deferred_release(puff, Duration::from_secs(2), &mut frames);
    ///
    /// frames.advance(Duration::from_secs(1), &mut pool);
    /// assert!(pool.is_in_use(puff));
    ///
    /// frames.advance(Duration::from_secs(1), &mut pool);
    /// assert!(!pool.is_in_use(puff));
    /// ```
    pub fn deferred_release<S>(
        &self,
        handle: Handle,
        delay: Duration,
        scheduler: &mut S,
    ) -> PendingRelease
    where
        S: Schedule<Self> + ?Sized,
        T: 'static,
    {
        self.deferred_release_in(handle, delay, scheduler, Self::project_self)
    }

    /// Like [`deferred_release`](Pool::deferred_release) for a scheduler whose
    /// context is a larger host value that contains this pool.
    pub fn deferred_release_in<C, S>(
        &self,
        handle: Handle,
        delay: Duration,
        scheduler: &mut S,
        project: fn(&mut C) -> &mut Pool<T>,
    ) -> PendingRelease
    where
        C: ?Sized + 'static,
        S: Schedule<C> + ?Sized,
        T: 'static,
    {
        log::debug!(
            "Pool '{}' scheduled release of slot {} in {:?}",
            self.name,
            handle.index,
            delay
        );

        let timer = scheduler.after(
            delay,
            Box::new(move |ctx: &mut C| {
                project(ctx).release(handle);
            }),
        );

        PendingRelease { handle, timer }
    }

    /// Cancel a release scheduled with [`deferred_release`](Pool::deferred_release).
    ///
    /// Returns `false` if it already ran or was cancelled.
    pub fn cancel_deferred_release<S>(&self, pending: PendingRelease, scheduler: &mut S) -> bool
    where
        S: Schedule<Self> + ?Sized,
    {
        let cancelled = scheduler.cancel(pending.timer);
        if cancelled {
            log::debug!(
                "Pool '{}' cancelled release of slot {}",
                self.name,
                pending.handle.index
            );
        }
        cancelled
    }

    fn project_self(pool: &mut Self) -> &mut Self {
        pool
    }
}

impl<T> Pool<T> {
    fn current(&self, handle: Handle) -> Option<&Slot<T>> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.epoch == handle.epoch)
    }

    /// Borrow an in-use object
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.current(handle)
            .filter(|slot| slot.state == Membership::InUse)
            .map(|slot| &slot.value)
    }

    /// Mutably borrow an in-use object
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.epoch == handle.epoch && slot.state == Membership::InUse)
            .map(|slot| &mut slot.value)
    }

    /// Where the object behind `handle` is, or `None` for stale and foreign handles
    pub fn membership(&self, handle: Handle) -> Option<Membership> {
        self.current(handle).map(|slot| slot.state)
    }

    pub fn is_in_use(&self, handle: Handle) -> bool {
        self.membership(handle) == Some(Membership::InUse)
    }

    /// Iterate over every in-use object in slot order
    pub fn iter_in_use(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state == Membership::InUse)
            .map(|(index, slot)| {
                let handle = Handle {
                    index,
                    epoch: slot.epoch,
                };
                (handle, &slot.value)
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get available count
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Get in-use count
    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    /// Objects created so far, including growth
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Objects created at construction
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Get health status
    pub fn get_health_status(&self) -> HealthStatus {
        HealthStatus::new(
            self.available.len(),
            self.in_use.len(),
            self.slots.len(),
            self.initial_capacity,
            self.metrics.consistency_faults,
        )
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        self.metrics
            .get_metrics(self.in_use.len(), self.available.len(), self.slots.len())
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.get_metrics(), pool_name, tags)
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("capacity", &self.slots.len())
            .field("available", &self.available.len())
            .field("in_use", &self.in_use.len())
            .finish()
    }
}
