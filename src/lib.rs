//! # recycling_pool
//!
//! Single-threaded object pool for update-loop hosts such as game engines.
//! Objects are created up front, handed out on demand and returned for reuse
//! instead of being destroyed and recreated.
//!
//! ## Features
//!
//! - LIFO reuse of the most recently released object
//! - Lazy growth when the pool runs dry, never a failed acquisition
//! - Activation hooks through the [`Poolable`] trait
//! - Duplicate-safe release and epoch-checked handles
//! - Cancellable deferred release on a frame-stepped or tokio timer
//! - Metrics, Prometheus export and health status
//!
//! ## Quick Start
//!
//! ```rust
//! use recycling_pool::{Pool, Poolable};
//!
//! #[derive(Default)]
//! struct Enemy {
//!     visible: bool,
//!     hp: u32,
//! }
//!
//! impl Poolable for Enemy {
//!     fn set_active(&mut self, active: bool) { self.visible = active; }
//!     fn is_active(&self) -> bool { self.visible }
//! }
//!
//! let mut pool = Pool::with_factory(8, Enemy::default).unwrap();
//!
//! let enemy = pool.acquire_with(|e| e.hp = 100).unwrap();
//! assert_eq!(pool.get(enemy).unwrap().hp, 100);
//!
//! pool.release(enemy);
//! assert_eq!(pool.available_count(), 8);
//! ```

mod async_scheduler;
mod config;
mod errors;
mod health;
mod metrics;
mod pool;
mod poolable;
mod scheduler;

pub use async_scheduler::LocalScheduler;
pub use config::PoolConfiguration;
pub use errors::{FactoryError, PoolError, PoolResult};
pub use health::HealthStatus;
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{Handle, Membership, PendingRelease, Pool, ReleaseOutcome};
pub use poolable::Poolable;
pub use scheduler::{FrameScheduler, Schedule, Task, TimerId};
