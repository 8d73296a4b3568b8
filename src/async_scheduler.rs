//! Deferred execution on a tokio `LocalSet`

use crate::scheduler::{Schedule, Task, TimerId};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Runs deferred tasks as local tokio tasks against a shared context.
///
/// Each scheduled task sleeps on the tokio timer and then borrows the context
/// mutably, so callers must not hold a borrow of the context across an
/// `.await`.
///
/// # Panics
///
/// [`after`](Schedule::after) panics when called outside a
/// [`LocalSet`](tokio::task::LocalSet).
pub struct LocalScheduler<C> {
    ctx: Rc<RefCell<C>>,
    next_id: u64,
    running: Rc<RefCell<HashMap<TimerId, AbortHandle>>>,
}

impl<C: 'static> LocalScheduler<C> {
    pub fn new(ctx: Rc<RefCell<C>>) -> Self {
        Self {
            ctx,
            next_id: 0,
            running: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// The context tasks run against
    pub fn context(&self) -> &Rc<RefCell<C>> {
        &self.ctx
    }

    /// Number of tasks that have not run yet
    pub fn pending(&self) -> usize {
        self.running.borrow().len()
    }
}

impl<C: 'static> Schedule<C> for LocalScheduler<C> {
    fn after(&mut self, delay: Duration, task: Task<C>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let ctx = Rc::clone(&self.ctx);
        let running = Rc::clone(&self.running);

        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            running.borrow_mut().remove(&id);

            let mut ctx = ctx.borrow_mut();
            task(&mut *ctx);
        });

        self.running.borrow_mut().insert(id, handle.abort_handle());
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.running.borrow_mut().remove(&id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pool, Poolable};
    use tokio::task::LocalSet;

    struct Lamp {
        lit: bool,
    }

    impl Poolable for Lamp {
        fn set_active(&mut self, active: bool) {
            self.lit = active;
        }

        fn is_active(&self) -> bool {
            self.lit
        }
    }

    fn lamps(capacity: usize) -> Rc<RefCell<Pool<Lamp>>> {
        Rc::new(RefCell::new(
            Pool::with_factory(capacity, || Lamp { lit: false }).unwrap(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let local = LocalSet::new();

        local
            .run_until(async {
                let hits = Rc::new(RefCell::new(0u32));
                let mut scheduler = LocalScheduler::new(Rc::clone(&hits));

                scheduler.after(Duration::from_secs(2), Box::new(|h: &mut u32| *h += 1));
                assert_eq!(scheduler.pending(), 1);

                tokio::time::sleep(Duration::from_millis(1999)).await;
                assert_eq!(*hits.borrow(), 0);

                tokio::time::sleep(Duration::from_millis(2)).await;
                assert_eq!(*hits.borrow(), 1);
                assert_eq!(scheduler.pending(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let local = LocalSet::new();

        local
            .run_until(async {
                let hits = Rc::new(RefCell::new(0u32));
                let mut scheduler = LocalScheduler::new(Rc::clone(&hits));

                let id = scheduler.after(Duration::from_secs(1), Box::new(|h: &mut u32| *h += 1));
                assert!(scheduler.cancel(id));
                assert!(!scheduler.cancel(id));

                tokio::time::sleep(Duration::from_secs(5)).await;
                assert_eq!(*hits.borrow(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pool_release_on_tokio_timer() {
        let local = LocalSet::new();

        local
            .run_until(async {
                let pool = lamps(2);
                let mut scheduler = LocalScheduler::new(Rc::clone(&pool));

                let lamp = pool.borrow_mut().acquire().unwrap();
                pool.borrow()
                    .deferred_release(lamp, Duration::from_secs(1), &mut scheduler);

                tokio::time::sleep(Duration::from_millis(999)).await;
                assert!(pool.borrow().is_in_use(lamp));

                tokio::time::sleep(Duration::from_millis(2)).await;
                assert!(!pool.borrow().is_in_use(lamp));
                assert_eq!(pool.borrow().available_count(), 2);
                assert_eq!(pool.borrow().get_metrics().total_released, 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reacquired_slot_survives_tokio_release() {
        let local = LocalSet::new();

        local
            .run_until(async {
                let pool = lamps(1);
                let mut scheduler = LocalScheduler::new(Rc::clone(&pool));

                let first = pool.borrow_mut().acquire().unwrap();
                pool.borrow()
                    .deferred_release(first, Duration::from_secs(1), &mut scheduler);
                pool.borrow_mut().release(first);
                let second = pool.borrow_mut().acquire().unwrap();
                assert_eq!(first.index(), second.index());

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert_eq!(scheduler.pending(), 0);

                let pool = pool.borrow();
                assert!(pool.is_in_use(second));
                assert!(pool.get(second).unwrap().lit);
                assert_eq!(pool.get_metrics().stale_releases, 1);
                assert_eq!(pool.capacity(), 1);
            })
            .await;
    }
}
