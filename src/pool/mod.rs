//! Adaptive free-list pool for expensive helper objects
//!
//! Instances are built on demand from a configuration value and recycled through a LIFO free
//! list. After every release the pool eagerly sheds free instances once more than half of
//! everything it has ever built is sitting idle.
//!
//! `total_created` is never decremented when instances are shed, so the shrink threshold
//! keeps growing over a long run.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A helper that a [`ResourcePool`] knows how to build
///
/// Implementations must be safe to drop at any time: the pool discards surplus instances
/// without any teardown hook.
pub trait Pooled: Sized {
    /// Immutable configuration shared by every instance the pool builds
    type Config;

    /// Builds a fresh instance
    fn construct(config: &Self::Config) -> Self;
}

#[derive(Debug)]
struct PoolState<T> {
    free: Vec<T>,
    total_created: usize,
}

/// Generic pool of [`Pooled`] instances
///
/// `acquire` and `release` never block on I/O and never fail. Each call holds the internal
/// mutex for its whole duration, so the pool can be shared across tasks and threads.
pub struct ResourcePool<T: Pooled> {
    config: T::Config,
    state: Mutex<PoolState<T>>,
}

impl<T: Pooled> ResourcePool<T> {
    /// Creates an empty pool that builds instances from `config`
    pub fn new(config: T::Config) -> Self {
        Self {
            config,
            state: Mutex::new(PoolState {
                free: Vec::new(),
                total_created: 0,
            }),
        }
    }

    /// Returns the configuration instances are built from
    pub fn config(&self) -> &T::Config {
        &self.config
    }

    /// Takes a free instance, or builds a new one if none is available
    pub fn acquire(&self) -> T {
        let mut state = self.lock();

        if let Some(instance) = state.free.pop() {
            tracing::trace!(free = state.free.len(), "Reusing pooled instance");
            return instance;
        }

        state.total_created += 1;
        tracing::trace!(total_created = state.total_created, "Building pooled instance");
        T::construct(&self.config)
    }

    /// Returns an instance to the pool, shedding surplus free instances
    ///
    /// If more than `ceil(total_created / 2)` instances are free afterwards,
    /// `floor(total_created / 2)` of them are dropped from the top of the free list.
    pub fn release(&self, instance: T) {
        let mut state = self.lock();
        state.free.push(instance);

        let total = state.total_created;
        if state.free.len() > total.div_ceil(2) {
            let keep = state.free.len().saturating_sub(total / 2);
            state.free.truncate(keep);
            tracing::trace!(
                free = state.free.len(),
                total_created = total,
                "Shrunk pool"
            );
        }
    }

    /// Number of instances ever built by this pool
    pub fn total_created(&self) -> usize {
        self.lock().total_created
    }

    /// Number of instances currently waiting in the free list
    pub fn free_count(&self) -> usize {
        self.lock().free.len()
    }

    fn lock(&self) -> MutexGuard<'_, PoolState<T>> {
        // every critical section leaves the state consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
