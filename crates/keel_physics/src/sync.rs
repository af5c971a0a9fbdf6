//! Shared-world locking for multi-threaded hosts

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::world::PhysicsWorld;

/// Cloneable handle to a world behind a single exclusive lock.
///
/// The simulation itself is single-threaded; the concurrency contract is
/// that no mutation overlaps an in-flight `update`. One mutex around the
/// whole world is exactly that contract, and all a multi-threaded host
/// needs.
#[derive(Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<PhysicsWorld>>,
}

impl SharedWorld {
    /// Wrap a world for shared access
    pub fn new(world: PhysicsWorld) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Lock the world for any sequence of reads or mutations
    pub fn lock(&self) -> MutexGuard<'_, PhysicsWorld> {
        self.inner.lock()
    }

    /// Run one simulation step under the lock
    pub fn step(&self, dt: f64) {
        self.lock().update(dt);
    }
}

impl Default for SharedWorld {
    fn default() -> Self {
        Self::new(PhysicsWorld::default())
    }
}
