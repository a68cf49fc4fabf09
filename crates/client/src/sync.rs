//! Lock helpers shared by the containers.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// Container mutations never panic while holding a lock, so a poisoned lock
// carries no torn state; recover the guard instead of propagating.

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
