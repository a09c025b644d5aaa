// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-Entity Named Locking
//!
//! Appends to one [`History`](crate::history::History) must be serialized
//! per entity id: version assignment reads the last version and then
//! appends, which is not atomic. This module provides the contract for a
//! named mutual-exclusion primitive keyed by entity id, and a default
//! in-process implementation.
//!
//! Distinct keys never contend; two callers acquiring the same key are
//! serialized. Acquisition accepts a timeout and reports failure instead of
//! blocking forever.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Named mutual exclusion keyed by entity id
pub trait EntityLock {
    /// Try to take the lock for `key`
    ///
    /// Non-blocking when `blocking` is false. With a timeout, waits at most
    /// that long; returns whether the lock was taken.
    fn acquire(&self, key: &str, blocking: bool, timeout: Option<Duration>) -> bool;

    /// Release the lock for `key`
    ///
    /// Releasing a key that is not held is a no-op.
    fn release(&self, key: &str);

    /// Scoped acquisition: the returned guard releases the key on drop,
    /// on every exit path including panics
    fn guard(&self, key: &str, timeout: Option<Duration>) -> Option<KeyGuard<'_, Self>>
    where
        Self: Sized,
    {
        if self.acquire(key, true, timeout) {
            Some(KeyGuard {
                lock: self,
                key: key.to_string(),
            })
        } else {
            None
        }
    }
}

/// RAII guard for a held key; releases on drop
pub struct KeyGuard<'a, L: EntityLock> {
    lock: &'a L,
    key: String,
}

impl<L: EntityLock> KeyGuard<'_, L> {
    /// The key this guard holds
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<L: EntityLock> Drop for KeyGuard<'_, L> {
    fn drop(&mut self) {
        self.lock.release(&self.key);
    }
}

/// Default in-process lock registry
///
/// Tracks the set of currently held keys behind one mutex; waiters park on
/// a condition variable and re-check their key on every release.
///
/// # Examples
///
/// ```rust
/// use bitempo::lock::{EntityLock, LockRegistry};
///
/// let registry = LockRegistry::new();
/// {
///     let _guard = registry.guard("device-42", None).unwrap();
///     // appends to the "device-42" history happen here
/// }
/// // released on drop; the key can be taken again
/// assert!(registry.acquire("device-42", false, None));
/// registry.release("device-42");
/// ```
#[derive(Default)]
pub struct LockRegistry {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl LockRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityLock for LockRegistry {
    fn acquire(&self, key: &str, blocking: bool, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut held = self.held.lock();
        loop {
            if !held.contains(key) {
                held.insert(key.to_string());
                return true;
            }
            if !blocking {
                return false;
            }
            match deadline {
                Some(deadline) => {
                    if self.released.wait_until(&mut held, deadline).timed_out()
                        && held.contains(key)
                    {
                        return false;
                    }
                }
                None => {
                    self.released.wait(&mut held);
                }
            }
        }
    }

    fn release(&self, key: &str) {
        let mut held = self.held.lock();
        if held.remove(key) {
            self.released.notify_all();
        }
    }
}
