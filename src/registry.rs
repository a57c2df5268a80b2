//! Connection registry - live count of accepted server-side connections.
//!
//! The count is advisory telemetry, not admission control: no reader blocks
//! on it and it exerts no backpressure. Each handler holds a
//! [`ConnectionGuard`] for its connection's lifetime, so the exactly-once
//! increment/decrement contract holds on every exit path.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Shared counter of currently active inbound connections.
///
/// Cheaply cloneable; clones observe the same count. Instantiate one per
/// listener (or per test) rather than relying on process-global state.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    live: Arc<AtomicI64>,
}

impl ConnectionRegistry {
    /// Create a new registry with a count of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of live connections.
    ///
    /// Eventually consistent with respect to concurrently running handlers.
    pub fn count(&self) -> i64 {
        self.live.load(Ordering::Acquire)
    }

    /// Record one accepted connection.
    pub fn increment(&self) {
        self.live.fetch_add(1, Ordering::AcqRel);
    }

    /// Record one closed connection.
    pub fn decrement(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    /// Take a guard that increments now and decrements on drop.
    pub fn guard(&self) -> ConnectionGuard {
        self.increment();
        ConnectionGuard {
            live: self.live.clone(),
        }
    }
}

/// RAII guard pairing one increment with exactly one decrement.
#[derive(Debug)]
pub struct ConnectionGuard {
    live: Arc<AtomicI64>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_increment_decrement() {
        let registry = ConnectionRegistry::new();
        registry.increment();
        registry.increment();
        assert_eq!(registry.count(), 2);
        registry.decrement();
        assert_eq!(registry.count(), 1);
        registry.decrement();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_clones_share_count() {
        let registry = ConnectionRegistry::new();
        let clone = registry.clone();

        registry.increment();
        assert_eq!(clone.count(), 1);
        clone.decrement();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_guard_decrements_on_drop() {
        let registry = ConnectionRegistry::new();
        {
            let _guard = registry.guard();
            assert_eq!(registry.count(), 1);
        }
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_independent_registries() {
        let a = ConnectionRegistry::new();
        let b = ConnectionRegistry::new();
        a.increment();
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn test_concurrent_churn_returns_to_zero() {
        let registry = ConnectionRegistry::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let _guard = registry.guard();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.count(), 0);
    }
}
