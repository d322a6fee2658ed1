//! Per-session concurrency control.
//!
//! Ensures only one turn runs per session at a time, so the
//! read-extract-classify-complete-append-increment sequence is atomic
//! per key. Turns on different session keys proceed fully in parallel.
//! The permit is held for the whole turn, including the outbound
//! completion call.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Manages per-session turn locks.
///
/// Each session key maps to a `Semaphore(1)`. Acquiring the permit
/// grants exclusive access for one turn; it auto-releases on drop.
pub struct SessionLockMap {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionLockMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the turn lock for a session, waiting if a turn is
    /// already in flight. Hold the permit for the duration of the turn.
    pub async fn acquire(&self, session_key: &str) -> OwnedSemaphorePermit {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_key.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        // The semaphore is never closed, so acquisition cannot fail.
        sem.acquire_owned()
            .await
            .expect("session semaphore closed")
    }

    /// Number of tracked sessions (for monitoring).
    pub fn session_count(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequential_access() {
        let map = SessionLockMap::new();

        let permit1 = map.acquire("s1").await;
        drop(permit1);

        let permit2 = map.acquire("s1").await;
        drop(permit2);
    }

    #[tokio::test]
    async fn different_sessions_concurrent() {
        let map = Arc::new(SessionLockMap::new());

        let p1 = map.acquire("s1").await;
        let p2 = map.acquire("s2").await;

        // Both acquired simultaneously.
        assert_eq!(map.session_count(), 2);

        drop(p1);
        drop(p2);
    }

    #[tokio::test]
    async fn same_session_waits() {
        let map = Arc::new(SessionLockMap::new());
        let map2 = map.clone();

        let p1 = map.acquire("s1").await;

        // Spawn a task that waits for the lock.
        let handle = tokio::spawn(async move {
            let _p2 = map2.acquire("s1").await;
            42
        });

        // Give the waiter a moment to queue.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // Release the first permit.
        drop(p1);

        // The waiter should now proceed.
        let result = handle.await.unwrap();
        assert_eq!(result, 42);
    }
}
