//! Active-run tracking.
//!
//! At most one run may be in flight per project id. `start_run` registers the
//! id here before spawning; the spawned task releases it on completion.

use std::collections::HashSet;

use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct RunTracker {
    active: Mutex<HashSet<String>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a run for `id`. Returns false when one is already active.
    pub async fn try_begin(&self, id: &str) -> bool {
        self.active.lock().await.insert(id.to_string())
    }

    /// Release the id after its run reaches a terminal state.
    pub async fn finish(&self, id: &str) {
        self.active.lock().await.remove(id);
    }

    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_begin_is_rejected() {
        let tracker = RunTracker::new();
        assert!(tracker.try_begin("p1").await);
        assert!(!tracker.try_begin("p1").await);
        assert_eq!(tracker.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_finish_releases_the_id() {
        let tracker = RunTracker::new();
        assert!(tracker.try_begin("p1").await);
        tracker.finish("p1").await;
        assert!(tracker.try_begin("p1").await);
    }

    #[tokio::test]
    async fn test_ids_are_independent() {
        let tracker = RunTracker::new();
        assert!(tracker.try_begin("p1").await);
        assert!(tracker.try_begin("p2").await);
        assert_eq!(tracker.active_count().await, 2);
    }
}
