use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A spawned delayed task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn after<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        });
        Self { task }
    }

    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Coalesces bursts of calls per key: only the last call inside the window
/// gets through.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    next_ticket: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_ticket: AtomicU64::new(1),
            latest: Mutex::new(HashMap::new()),
        }
    }

    /// Waits out the window. Returns false when a newer call for the same
    /// key arrived in the meantime.
    pub async fn settle(&self, key: &str) -> bool {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), ticket);

        tokio::time::sleep(self.delay).await;

        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if latest.get(key) == Some(&ticket) {
            latest.remove(key);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let handle = TimerHandle::after(Duration::from_secs(5), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let handle = TimerHandle::after(Duration::from_secs(5), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_keeps_last_call() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(500)));
        let mut tasks = Vec::new();
        for i in 0..3u64 {
            let d = debouncer.clone();
            tasks.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(i * 100)).await;
                d.settle("admin").await
            }));
        }
        let mut results = Vec::new();
        for t in tasks {
            results.push(t.await.unwrap());
        }
        assert_eq!(results, vec![false, false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_keys_are_independent() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(500)));
        let a = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.settle("a").await })
        };
        let b = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.settle("b").await })
        };
        assert!(a.await.unwrap());
        assert!(b.await.unwrap());
        // Calls spaced wider than the window both go through.
        assert!(debouncer.settle("a").await);
        assert!(debouncer.settle("a").await);
    }
}
