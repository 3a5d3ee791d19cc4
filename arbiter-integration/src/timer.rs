use parking_lot::Mutex;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{runtime::Handle, task::JoinHandle};

/// Scheduling context for one-shot [`Timer`]s.
///
/// Timers fire on the captured tokio runtime, never synchronously inside
/// [`Timer::start`].
#[derive(Debug, Clone)]
pub struct TimerService {
    handle: Handle,
}

impl TimerService {
    /// Capture the ambient tokio runtime as the scheduling context.
    ///
    /// Panics outside a runtime context; prefer [`TimerService::with_handle`] when wiring up
    /// before the runtime starts.
    pub fn new() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService {
    /// Create a cancellable one-shot [`Timer`] invoking `callback` when it fires.
    pub fn timer<F>(&self, callback: F) -> Timer
    where
        F: Fn() + Send + Sync + 'static,
    {
        Timer {
            handle: self.handle.clone(),
            callback: Arc::new(callback),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }
}

/// Cancellable one-shot timer.
///
/// [`Timer::start`] (re-)schedules the callback after the provided duration; [`Timer::stop`]
/// cancels a pending firing. Stopping races with firing: a stop issued after the callback has
/// begun does not re-enter it, and stopping an already-fired timer is a no-op.
pub struct Timer {
    handle: Handle,
    callback: Arc<dyn Fn() + Send + Sync>,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
    /// Schedule the callback to fire once after `duration`, superseding any pending firing.
    pub fn start(&self, duration: Duration) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let armed = Arc::clone(&self.generation);
        let callback = Arc::clone(&self.callback);

        let task = self.handle.spawn(async move {
            tokio::time::sleep(duration).await;
            // A stop or restart since arming bumps the generation and disarms this firing.
            if armed.load(Ordering::SeqCst) == generation {
                callback();
            }
        });

        if let Some(superseded) = self.task.lock().replace(task) {
            superseded.abort();
        }
    }

    /// Cancel a pending firing. A no-op once the callback has begun.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_timer_fires_once_after_duration() {
        let fired = Arc::new(AtomicUsize::new(0));
        let service = TimerService::new();

        let counter = Arc::clone(&fired);
        let timer = service.timer(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        timer.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Stopping after the firing must not re-enter.
        timer.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_cancels_pending_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let service = TimerService::new();

        let counter = Arc::clone(&fired);
        let timer = service.timer(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        timer.start(Duration::from_millis(30));
        timer.stop();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restart_supersedes_pending_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let service = TimerService::new();

        let counter = Arc::clone(&fired);
        let timer = service.timer(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        timer.start(Duration::from_millis(30));
        timer.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
