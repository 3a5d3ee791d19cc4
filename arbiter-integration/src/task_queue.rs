use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};

/// Spin cycles between cooperative yields while contending for the queue lock.
const SPIN_YIELD_MASK: u32 = 0x00ff_ffff;

/// Boxed unit of work executed by the consumer.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Low-latency single-consumer work queue.
///
/// Producers append under a spin-acquired lock with bounded back-off (a cooperative yield every
/// ~16M spins). The consumer swaps the queue for a private vector, releases the lock, then runs
/// each task, yielding when no work arrived. Used to serialise observer callbacks onto one
/// logical consumer thread.
#[derive(Default)]
pub struct TaskQueue {
    queue: Mutex<Vec<Task>>,
    has_data: AtomicBool,
    running: AtomicBool,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spin until the queue lock is acquired.
    ///
    /// The consumer only holds the lock for the queue swap, never while running tasks, so
    /// producers (including producers on the consumer thread) cannot deadlock here.
    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        let mut wait_cycle = 0u32;
        loop {
            if let Some(guard) = self.queue.try_lock() {
                return guard;
            }
            wait_cycle = wait_cycle.wrapping_add(1);
            if wait_cycle & SPIN_YIELD_MASK == 0 {
                std::thread::yield_now();
            }
            std::hint::spin_loop();
        }
    }

    /// Append a task for the consumer.
    pub fn push<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.lock().push(Box::new(task));
        self.has_data.store(true, Ordering::Release);
    }

    /// Consume tasks on the calling thread until [`TaskQueue::stop`] is observed.
    pub fn run(&self) {
        self.running.store(true, Ordering::Release);
        let mut local_queue: Vec<Task> = Vec::with_capacity(200);

        while self.running.load(Ordering::Acquire) {
            while self.has_data.swap(false, Ordering::AcqRel) {
                {
                    let mut queue = self.lock();
                    std::mem::swap(&mut *queue, &mut local_queue);
                }

                for task in local_queue.drain(..) {
                    task();
                }
            }

            // Induce the context switch here so it is less likely to land mid-batch.
            if !self.has_data.load(Ordering::Acquire) {
                std::thread::yield_now();
            }
        }
    }

    /// Signal the consumer loop to exit after its current batch.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Drain and run every pending task on the calling thread.
    pub fn flush(&self) {
        let pending = {
            let mut queue = self.lock();
            self.has_data.store(false, Ordering::Release);
            std::mem::take(&mut *queue)
        };

        for task in pending {
            task();
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_data.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("has_data", &self.has_data.load(Ordering::Acquire))
            .field("running", &self.running.load(Ordering::Acquire))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn test_consumer_runs_tasks_in_push_order() {
        let queue = Arc::new(TaskQueue::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        for index in 0..8 {
            let order = Arc::clone(&order);
            queue.push(move || order.lock().push(index));
        }

        let consumer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.run())
        };

        while !queue.is_empty() {
            std::thread::yield_now();
        }
        queue.stop();
        consumer.join().unwrap();

        assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_tasks_pushed_from_consumer_thread_are_processed() {
        let queue = Arc::new(TaskQueue::new());
        let processed = Arc::new(AtomicUsize::new(0));

        {
            let reentrant_queue = Arc::clone(&queue);
            let counter = Arc::clone(&processed);
            queue.push(move || {
                let counter = Arc::clone(&counter);
                reentrant_queue.push(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            });
        }

        let consumer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || queue.run())
        };

        while processed.load(Ordering::SeqCst) == 0 {
            std::thread::yield_now();
        }
        queue.stop();
        consumer.join().unwrap();

        assert_eq!(processed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flush_drains_pending_tasks_on_caller() {
        let queue = TaskQueue::new();
        let processed = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = Arc::clone(&processed);
            queue.push(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        queue.flush();
        assert_eq!(processed.load(Ordering::SeqCst), 3);
        assert!(queue.is_empty());
    }
}
