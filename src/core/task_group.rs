use log::trace;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counts tasks spawned through it, including tasks spawned by those tasks,
/// and lets a caller wait until none are left.
#[derive(Debug, Clone, Default)]
pub struct TaskGroup {
    inner: Arc<Inner>,
}

/// Holds one unit of outstanding work. Released on drop.
#[derive(Debug)]
pub struct TaskGuard {
    inner: Arc<Inner>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> TaskGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        TaskGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Counts the task before it is handed to the runtime so `wait` never sees
    /// a zero that a running parent is about to raise.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let guard = self.enter();
        trace!("Spawning task ({} outstanding)", self.outstanding());
        tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    pub async fn wait(&self) {
        loop {
            let idle = self.inner.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            idle.await;
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
