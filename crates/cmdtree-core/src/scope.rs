//! Supervising scope for asynchronous handlers
//!
//! Every async handler body is submitted as its own task. A failing or
//! panicking task never cancels its siblings; only [`HandlerScope::shutdown`]
//! cancels the whole group. Tasks stay in the group until they finish, so
//! waiting on the scope never takes them out of reach of a shutdown.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinSet};

use crate::errors::{ExError, ExErrorKind, Result};

/// Cancelable task group shared by a registry
#[derive(Clone)]
pub struct HandlerScope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    handle: Handle,
    tasks: Mutex<JoinSet<()>>,
    closed: AtomicBool,
    running: Arc<Running>,
}

/// Count of tasks whose body has not been dropped yet
#[derive(Default)]
struct Running {
    count: AtomicUsize,
    idle: Notify,
}

/// Held by a task body; released when the body completes, panics or is aborted
struct RunningGuard(Arc<Running>);

impl RunningGuard {
    fn acquire(running: &Arc<Running>) -> Self {
        running.count.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(running))
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl HandlerScope {
    /// Scope spawning onto the given runtime
    pub fn new(handle: Handle) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                handle,
                tasks: Mutex::new(JoinSet::new()),
                closed: AtomicBool::new(false),
                running: Arc::new(Running::default()),
            }),
        }
    }

    /// Scope spawning onto the current runtime
    ///
    /// # Errors
    ///
    /// Returns `Internal` when called outside a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current().map(Self::new).map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("scope_current")
                .with_message(e.to_string())
        })
    }

    /// Submit a task
    ///
    /// Finished tasks are reaped on every submission.
    ///
    /// # Errors
    ///
    /// Returns `ScopeClosed` after [`shutdown`](Self::shutdown).
    pub fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_closed() {
            return Err(closed_error());
        }
        let mut tasks = self.lock()?;
        reap(&mut tasks);
        let guard = RunningGuard::acquire(&self.inner.running);
        tasks.spawn_on(
            async move {
                let _guard = guard;
                task.await;
            },
            &self.inner.handle,
        );
        Ok(())
    }

    /// Number of tasks not yet finished
    pub fn in_flight(&self) -> usize {
        self.inner.running.count.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Refuse new tasks and abort every in-flight one
    pub fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::Release);
        if let Ok(mut tasks) = self.lock() {
            tasks.abort_all();
        }
        tracing::debug!(component = module_path!(), "handler scope shut down");
    }

    /// Wait until every submitted task has finished
    ///
    /// Tasks submitted while draining are waited for as well. Dropping the
    /// returned future stops waiting but leaves the tasks running.
    pub async fn drain(&self) {
        let running = &self.inner.running;
        loop {
            let notified = running.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if running.count.load(Ordering::Acquire) == 0 {
                break;
            }
            notified.await;
        }
        if let Ok(mut tasks) = self.lock() {
            reap(&mut tasks);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, JoinSet<()>>> {
        self.inner.tasks.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("scope_lock")
                .with_message("handler scope lock poisoned")
        })
    }
}

impl std::fmt::Debug for HandlerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerScope")
            .field("closed", &self.is_closed())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

fn reap(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.try_join_next() {
        if let Err(err) = result {
            log_join_error(&err);
        }
    }
}

fn log_join_error(err: &JoinError) {
    if err.is_panic() {
        tracing::error!(component = module_path!(), error = %err, "scoped task panicked");
    } else if err.is_cancelled() {
        tracing::debug!(component = module_path!(), "scoped task cancelled");
    }
}

fn closed_error() -> ExError {
    ExError::new(ExErrorKind::ScopeClosed)
        .with_op("scope_spawn")
        .with_message("handler scope is shut down")
}
