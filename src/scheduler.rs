// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred and periodic execution of blocking work.

use core::fmt;
use std::{sync::Arc, time::Duration};

/// Work that runs once.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Work that runs repeatedly.
pub type RepeatingTask = Arc<dyn Fn() + Send + Sync + 'static>;

/// Runs bus work off the caller's context.
///
/// Task bodies may block on I/O, implementations must run them where this
/// doesn't stall unrelated work.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;

    /// Run `task` after `initial_delay` and then again `delay` after each
    /// run has finished.
    fn schedule_with_fixed_delay(
        &self,
        initial_delay: Duration,
        delay: Duration,
        task: RepeatingTask,
    ) -> TaskHandle;
}

/// Cancels a scheduled task.
///
/// Cancelling prevents future runs. A run that is already in progress
/// finishes normally. Dropping the handle does not cancel the task.
#[must_use]
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle for a task that can't be cancelled.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(feature = "tokio")]
pub use self::tokio_impl::TokioScheduler;

#[cfg(feature = "tokio")]
mod tokio_impl {
    use tokio::{runtime::Handle, task, time};

    use super::*;

    /// [`Scheduler`] on a tokio runtime.
    ///
    /// Timers run on the runtime, task bodies on its blocking thread pool.
    #[derive(Debug, Clone)]
    pub struct TokioScheduler {
        handle: Handle,
    }

    impl TokioScheduler {
        #[must_use]
        pub fn new(handle: Handle) -> Self {
            Self { handle }
        }

        /// Use the runtime of the calling context.
        pub fn try_current() -> Result<Self, tokio::runtime::TryCurrentError> {
            Handle::try_current().map(Self::new)
        }
    }

    impl Scheduler for TokioScheduler {
        fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
            let job = self.handle.spawn(async move {
                if !delay.is_zero() {
                    time::sleep(delay).await;
                }
                if let Err(err) = task::spawn_blocking(task).await {
                    log::warn!("Scheduled task failed: {err}");
                }
            });
            TaskHandle::new(move || job.abort())
        }

        fn schedule_with_fixed_delay(
            &self,
            initial_delay: Duration,
            delay: Duration,
            task: RepeatingTask,
        ) -> TaskHandle {
            let job = self.handle.spawn(async move {
                time::sleep(initial_delay).await;
                loop {
                    let task = Arc::clone(&task);
                    // Aborting while waiting here lets the blocking run finish.
                    if let Err(err) = task::spawn_blocking(move || task()).await {
                        log::warn!("Periodic task failed: {err}");
                    }
                    time::sleep(delay).await;
                }
            });
            TaskHandle::new(move || job.abort())
        }
    }

}

#[cfg(test)]
pub(crate) use self::manual::ManualScheduler;
