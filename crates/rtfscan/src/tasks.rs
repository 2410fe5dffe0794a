//! Deferred finalization work registered by destinations.
//!
//! Some destination work outlives the character scan (decoding an embedded
//! picture, say). Destinations hand such work to [`PendingTasks::defer`],
//! which starts it on a worker thread right away; the parser joins every
//! worker once, after the scan, and only then reports the document as parsed.
//! Tasks are never cancelled and cannot influence the scan.

use std::{
    error::Error,
    thread::{self, JoinHandle},
};

use tracing::trace;

use crate::error::ErrorKind;

/// The error a deferred task may return.
pub type TaskError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Default)]
pub struct PendingTasks {
    handles: Vec<(String, JoinHandle<Result<(), TaskError>>)>,
}

impl PendingTasks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts `work` on its own thread, to be joined when the scan completes.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::DeferredTask` if the worker thread cannot be
    /// spawned.
    pub fn defer<F>(&mut self, name: &str, work: F) -> Result<(), ErrorKind>
    where
        F: FnOnce() -> Result<(), TaskError> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(format!("rtfscan-{name}"))
            .spawn(work)
            .map_err(|e| ErrorKind::DeferredTask(format!("{name}: {e}")))?;
        trace!(task = name, "deferred task started");
        self.handles.push((name.to_string(), handle));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every task. All tasks are joined even after one fails; the
    /// first failure in registration order is reported.
    pub(crate) fn join_all(self) -> Result<(), ErrorKind> {
        let mut first_failure = None;
        for (name, handle) in self.handles {
            let outcome = match handle.join() {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => format!("{name}: {e}"),
                Err(_) => format!("{name}: panicked"),
            };
            first_failure.get_or_insert(outcome);
        }
        match first_failure {
            Some(message) => Err(ErrorKind::DeferredTask(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn joins_every_task() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut tasks = PendingTasks::new();
        for i in 0..4 {
            let done = Arc::clone(&done);
            tasks
                .defer(&format!("count-{i}"), move || {
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(tasks.len(), 4);
        tasks.join_all().unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn failure_does_not_cancel_the_rest() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut tasks = PendingTasks::new();
        tasks
            .defer("broken", || Err("bad picture".into()))
            .unwrap();
        let counter = Arc::clone(&done);
        tasks
            .defer("fine", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert_eq!(
            tasks.join_all(),
            Err(ErrorKind::DeferredTask("broken: bad picture".into()))
        );
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_task_is_reported() {
        let mut tasks = PendingTasks::new();
        tasks.defer("boom", || panic!("decoder crashed")).unwrap();
        assert_eq!(
            tasks.join_all(),
            Err(ErrorKind::DeferredTask("boom: panicked".into()))
        );
    }
}
