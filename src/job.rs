//! Poll-based background job execution.
//!
//! A job is a description string plus a function run once on a dedicated
//! worker thread. The worker reports `Result<T, JobError>` over a bounded
//! channel; the polling thread drives the state machine with [`AsyncJob::poll`]
//! each tick. A worker that dies without reporting (a panic) surfaces as
//! `Failed(WorkerLost)` rather than silent thread death. Cancellation is
//! cooperative: the work receives a [`CancelFlag`] and is expected to check
//! it at convenient boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use crate::error::JobError;

/// Cooperative cancellation flag shared between the polling thread and the
/// worker. Cloning shares the flag.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation. Best-effort: the work decides when to observe it.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }
}

/// Lifecycle of a background job as seen by the polling thread.
///
/// `Idle → Running → {Completed, Failed}`. Terminal states are final; a
/// fresh job instance is required to run the work again.
#[derive(Debug, Default)]
pub enum JobStatus {
  #[default]
  Idle,
  Running,
  Completed,
  Failed(JobError),
}

impl JobStatus {
  pub fn is_terminal(&self) -> bool {
    matches!(self, JobStatus::Completed | JobStatus::Failed(_))
  }
}

type Work<T> = Box<dyn FnOnce(CancelFlag) -> Result<T, JobError> + Send>;
type FinishedHook<T> = Box<dyn FnOnce(&T)>;

/// A unit of background work with poll-based completion.
pub struct AsyncJob<T> {
  description: String,
  work: Option<Work<T>>,
  cancel: CancelFlag,
  rx: Option<Receiver<Result<T, JobError>>>,
  status: JobStatus,
  result: Option<T>,
  on_finished: Option<FinishedHook<T>>,
}

impl<T: Send + 'static> AsyncJob<T> {
  pub fn new<F>(description: impl Into<String>, work: F) -> Self
  where
    F: FnOnce(CancelFlag) -> Result<T, JobError> + Send + 'static,
  {
    Self {
      description: description.into(),
      work: Some(Box::new(work)),
      cancel: CancelFlag::new(),
      rx: None,
      status: JobStatus::Idle,
      result: None,
      on_finished: None,
    }
  }

  /// Attach a hook fired at most once, on the polling thread, the first
  /// time [`poll`](Self::poll) observes completion.
  pub fn with_on_finished(mut self, hook: impl FnOnce(&T) + 'static) -> Self {
    self.on_finished = Some(Box::new(hook));
    self
  }

  /// Short human-readable label for progress reporting.
  pub fn description(&self) -> &str {
    &self.description
  }

  /// Spawn the worker thread. Returns `false` if the job was already
  /// started; each instance runs its work exactly once.
  pub fn start(&mut self) -> bool {
    let Some(work) = self.work.take() else {
      return false;
    };

    let (tx, rx) = bounded(1);
    let cancel = self.cancel.clone();
    thread::spawn(move || {
      // Send fails only if the job was dropped; nothing to report then.
      let _ = tx.send(work(cancel));
    });

    self.rx = Some(rx);
    self.status = JobStatus::Running;
    true
  }

  /// Request cooperative cancellation of a running job.
  pub fn abort(&self) {
    self.cancel.cancel();
  }

  /// Non-blocking status check; drives the state machine. Safe to call
  /// repeatedly from the single polling thread.
  pub fn poll(&mut self) -> &JobStatus {
    if matches!(self.status, JobStatus::Running) {
      let outcome = match &self.rx {
        Some(rx) => match rx.try_recv() {
          Ok(res) => Some(res),
          Err(TryRecvError::Empty) => None,
          Err(TryRecvError::Disconnected) => Some(Err(JobError::WorkerLost)),
        },
        None => None,
      };

      if let Some(res) = outcome {
        match res {
          Ok(value) => {
            if let Some(hook) = self.on_finished.take() {
              hook(&value);
            }
            self.result = Some(value);
            self.status = JobStatus::Completed;
          }
          Err(err) => self.status = JobStatus::Failed(err),
        }
      }
    }
    &self.status
  }

  /// True once the work has completed successfully.
  pub fn is_completed(&mut self) -> bool {
    matches!(self.poll(), JobStatus::Completed)
  }

  /// Last observed status without re-polling the channel.
  pub fn status(&self) -> &JobStatus {
    &self.status
  }

  /// The result, available once the status is `Completed`.
  pub fn result(&self) -> Option<&T> {
    self.result.as_ref()
  }

  pub fn take_result(&mut self) -> Option<T> {
    self.result.take()
  }
}

// =============================================================================
// Tests
// =============================================================================
