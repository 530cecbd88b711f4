use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::scheduler::generation::{CancelToken, GenerationCounter};

/// A finished job's output tagged with the generation that requested it.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed<T> {
    pub generation: u64,
    pub value: T,
}

/// Runs recomputations on background threads and delivers only the result
/// of the most recent request.
///
/// Every [`submit`](Self::submit) starts a new generation and cancels the
/// previous ones. Jobs poll their [`CancelToken`] and give up early by
/// returning `None`; results from superseded generations are dropped both
/// by the worker and again on receipt, so a consumer never sees one.
pub struct ComputeScheduler<T> {
    name: String,
    counter: GenerationCounter,
    sender: Sender<Computed<T>>,
    receiver: Receiver<Computed<T>>,
}

impl<T: Send + 'static> ComputeScheduler<T> {
    pub fn new(name: impl Into<String>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            name: name.into(),
            counter: GenerationCounter::new(),
            sender,
            receiver,
        }
    }

    /// Starts `job` on its own thread and returns its generation.
    pub fn submit<F>(&self, job: F) -> Result<u64>
    where
        F: FnOnce(&CancelToken) -> Option<T> + Send + 'static,
    {
        let token = self.counter.advance();
        let generation = token.generation();
        let sender = self.sender.clone();
        let name = self.name.clone();

        thread::Builder::new()
            .name(format!("{}-{}", self.name, generation))
            .spawn(move || {
                let _span = debug_span!("compute", job = %name, generation).entered();
                match job(&token) {
                    Some(value) if !token.is_cancelled() => {
                        if sender.send(Computed { generation, value }).is_err() {
                            debug!("Scheduler dropped before result delivery");
                        }
                    }
                    _ => debug!("Discarding superseded result"),
                }
            })?;

        debug!(job = %self.name, generation, "Submitted");
        Ok(generation)
    }

    /// Supersedes every outstanding request without starting a new one.
    pub fn cancel(&self) {
        self.counter.advance();
    }

    pub fn latest_generation(&self) -> u64 {
        self.counter.current()
    }

    /// Non-blocking: the current generation's result if it has arrived.
    pub fn try_latest(&self) -> Option<Computed<T>> {
        let mut latest = None;
        while let Ok(result) = self.receiver.try_recv() {
            if self.counter.is_current(result.generation) {
                latest = Some(result);
            }
        }
        latest
    }

    /// Blocks up to `timeout` for the current generation's result.
    pub fn wait_latest(&self, timeout: Duration) -> Option<Computed<T>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.receiver.recv_timeout(remaining) {
                Ok(result) if self.counter.is_current(result.generation) => return Some(result),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}
