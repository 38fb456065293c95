/*!
 * Job dispatch over a fixed pool of worker threads.
 *
 * Every job is pushed onto one shared queue before any worker starts, so the number of
 * outcomes to wait for is known up front. Workers race to pop jobs and send one outcome
 * per job back over a channel; the calling thread joins all workers and then checks
 * that it received exactly one outcome per job.
 */

use crossbeam::channel;
use crossbeam::queue::SegQueue;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::cancel::CancellationToken;
use crate::errors::DispatchError;

/// Unit of work: one raw input line and its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub sequence_index: usize,
    pub line: String,
}

impl Job {
    /// One job per line, blank lines included
    pub fn from_lines(lines: &[&str]) -> Vec<Job> {
        lines
            .iter()
            .enumerate()
            .map(|(sequence_index, line)| Job {
                sequence_index,
                line: (*line).to_string(),
            })
            .collect()
    }
}

/// What happened to a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus<T> {
    /// The handler ran and produced a value
    Done(T),
    /// The job was dequeued after cancellation and not run
    Cancelled,
}

/// Outcome of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed<T> {
    pub sequence_index: usize,
    pub status: JobStatus<T>,
}

/// Fans jobs out to a fixed number of worker threads
#[derive(Debug, Clone)]
pub struct Dispatcher {
    workers: usize,
}

impl Dispatcher {
    /// Dispatcher with at most `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `handler` once for every job and block until all jobs are accounted for.
    ///
    /// Results are returned ordered by `sequence_index`. `on_progress` receives
    /// `(completed, total)` after each job, from whichever worker finished it.
    pub fn run<T, F, P>(
        &self,
        jobs: Vec<Job>,
        cancel: &CancellationToken,
        handler: F,
        on_progress: P,
    ) -> Result<Vec<Completed<T>>, DispatchError>
    where
        T: Send,
        F: Fn(&Job) -> T + Sync,
        P: Fn(usize, usize) + Sync,
    {
        let expected = jobs.len();
        if expected == 0 {
            return Ok(Vec::new());
        }

        let worker_count = self.workers.min(expected);
        let queue = SegQueue::new();
        for job in jobs {
            queue.push(job);
        }

        let (outcome_tx, outcome_rx) = channel::unbounded::<Completed<T>>();
        let completed = AtomicUsize::new(0);

        debug!("Dispatching {} jobs to {} workers", expected, worker_count);

        thread::scope(|scope| -> Result<(), DispatchError> {
            let queue = &queue;
            let handler = &handler;
            let on_progress = &on_progress;
            let completed = &completed;

            let mut handles = Vec::with_capacity(worker_count);
            for worker_id in 0..worker_count {
                let outcome_tx = outcome_tx.clone();
                let handle = thread::Builder::new()
                    .name(format!("qr-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        while let Some(job) = queue.pop() {
                            let status = if cancel.is_cancelled() {
                                JobStatus::Cancelled
                            } else {
                                JobStatus::Done(handler(&job))
                            };

                            // The receiver outlives every worker
                            let _ = outcome_tx.send(Completed {
                                sequence_index: job.sequence_index,
                                status,
                            });

                            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                            on_progress(done, expected);
                        }
                    })?;
                handles.push(handle);
            }

            let mut panicked = None;
            for (worker_id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(worker_id);
                }
            }

            match panicked {
                Some(worker_id) => Err(DispatchError::WorkerPanicked(worker_id)),
                None => Ok(()),
            }
        })?;

        drop(outcome_tx);
        let mut outcomes: Vec<Completed<T>> = outcome_rx.try_iter().collect();

        if outcomes.len() != expected {
            return Err(DispatchError::Incomplete {
                expected,
                received: outcomes.len(),
            });
        }

        outcomes.sort_by_key(|outcome| outcome.sequence_index);
        Ok(outcomes)
    }
}
