/*!
 * Worker pool sizing.
 *
 * The default pool has one worker per available processing unit. A configured count
 * overrides it; more workers trade filesystem contention for lower latency on
 * CPU-bound encoding.
 */

use std::num::NonZeroUsize;
use std::thread;

/// Worker pool sizing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerProfile {
    /// Processing units reported by the host
    pub host_parallelism: usize,
    /// Worker count from configuration, 0 meaning "use the host"
    pub configured_workers: usize,
}

impl WorkerProfile {
    /// Profile for the current host
    pub fn detect(configured_workers: usize) -> Self {
        let host_parallelism = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            host_parallelism,
            configured_workers,
        }
    }

    /// Worker count before clamping to a job count
    pub fn worker_count(&self) -> usize {
        if self.configured_workers > 0 {
            self.configured_workers
        } else {
            self.host_parallelism.max(1)
        }
    }

    /// Workers to spawn for `job_count` jobs; never zero, never more than the jobs
    pub fn effective_workers(&self, job_count: usize) -> usize {
        self.worker_count().min(job_count).max(1)
    }
}
