/*!
 * Batch generator facade.
 *
 * A `BatchGenerator` validates a request, makes sure the output folder exists, runs the
 * dispatcher over every input line and folds the outcomes into a `BatchReport`. One run
 * is in flight per generator at a time; what a second caller experiences is decided by
 * the configured `BusyPolicy`.
 */

use log::{error, info, warn};
use parking_lot::{Mutex, MutexGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::cancel::CancellationToken;
use super::concurrency::WorkerProfile;
use super::dispatcher::{Dispatcher, Job};
use super::report::{BatchReport, RecordOutcome};
use super::writer::RecordWriter;
use crate::app_config::{BusyPolicy, GenerationConfig};
use crate::encoder::QrEncoder;
use crate::errors::GeneratorError;
use crate::file_utils::FileManager;
use crate::record_parser::{parse_record, split_lines};

/// The three inputs of a run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    record_list: String,
    output_folder: String,
    file_extension: String,
}

impl BatchRequest {
    /// Build a request, rejecting empty fields
    pub fn new(
        record_list: impl Into<String>,
        output_folder: impl Into<String>,
        file_extension: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        let request = Self {
            record_list: record_list.into(),
            output_folder: output_folder.into(),
            file_extension: file_extension.into(),
        };

        if request.record_list.is_empty() {
            return Err(GeneratorError::InvalidInput {
                field: "record list",
            });
        }
        if request.output_folder.is_empty() {
            return Err(GeneratorError::InvalidInput {
                field: "output folder",
            });
        }
        if request.file_extension.is_empty() {
            return Err(GeneratorError::InvalidInput {
                field: "file extension",
            });
        }

        Ok(request)
    }

    pub fn record_list(&self) -> &str {
        &self.record_list
    }

    pub fn output_folder(&self) -> &str {
        &self.output_folder
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }
}

/// Where the generator is in its run cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Validating,
    Running,
}

/// Resets the phase to `Idle` however the run ends
struct PhaseGuard<'a> {
    phase: &'a Mutex<RunPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Mutex<RunPhase>, initial: RunPhase) -> Self {
        *phase.lock() = initial;
        Self { phase }
    }

    fn set(&self, next: RunPhase) {
        *self.phase.lock() = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = RunPhase::Idle;
    }
}

/// Concurrent QR batch generator
#[derive(Debug)]
pub struct BatchGenerator {
    encoder: Arc<dyn QrEncoder>,
    config: GenerationConfig,
    // Held for the whole of a run and by nothing else
    run_lock: Mutex<()>,
    phase: Mutex<RunPhase>,
    cancel: Mutex<CancellationToken>,
    runs_completed: AtomicU64,
}

impl BatchGenerator {
    /// Build a generator, rejecting a configuration no run could succeed with
    pub fn new(
        encoder: Arc<dyn QrEncoder>,
        config: GenerationConfig,
    ) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            encoder,
            config,
            run_lock: Mutex::new(()),
            phase: Mutex::new(RunPhase::Idle),
            cancel: Mutex::new(CancellationToken::new()),
            runs_completed: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        *self.phase.lock()
    }

    /// Number of runs that reached the end of the Running phase
    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::SeqCst)
    }

    /// Ask the in-flight run to stop picking up new records
    pub fn cancel(&self) {
        self.cancel.lock().cancel();
    }

    /// Generate all records and return the completion message.
    ///
    /// Per-record failures are logged, not returned; use `generate_report` to inspect them.
    pub fn generate(
        &self,
        record_list: &str,
        output_folder: &str,
        file_extension: &str,
    ) -> Result<String, GeneratorError> {
        self.generate_report(record_list, output_folder, file_extension)
            .map(|report| report.summary)
    }

    /// Generate all records and return the full report
    pub fn generate_report(
        &self,
        record_list: &str,
        output_folder: &str,
        file_extension: &str,
    ) -> Result<BatchReport, GeneratorError> {
        self.generate_with_progress(record_list, output_folder, file_extension, |_, _| {})
    }

    /// Generate all records, reporting `(completed, total)` jobs as they finish
    pub fn generate_with_progress<P>(
        &self,
        record_list: &str,
        output_folder: &str,
        file_extension: &str,
        on_progress: P,
    ) -> Result<BatchReport, GeneratorError>
    where
        P: Fn(usize, usize) + Sync,
    {
        let _run = self.acquire_run_lock()?;

        // Installed before the phase leaves Idle so an early cancel reaches this run
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        let phase = PhaseGuard::enter(&self.phase, RunPhase::Validating);

        let request = BatchRequest::new(record_list, output_folder, file_extension)?;

        phase.set(RunPhase::Running);
        let result = self.run(&request, &token, on_progress);

        if result.is_ok() {
            self.runs_completed.fetch_add(1, Ordering::SeqCst);
        }
        result
    }

    fn acquire_run_lock(&self) -> Result<MutexGuard<'_, ()>, GeneratorError> {
        match self.config.busy_policy {
            BusyPolicy::Block => Ok(self.run_lock.lock()),
            BusyPolicy::Reject => self.run_lock.try_lock().ok_or(GeneratorError::Busy),
        }
    }

    fn run<P>(
        &self,
        request: &BatchRequest,
        token: &CancellationToken,
        on_progress: P,
    ) -> Result<BatchReport, GeneratorError>
    where
        P: Fn(usize, usize) + Sync,
    {
        let start_time = Instant::now();
        let folder = PathBuf::from(request.output_folder());
        self.prepare_output_folder(&folder)?;

        let lines = split_lines(request.record_list());
        let jobs = Job::from_lines(&lines);
        let profile = WorkerProfile::detect(self.config.worker_count);
        let dispatcher = Dispatcher::new(profile.effective_workers(jobs.len()));

        info!(
            "Generating {} lines into {} with {} workers",
            jobs.len(),
            folder.display(),
            dispatcher.workers()
        );

        let writer = RecordWriter::new(
            Arc::clone(&self.encoder),
            &folder,
            request.file_extension(),
            self.config.error_correction,
            self.config.pixel_size,
        );

        let outcomes = dispatcher.run(jobs, token, |job| process_job(&writer, job), on_progress)?;
        let report = BatchReport::from_outcomes(folder, outcomes);

        if !report.failures.is_empty() {
            warn!("QR code generation failed for: {:?}", report.failures.paths());
        }
        if report.cancelled > 0 {
            warn!("Run cancelled, {} records were not generated", report.cancelled);
        }

        info!("Finished in {:?}: {}", start_time.elapsed(), report.counts());
        Ok(report)
    }

    fn prepare_output_folder(&self, folder: &Path) -> Result<(), GeneratorError> {
        match FileManager::ensure_dir(folder) {
            Ok(()) => Ok(()),
            Err(source) if self.config.strict_output_folder => Err(GeneratorError::OutputFolder {
                path: folder.to_path_buf(),
                source,
            }),
            Err(e) => {
                warn!("Could not create output folder {}: {}", folder.display(), e);
                Ok(())
            }
        }
    }
}

/// Worker body: parse the line, then write and verify its file
fn process_job(writer: &RecordWriter, job: &Job) -> RecordOutcome {
    match parse_record(&job.line) {
        Ok(None) => RecordOutcome::Blank,
        Ok(Some(record)) => match writer.write(&record) {
            Ok(file) => RecordOutcome::Written(file),
            Err(e) => {
                error!("{}", e);
                RecordOutcome::Failed(e)
            }
        },
        Err(e) => {
            warn!("Skipping line {}: {}", job.sequence_index + 1, e);
            RecordOutcome::Malformed(e)
        }
    }
}
