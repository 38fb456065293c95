/*!
 * Per-job outcomes and their aggregation into a batch report.
 */

use std::path::PathBuf;

use super::dispatcher::{Completed, JobStatus};
use super::writer::WrittenFile;
use crate::errors::{RecordError, WriteError};

/// Result of running one job through the writer
#[derive(Debug)]
pub enum RecordOutcome {
    /// Blank line, nothing to do
    Blank,
    /// Line could not be parsed
    Malformed(RecordError),
    /// File written and verified
    Written(WrittenFile),
    /// Encoding or validation failed
    Failed(WriteError),
}

/// Output paths that failed during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    paths: Vec<PathBuf>,
}

impl ErrorLog {
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A line that was skipped because it did not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub sequence_index: usize,
    pub error: RecordError,
}

/// Structured summary of one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Folder the files were written to
    pub output_folder: PathBuf,
    /// Jobs dispatched, one per input line
    pub total_jobs: usize,
    /// Files written and verified
    pub written: Vec<WrittenFile>,
    /// Blank lines skipped
    pub blank_lines: usize,
    /// Lines that did not parse
    pub malformed: Vec<MalformedLine>,
    /// Paths whose encoding or validation failed
    pub failures: ErrorLog,
    /// Jobs skipped because the run was cancelled
    pub cancelled: usize,
    /// Human-readable completion message
    pub summary: String,
}

impl BatchReport {
    /// Fold job outcomes into a report
    pub fn from_outcomes(
        output_folder: PathBuf,
        outcomes: Vec<Completed<RecordOutcome>>,
    ) -> Self {
        let summary = Self::summary_message(&output_folder);
        let mut report = Self {
            output_folder,
            total_jobs: outcomes.len(),
            summary,
            ..Self::default()
        };

        for completed in outcomes {
            match completed.status {
                JobStatus::Cancelled => report.cancelled += 1,
                JobStatus::Done(RecordOutcome::Blank) => report.blank_lines += 1,
                JobStatus::Done(RecordOutcome::Malformed(error)) => {
                    report.malformed.push(MalformedLine {
                        sequence_index: completed.sequence_index,
                        error,
                    })
                }
                JobStatus::Done(RecordOutcome::Written(file)) => report.written.push(file),
                JobStatus::Done(RecordOutcome::Failed(error)) => {
                    report.failures.push(error.path().clone())
                }
            }
        }

        report
    }

    /// The message returned to callers of `generate`, independent of failures
    pub fn summary_message(output_folder: &std::path::Path) -> String {
        format!(
            "Generation finished, check folder '{}' and confirm the file count and contents",
            output_folder.display()
        )
    }

    /// Records that reached the encoder
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.failures.is_empty() || !self.malformed.is_empty() || self.cancelled > 0
    }

    /// One-line count summary for logs
    pub fn counts(&self) -> String {
        format!(
            "{} written, {} failed, {} malformed, {} blank, {} cancelled",
            self.written.len(),
            self.failures.len(),
            self.malformed.len(),
            self.blank_lines,
            self.cancelled
        )
    }
}
