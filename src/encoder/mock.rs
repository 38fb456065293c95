/*!
 * Mock encoder implementations for testing.
 *
 * The mock records every attempt so tests can assert exactly-once processing:
 * - `MockEncoder::working()` - writes a small non-empty file
 * - `MockEncoder::failing()` - always returns an error
 * - `MockEncoder::empty_file()` - writes an empty file, which fails validation
 */

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{EcLevel, QrEncoder};
use crate::errors::EncodeError;

/// Behavior mode for the mock encoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always writes a file
    Working,
    /// Fails every Nth attempt (1-based)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Reports success but leaves an empty file behind
    EmptyFile,
    /// Writes a file after sleeping
    Slow { delay_ms: u64 },
}

/// One recorded encode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeAttempt {
    pub payload: String,
    pub destination: PathBuf,
}

/// Mock encoder that counts and records attempts
#[derive(Debug)]
pub struct MockEncoder {
    behavior: MockBehavior,
    attempt_count: AtomicUsize,
    attempts: Mutex<Vec<EncodeAttempt>>,
}

impl MockEncoder {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            attempt_count: AtomicUsize::new(0),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn empty_file() -> Self {
        Self::new(MockBehavior::EmptyFile)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of `encode_to_file` calls so far
    pub fn attempt_count(&self) -> usize {
        self.attempt_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the recorded attempts, in call order
    pub fn attempts(&self) -> Vec<EncodeAttempt> {
        self.attempts.lock().clone()
    }

    fn write_file(payload: &str, destination: &Path) -> Result<(), EncodeError> {
        std::fs::write(destination, format!("MOCK-QR:{}", payload))?;
        Ok(())
    }
}

impl QrEncoder for MockEncoder {
    fn encode_to_file(
        &self,
        payload: &str,
        _level: EcLevel,
        _pixel_size: u32,
        destination: &Path,
    ) -> Result<(), EncodeError> {
        let attempt = self.attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.attempts.lock().push(EncodeAttempt {
            payload: payload.to_string(),
            destination: destination.to_path_buf(),
        });

        match self.behavior {
            MockBehavior::Working => Self::write_file(payload, destination),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && attempt % fail_every == 0 {
                    Err(EncodeError::Symbol(format!("simulated failure #{}", attempt)))
                } else {
                    Self::write_file(payload, destination)
                }
            }
            MockBehavior::Failing => Err(EncodeError::Symbol("simulated failure".to_string())),
            MockBehavior::EmptyFile => {
                std::fs::write(destination, b"")?;
                Ok(())
            }
            MockBehavior::Slow { delay_ms } => {
                std::thread::sleep(Duration::from_millis(delay_ms));
                Self::write_file(payload, destination)
            }
        }
    }
}
