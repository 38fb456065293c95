/*!
 * Error types for the qrbatch application.
 *
 * This module contains custom error types for the different stages of a batch run,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing a single record line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line did not split into one or two tokens
    #[error("Malformed record '{line}': expected 1 or 2 tokens, found {tokens}")]
    Malformed {
        /// The trimmed line that failed to parse
        line: String,
        /// Number of tokens the line split into
        tokens: usize,
    },
}

/// Errors reported by a QR encoder
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The payload could not be turned into a QR symbol
    #[error("QR encode error: {0}")]
    Symbol(String),

    /// The symbol could not be rendered or written as an image
    #[error("Image error: {0}")]
    Image(String),

    /// Underlying I/O failure while writing the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-record failures of the file writer. These never abort a batch.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The encoder refused the payload or failed to write the file
    #[error("Failed to generate QR code {path:?}: {source}")]
    Encode {
        /// Destination that was being written
        path: PathBuf,
        /// Error returned by the encoder
        #[source]
        source: EncodeError,
    },

    /// The file was written but could not be verified afterwards
    #[error("Failed to validate {path:?}: {reason}")]
    Validation {
        /// Destination that failed validation
        path: PathBuf,
        /// Why validation failed
        reason: String,
    },
}

impl WriteError {
    /// Destination path the failure refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Encode { path, .. } | Self::Validation { path, .. } => path,
        }
    }
}

/// Errors raised by the job dispatcher itself, as opposed to individual jobs
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A worker thread could not be started
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker thread panicked while processing jobs
    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),

    /// The number of outcomes does not match the number of enqueued jobs
    #[error("Dispatch incomplete: expected {expected} outcomes, received {received}")]
    Incomplete {
        /// Jobs enqueued
        expected: usize,
        /// Outcomes collected
        received: usize,
    },
}

/// Errors returned from a `generate` call
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// One of the required request fields is empty
    #[error("Invalid input: {field} is empty")]
    InvalidInput {
        /// Name of the empty field
        field: &'static str,
    },

    /// The generation settings are out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which setting is wrong and why
        reason: String,
    },

    /// Another run is in flight and the generator rejects concurrent calls
    #[error("Generator is busy with another batch")]
    Busy,

    /// The output folder could not be created
    #[error("Failed to create output folder {path:?}: {source}")]
    OutputFolder {
        /// Folder that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The dispatcher failed to account for every job
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the generator
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Configuration problem
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
