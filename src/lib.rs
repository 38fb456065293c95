/*!
 * # qrbatch - concurrent QR code batch generator
 *
 * A Rust library for turning a list of text records into one QR code image per record.
 *
 * ## Features
 *
 * - One record per line: `payload` or `name payload`
 * - Fixed worker pool sized to the host, draining a shared job queue
 * - Per-record failures are collected, never abort the batch
 * - Configurable error-correction level, image size and worker count
 * - Cancellation between jobs, explicit busy policy for concurrent callers
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `record_parser`: Record list splitting and per-line parsing
 * - `encoder`: QR encoder trait and its implementations
 * - `generation`: Concurrent batch engine:
 *   - `generation::generator`: Request validation and run state
 *   - `generation::dispatcher`: Worker pool and job queue
 *   - `generation::writer`: File writing and validation
 *   - `generation::report`: Outcome aggregation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod encoder;
pub mod errors;
pub mod file_utils;
pub mod generation;
pub mod record_parser;

// Re-export main types for easier usage
pub use app_config::Config;
pub use encoder::{EcLevel, QrCodeEncoder, QrEncoder};
pub use errors::{AppError, DispatchError, EncodeError, GeneratorError, RecordError, WriteError};
pub use generation::{BatchGenerator, BatchReport, BatchRequest, CancellationToken};
pub use record_parser::{parse_record, split_lines, Record};
