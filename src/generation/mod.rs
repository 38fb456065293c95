/*!
 * Concurrent batch generation engine.
 *
 * - `generator`: facade that validates requests and owns the run state
 * - `dispatcher`: shared job queue drained by a fixed worker pool
 * - `writer`: encodes one record and verifies the file on disk
 * - `report`: per-job outcomes and the aggregated batch report
 * - `concurrency`: worker pool sizing
 * - `cancel`: cancellation token checked between jobs
 */

pub use self::cancel::CancellationToken;
pub use self::dispatcher::{Completed, Dispatcher, Job, JobStatus};
pub use self::generator::{BatchGenerator, BatchRequest, RunPhase};
pub use self::report::{BatchReport, ErrorLog, MalformedLine, RecordOutcome};
pub use self::writer::{RecordWriter, WrittenFile};

pub mod cancel;
pub mod concurrency;
pub mod dispatcher;
pub mod generator;
pub mod report;
pub mod writer;
