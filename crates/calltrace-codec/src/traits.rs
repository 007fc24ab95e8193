use std::path::Path;

use calltrace_types::CallRecord;

use crate::error::CodecResult;

/// Read side of a call stream.
///
/// Implementations must satisfy these invariants:
/// - Records are returned in exactly the order they were recorded.
/// - Each returned record is owned by the caller; the source keeps no
///   reference to it.
/// - Once `Ok(None)` or an `Err` has been returned the source is exhausted,
///   and every later call returns `Ok(None)`.
/// - Dropping the source releases its underlying handle.
pub trait TraceSource {
    /// Pull the next record, or `Ok(None)` at end of stream.
    fn next_call(&mut self) -> CodecResult<Option<CallRecord>>;
}

/// Write side of a call stream.
///
/// Implementations must satisfy these invariants:
/// - Append-only; records persist in the order they are submitted.
/// - `append` borrows the record and serializes its content; it never keeps
///   the record itself.
/// - A successful `append` leaves the stream valid for the next one.
pub trait TraceSink {
    /// Append one record. Returns the byte offset it was written at.
    fn append(&mut self, call: &CallRecord) -> CodecResult<u64>;

    /// Flush everything appended so far. Idempotent.
    fn finish(&mut self) -> CodecResult<()>;
}

/// Opens sources and sinks by path.
///
/// The merge engine is generic over this trait so it can run against the
/// real filesystem or against in-memory traces.
pub trait TraceBackend {
    /// Source type produced by [`open_source`](Self::open_source).
    type Source: TraceSource;
    /// Sink type produced by [`create_sink`](Self::create_sink).
    type Sink: TraceSink;

    /// Open an existing trace for reading.
    ///
    /// Fails if the path cannot be read or is not a well-formed call stream.
    fn open_source(&self, path: &Path) -> CodecResult<Self::Source>;

    /// Create (or truncate) a trace for writing.
    fn create_sink(&self, path: &Path) -> CodecResult<Self::Sink>;

    /// Atomically move a finished trace from `staged` onto `target`.
    fn persist(&self, staged: &Path, target: &Path) -> CodecResult<()>;

    /// Remove a trace. Removing a trace that does not exist is not an error.
    fn discard(&self, path: &Path) -> CodecResult<()>;
}
