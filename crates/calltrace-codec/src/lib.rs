//! Call-stream codec for calltrace.
//!
//! A call stream is a trace on disk: a small header followed by CRC-framed,
//! bincode-encoded [`CallRecord`](calltrace_types::CallRecord)s. See
//! [`format`] for the exact layout.
//!
//! # Architecture
//!
//! - [`TraceSource`]: pulls records one at a time until exhausted
//! - [`TraceSink`]: appends records in submission order
//! - [`TraceBackend`]: opens sources and sinks by path
//! - [`FileBackend`]: real files ([`FileTraceSource`] / [`FileTraceSink`])
//! - [`MemoryBackend`]: in-memory traces for tests and embedding

pub mod backend;
pub mod error;
pub mod format;
pub mod memory;
pub mod reader;
pub mod traits;
pub mod writer;

pub use backend::FileBackend;
pub use error::{CodecError, CodecResult};
pub use memory::{MemoryBackend, MemoryTraceSink, MemoryTraceSource};
pub use reader::FileTraceSource;
pub use traits::{TraceBackend, TraceSink, TraceSource};
pub use writer::{FileTraceSink, SinkConfig, SyncMode};
