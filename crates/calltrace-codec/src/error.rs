use std::io;
use std::path::PathBuf;

/// Errors produced while reading or writing a call stream.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream does not start with the call-stream magic.
    #[error("invalid trace magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    /// The stream was written by an unknown format version.
    #[error("unsupported trace version: {0}")]
    UnsupportedVersion(u32),

    /// The stream ends in the middle of a header or record.
    #[error("truncated trace at offset {offset}")]
    Truncated { offset: u64 },

    /// A record's payload does not match its checksum.
    #[error("CRC mismatch at offset {offset}: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        offset: u64,
        expected: u32,
        actual: u32,
    },

    /// A record header carries a length of zero or beyond the format limit.
    #[error("invalid record length {length} at offset {offset}")]
    InvalidRecordLength { offset: u64, length: u32 },

    /// Record payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No trace exists at the given path.
    #[error("trace not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The given path cannot be written.
    #[error("trace path is not writable: {}", .0.display())]
    Unwritable(PathBuf),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
