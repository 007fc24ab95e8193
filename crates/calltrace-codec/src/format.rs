//! On-disk call-stream format.
//!
//! ```text
//! [4 bytes: magic "CTRC"]
//! [4 bytes: format version (little-endian u32)]
//! repeated:
//!   [4 bytes: payload length (little-endian u32)]
//!   [4 bytes: CRC32 of payload (little-endian u32)]
//!   [N bytes: payload (bincode-serialized CallRecord)]
//! ```
//!
//! Encoding is deterministic: the same record always produces the same bytes.

use calltrace_types::CallRecord;

use crate::error::{CodecError, CodecResult};

/// Stream magic.
pub const TRACE_MAGIC: [u8; 4] = *b"CTRC";

/// Current format version.
pub const TRACE_VERSION: u32 = 1;

/// Stream header size: magic + version.
pub const STREAM_HEADER_SIZE: usize = 8;

/// Record header size: length + CRC.
pub const RECORD_HEADER_SIZE: usize = 8;

/// Largest payload accepted by readers (64 MiB).
pub const MAX_RECORD_LEN: u32 = 64 * 1024 * 1024;

/// Encode the stream header.
pub fn encode_stream_header() -> [u8; STREAM_HEADER_SIZE] {
    let mut header = [0u8; STREAM_HEADER_SIZE];
    header[0..4].copy_from_slice(&TRACE_MAGIC);
    header[4..8].copy_from_slice(&TRACE_VERSION.to_le_bytes());
    header
}

/// Validate a stream header and return its version.
pub fn decode_stream_header(header: &[u8; STREAM_HEADER_SIZE]) -> CodecResult<u32> {
    if header[0..4] != TRACE_MAGIC {
        return Err(CodecError::InvalidMagic {
            expected: String::from_utf8_lossy(&TRACE_MAGIC).into(),
            actual: String::from_utf8_lossy(&header[0..4]).into(),
        });
    }
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != TRACE_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    Ok(version)
}

/// Serialize a record's payload (no framing).
pub fn encode_payload(call: &CallRecord) -> CodecResult<Vec<u8>> {
    bincode::serialize(call).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Deserialize a record's payload (no framing).
pub fn decode_payload(payload: &[u8]) -> CodecResult<CallRecord> {
    bincode::deserialize(payload).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Build a record header for `payload`, which will be written at `offset`.
pub fn encode_record_header(payload: &[u8], offset: u64) -> CodecResult<[u8; RECORD_HEADER_SIZE]> {
    let length = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    if length == 0 || length > MAX_RECORD_LEN {
        return Err(CodecError::InvalidRecordLength { offset, length });
    }
    let crc = crc32fast::hash(payload);

    let mut header = [0u8; RECORD_HEADER_SIZE];
    header[0..4].copy_from_slice(&length.to_le_bytes());
    header[4..8].copy_from_slice(&crc.to_le_bytes());
    Ok(header)
}

/// Split a record header into `(length, crc)`, rejecting impossible lengths.
pub fn decode_record_header(
    header: &[u8; RECORD_HEADER_SIZE],
    offset: u64,
) -> CodecResult<(u32, u32)> {
    let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if length == 0 || length > MAX_RECORD_LEN {
        return Err(CodecError::InvalidRecordLength { offset, length });
    }
    Ok((length, crc))
}

/// Verify a payload against the CRC from its header.
pub fn verify_payload(payload: &[u8], expected: u32, offset: u64) -> CodecResult<()> {
    let actual = crc32fast::hash(payload);
    if actual != expected {
        return Err(CodecError::CrcMismatch {
            offset,
            expected,
            actual,
        });
    }
    Ok(())
}
