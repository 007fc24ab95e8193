use serde::{Deserialize, Serialize};

use crate::flags::CallFlags;

/// One intercepted call as recorded in a trace.
///
/// The payload (method identity and arguments) is opaque here; only the
/// flags are interpreted, and only by observers such as frame counters.
///
/// `CallRecord` is intentionally not `Clone`. A record is produced by a
/// source, owned by whoever pulled it, lent to a sink for serialization, and
/// dropped exactly once.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Thread the call was made on.
    pub thread_id: u32,
    /// Call flags, forwarded verbatim.
    pub flags: CallFlags,
    /// Encoded method identity and arguments.
    pub payload: Vec<u8>,
}

impl CallRecord {
    /// Create a new record.
    pub fn new(thread_id: u32, flags: CallFlags, payload: Vec<u8>) -> Self {
        Self {
            thread_id,
            flags,
            payload,
        }
    }

    /// Returns `true` if this call concludes a frame.
    pub fn is_end_frame(&self) -> bool {
        self.flags.contains(CallFlags::END_FRAME)
    }
}
