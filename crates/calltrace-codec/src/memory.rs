use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use calltrace_types::CallRecord;

use crate::error::{CodecError, CodecResult};
use crate::format::{decode_payload, encode_payload, RECORD_HEADER_SIZE, STREAM_HEADER_SIZE};
use crate::traits::{TraceBackend, TraceSink, TraceSource};

#[derive(Default)]
struct MemoryState {
    /// Encoded payloads per trace path, in record order.
    traces: HashMap<PathBuf, Vec<Vec<u8>>>,
    unwritable: HashSet<PathBuf>,
    /// Maximum record count per sink path.
    capacity: HashMap<PathBuf, usize>,
    unflushable: HashSet<PathBuf>,
    opened: Vec<PathBuf>,
}

/// In-memory trace backend.
///
/// Intended for tests and embedding. Traces are held as encoded payloads
/// keyed by path, so every read hands out a freshly decoded record just like
/// the file backend does. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a trace at `path`, replacing any existing one.
    pub fn insert<I>(&self, path: impl Into<PathBuf>, calls: I) -> CodecResult<()>
    where
        I: IntoIterator<Item = CallRecord>,
    {
        let payloads = calls
            .into_iter()
            .map(|call| encode_payload(&call))
            .collect::<CodecResult<Vec<_>>>()?;
        self.insert_raw(path, payloads);
        Ok(())
    }

    /// Store already-encoded payloads at `path`, bypassing validation.
    pub fn insert_raw(&self, path: impl Into<PathBuf>, payloads: Vec<Vec<u8>>) {
        self.state
            .write()
            .expect("lock poisoned")
            .traces
            .insert(path.into(), payloads);
    }

    /// Decode the trace stored at `path`.
    pub fn records(&self, path: &Path) -> CodecResult<Option<Vec<CallRecord>>> {
        let state = self.state.read().expect("lock poisoned");
        state
            .traces
            .get(path)
            .map(|payloads| {
                payloads
                    .iter()
                    .map(|p| decode_payload(p))
                    .collect::<CodecResult<Vec<_>>>()
            })
            .transpose()
    }

    /// Encoded payloads stored at `path`.
    pub fn payloads(&self, path: &Path) -> Option<Vec<Vec<u8>>> {
        self.state
            .read()
            .expect("lock poisoned")
            .traces
            .get(path)
            .cloned()
    }

    /// Returns `true` if a trace exists at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.state
            .read()
            .expect("lock poisoned")
            .traces
            .contains_key(path)
    }

    /// Make `create_sink` fail for `path`.
    pub fn mark_unwritable(&self, path: impl Into<PathBuf>) {
        self.state
            .write()
            .expect("lock poisoned")
            .unwritable
            .insert(path.into());
    }

    /// Make appends to `path` fail once it holds `records` records.
    pub fn limit_records(&self, path: impl Into<PathBuf>, records: usize) {
        self.state
            .write()
            .expect("lock poisoned")
            .capacity
            .insert(path.into(), records);
    }

    /// Make `finish` fail for sinks writing to `path`.
    pub fn mark_unflushable(&self, path: impl Into<PathBuf>) {
        self.state
            .write()
            .expect("lock poisoned")
            .unflushable
            .insert(path.into());
    }

    /// Every path passed to `open_source`, successful or not, in call order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.state.read().expect("lock poisoned").opened.clone()
    }
}

impl TraceBackend for MemoryBackend {
    type Source = MemoryTraceSource;
    type Sink = MemoryTraceSink;

    fn open_source(&self, path: &Path) -> CodecResult<MemoryTraceSource> {
        let mut state = self.state.write().expect("lock poisoned");
        state.opened.push(path.to_path_buf());
        let payloads = state
            .traces
            .get(path)
            .cloned()
            .ok_or_else(|| CodecError::NotFound(path.to_path_buf()))?;
        Ok(MemoryTraceSource {
            pending: payloads.into(),
        })
    }

    fn create_sink(&self, path: &Path) -> CodecResult<MemoryTraceSink> {
        let mut state = self.state.write().expect("lock poisoned");
        if state.unwritable.contains(path) {
            return Err(CodecError::Unwritable(path.to_path_buf()));
        }
        state.traces.insert(path.to_path_buf(), Vec::new());
        Ok(MemoryTraceSink {
            path: path.to_path_buf(),
            state: Arc::clone(&self.state),
            offset: STREAM_HEADER_SIZE as u64,
        })
    }

    fn persist(&self, staged: &Path, target: &Path) -> CodecResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        let payloads = state
            .traces
            .remove(staged)
            .ok_or_else(|| CodecError::NotFound(staged.to_path_buf()))?;
        state.traces.insert(target.to_path_buf(), payloads);
        Ok(())
    }

    fn discard(&self, path: &Path) -> CodecResult<()> {
        self.state
            .write()
            .expect("lock poisoned")
            .traces
            .remove(path);
        Ok(())
    }
}

/// Source over a snapshot of an in-memory trace.
pub struct MemoryTraceSource {
    pending: VecDeque<Vec<u8>>,
}

impl TraceSource for MemoryTraceSource {
    fn next_call(&mut self) -> CodecResult<Option<CallRecord>> {
        let Some(payload) = self.pending.pop_front() else {
            return Ok(None);
        };
        match decode_payload(&payload) {
            Ok(call) => Ok(Some(call)),
            Err(e) => {
                self.pending.clear();
                Err(e)
            }
        }
    }
}

/// Sink appending to an in-memory trace.
///
/// Offsets follow the on-disk layout, as if the stream header and record
/// frames were written out.
pub struct MemoryTraceSink {
    path: PathBuf,
    state: Arc<RwLock<MemoryState>>,
    offset: u64,
}

impl TraceSink for MemoryTraceSink {
    fn append(&mut self, call: &CallRecord) -> CodecResult<u64> {
        let payload = encode_payload(call)?;
        let mut state = self.state.write().expect("lock poisoned");
        let capacity = state.capacity.get(&self.path).copied();
        let trace = state
            .traces
            .get_mut(&self.path)
            .ok_or_else(|| CodecError::NotFound(self.path.clone()))?;
        if capacity.is_some_and(|max| trace.len() >= max) {
            return Err(CodecError::Io(io::Error::other("no space left on device")));
        }
        let entry_offset = self.offset;
        self.offset += (RECORD_HEADER_SIZE + payload.len()) as u64;
        trace.push(payload);
        Ok(entry_offset)
    }

    fn finish(&mut self) -> CodecResult<()> {
        let state = self.state.read().expect("lock poisoned");
        if state.unflushable.contains(&self.path) {
            return Err(CodecError::Io(io::Error::other("disk full")));
        }
        Ok(())
    }
}
