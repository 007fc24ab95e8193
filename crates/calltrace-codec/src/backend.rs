use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::CodecResult;
use crate::reader::FileTraceSource;
use crate::traits::TraceBackend;
use crate::writer::{FileTraceSink, SinkConfig};

/// Filesystem-backed traces.
#[derive(Clone, Debug, Default)]
pub struct FileBackend {
    sink_config: SinkConfig,
}

impl FileBackend {
    /// Create a backend whose sinks use `sink_config`.
    pub fn new(sink_config: SinkConfig) -> Self {
        Self { sink_config }
    }
}

impl TraceBackend for FileBackend {
    type Source = FileTraceSource;
    type Sink = FileTraceSink;

    fn open_source(&self, path: &Path) -> CodecResult<FileTraceSource> {
        FileTraceSource::open(path)
    }

    fn create_sink(&self, path: &Path) -> CodecResult<FileTraceSink> {
        FileTraceSink::create(path, self.sink_config.clone())
    }

    fn persist(&self, staged: &Path, target: &Path) -> CodecResult<()> {
        fs::rename(staged, target)?;
        debug!(from = %staged.display(), to = %target.display(), "persisted trace");
        Ok(())
    }

    fn discard(&self, path: &Path) -> CodecResult<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "discarded trace");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{TraceSink, TraceSource};
    use calltrace_types::{CallFlags, CallRecord};

    #[test]
    fn sink_then_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.trace");
        let backend = FileBackend::default();

        let mut sink = backend.create_sink(&path).unwrap();
        sink.append(&CallRecord::new(2, CallFlags::END_FRAME, b"Present".to_vec()))
            .unwrap();
        sink.finish().unwrap();
        drop(sink);

        let mut source = backend.open_source(&path).unwrap();
        let call = source.next_call().unwrap().unwrap();
        assert_eq!(call.thread_id, 2);
        assert!(call.is_end_frame());
        assert_eq!(call.payload, b"Present");
        assert!(source.next_call().unwrap().is_none());
    }

    #[test]
    fn persist_renames_over_target() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("out.trace.partial");
        let target = dir.path().join("out.trace");
        std::fs::write(&staged, b"new").unwrap();
        std::fs::write(&target, b"old").unwrap();

        FileBackend::default().persist(&staged, &target).unwrap();
        assert!(!staged.exists());
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn discard_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.trace");
        std::fs::write(&path, b"x").unwrap();

        let backend = FileBackend::default();
        backend.discard(&path).unwrap();
        backend.discard(&path).unwrap();
        assert!(!path.exists());
    }
}
