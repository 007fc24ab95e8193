use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use calltrace_types::CallRecord;
use tracing::debug;

use crate::error::CodecResult;
use crate::format::{encode_payload, encode_record_header, encode_stream_header, RECORD_HEADER_SIZE};
use crate::traits::TraceSink;

/// Flush/sync strategy for a trace sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Rely on OS page-cache buffering (fastest, least durable).
    #[default]
    OsDefault,
    /// `fsync` once when the sink is finished.
    OnFinish,
    /// Flush and `fsync` after every record (slowest, most durable).
    EveryWrite,
}

/// Configuration for trace sinks.
#[derive(Clone, Debug, Default)]
pub struct SinkConfig {
    /// Sync strategy.
    pub sync_mode: SyncMode,
}

/// Append-only writer for a call-stream file.
#[derive(Debug)]
pub struct FileTraceSink {
    path: PathBuf,
    writer: BufWriter<File>,
    /// Offset the next record will be written at.
    offset: u64,
    calls_written: u64,
    config: SinkConfig,
}

impl FileTraceSink {
    /// Create (or truncate) a trace file and write the stream header.
    pub fn create(path: &Path, config: SinkConfig) -> CodecResult<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let header = encode_stream_header();
        writer.write_all(&header)?;

        debug!(path = %path.display(), "created trace sink");
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            offset: header.len() as u64,
            calls_written: 0,
            config,
        })
    }

    /// Path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current write offset (total bytes written, header included).
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records appended so far.
    pub fn calls_written(&self) -> u64 {
        self.calls_written
    }
}

impl TraceSink for FileTraceSink {
    fn append(&mut self, call: &CallRecord) -> CodecResult<u64> {
        let entry_offset = self.offset;
        let payload = encode_payload(call)?;
        let header = encode_record_header(&payload, entry_offset)?;

        self.writer.write_all(&header)?;
        self.writer.write_all(&payload)?;

        if self.config.sync_mode == SyncMode::EveryWrite {
            self.writer.flush()?;
            self.writer.get_ref().sync_all()?;
        }

        self.offset += (RECORD_HEADER_SIZE + payload.len()) as u64;
        self.calls_written += 1;
        Ok(entry_offset)
    }

    fn finish(&mut self) -> CodecResult<()> {
        self.writer.flush()?;
        if self.config.sync_mode != SyncMode::OsDefault {
            self.writer.get_ref().sync_all()?;
        }
        debug!(
            path = %self.path.display(),
            calls = self.calls_written,
            bytes = self.offset,
            "finished trace sink"
        );
        Ok(())
    }
}
