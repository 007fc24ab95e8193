use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use calltrace_types::CallRecord;
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::format::{
    decode_payload, decode_record_header, decode_stream_header, verify_payload,
    RECORD_HEADER_SIZE, STREAM_HEADER_SIZE,
};
use crate::traits::TraceSource;

/// Sequential reader over a call-stream file.
///
/// The stream header is validated on open. Records are then decoded lazily,
/// one per [`next_call`](TraceSource::next_call). Unlike WAL-style recovery,
/// damaged records are reported as errors rather than skipped, so a merge
/// never silently drops calls.
#[derive(Debug)]
pub struct FileTraceSource {
    path: PathBuf,
    /// `None` once the stream is exhausted or has failed.
    reader: Option<BufReader<File>>,
    /// Offset of the next record header.
    offset: u64,
    calls_read: u64,
}

impl FileTraceSource {
    /// Open a trace file and validate its header.
    pub fn open(path: &Path) -> CodecResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);

        let mut header = [0u8; STREAM_HEADER_SIZE];
        if read_full(&mut reader, &mut header)? < STREAM_HEADER_SIZE {
            return Err(CodecError::Truncated { offset: 0 });
        }
        let version = decode_stream_header(&header)?;

        debug!(path = %path.display(), version, "opened trace source");
        Ok(Self {
            path: path.to_path_buf(),
            reader: Some(reader),
            offset: STREAM_HEADER_SIZE as u64,
            calls_read: 0,
        })
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records returned so far.
    pub fn calls_read(&self) -> u64 {
        self.calls_read
    }

    /// Returns `true` once no further records will be produced.
    pub fn is_exhausted(&self) -> bool {
        self.reader.is_none()
    }

    fn read_next(&mut self) -> CodecResult<Option<CallRecord>> {
        let offset = self.offset;
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut header = [0u8; RECORD_HEADER_SIZE];
        match read_full(reader, &mut header)? {
            0 => return Ok(None),
            RECORD_HEADER_SIZE => {}
            _ => return Err(CodecError::Truncated { offset }),
        }
        let (length, crc) = decode_record_header(&header, offset)?;

        let mut payload = vec![0u8; length as usize];
        if read_full(reader, &mut payload)? < payload.len() {
            return Err(CodecError::Truncated { offset });
        }
        verify_payload(&payload, crc, offset)?;
        let call = decode_payload(&payload)?;

        self.offset += (RECORD_HEADER_SIZE + payload.len()) as u64;
        self.calls_read += 1;
        Ok(Some(call))
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(
                path = %self.path.display(),
                calls = self.calls_read,
                "closed trace source"
            );
        }
    }
}

impl TraceSource for FileTraceSource {
    fn next_call(&mut self) -> CodecResult<Option<CallRecord>> {
        let result = self.read_next();
        if !matches!(result, Ok(Some(_))) {
            self.close();
        }
        result
    }
}

/// Fill `buf` from `reader`, stopping early only at end of file.
/// Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
