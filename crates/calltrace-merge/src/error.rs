use std::path::{Path, PathBuf};

use calltrace_codec::CodecError;

/// Errors that abort a merge. Every variant names the offending path.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The merge was started without any input.
    #[error("no input traces given")]
    NoInputs,

    /// The output trace could not be created. Nothing has been read.
    #[error("failed to create {}: {}", path.display(), source)]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// An input trace could not be opened as a call stream.
    #[error("failed to open {}: {}", path.display(), source)]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: CodecError,
        /// Output left on disk holding the records merged so far, if any.
        partial_output: Option<PathBuf>,
    },

    /// An input trace failed part-way through.
    #[error("failed to read {}: {}", path.display(), source)]
    SourceRead {
        path: PathBuf,
        #[source]
        source: CodecError,
        partial_output: Option<PathBuf>,
    },

    /// A record could not be appended to the output.
    #[error("failed to write {}: {}", path.display(), source)]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: CodecError,
        partial_output: Option<PathBuf>,
    },

    /// The output could not be flushed or moved into place.
    #[error("failed to finalize {}: {}", path.display(), source)]
    Finalize {
        path: PathBuf,
        #[source]
        source: CodecError,
        partial_output: Option<PathBuf>,
    },
}

impl MergeError {
    /// Output left behind in a partial, non-authoritative state, if any.
    pub fn partial_output(&self) -> Option<&Path> {
        match self {
            Self::SourceOpen { partial_output, .. }
            | Self::SourceRead { partial_output, .. }
            | Self::SinkWrite { partial_output, .. }
            | Self::Finalize { partial_output, .. } => partial_output.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn with_partial_output(mut self, output: &Path) -> Self {
        match &mut self {
            Self::SourceOpen { partial_output, .. }
            | Self::SourceRead { partial_output, .. }
            | Self::SinkWrite { partial_output, .. }
            | Self::Finalize { partial_output, .. } => {
                *partial_output = Some(output.to_path_buf());
            }
            _ => {}
        }
        self
    }
}

/// Result alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = MergeError::SourceOpen {
            path: PathBuf::from("missing.trace"),
            source: CodecError::NotFound(PathBuf::from("missing.trace")),
            partial_output: None,
        };
        assert!(err.to_string().starts_with("failed to open missing.trace"));

        let err = MergeError::SinkOpen {
            path: PathBuf::from("/nope/out.trace"),
            source: CodecError::Unwritable(PathBuf::from("/nope/out.trace")),
        };
        assert!(err.to_string().starts_with("failed to create /nope/out.trace"));
    }

    #[test]
    fn partial_output_only_on_mid_merge_failures() {
        let sink_open = MergeError::SinkOpen {
            path: PathBuf::from("out.trace"),
            source: CodecError::Unwritable(PathBuf::from("out.trace")),
        }
        .with_partial_output(Path::new("out.trace"));
        assert!(sink_open.partial_output().is_none());

        let source_open = MergeError::SourceOpen {
            path: PathBuf::from("b.trace"),
            source: CodecError::NotFound(PathBuf::from("b.trace")),
            partial_output: None,
        }
        .with_partial_output(Path::new("out.trace"));
        assert_eq!(source_open.partial_output(), Some(Path::new("out.trace")));

        let finalize = MergeError::Finalize {
            path: PathBuf::from("out.trace"),
            source: CodecError::NotFound(PathBuf::from("out.trace")),
            partial_output: None,
        }
        .with_partial_output(Path::new("out.trace"));
        assert_eq!(finalize.partial_output(), Some(Path::new("out.trace")));
    }
}
