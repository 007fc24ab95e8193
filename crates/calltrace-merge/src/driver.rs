use std::path::{Path, PathBuf};

use calltrace_codec::{TraceBackend, TraceSink, TraceSource};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{MergeConfig, PartialOutput};
use crate::error::{MergeError, MergeResult};
use crate::frame::FrameTracker;
use crate::naming::staging_path;

/// Per-input counts from a finished merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    /// Input as given to [`MergeDriver::run`].
    pub path: PathBuf,
    /// Records forwarded from this input.
    pub calls: u64,
    /// Frame boundaries among those records.
    pub frames: u64,
}

/// Outcome of a successful merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Where the merged trace now lives.
    pub output: PathBuf,
    /// Inputs in merge order.
    pub inputs: Vec<InputSummary>,
    /// Total records forwarded.
    pub calls: u64,
    /// Total frame boundaries observed.
    pub frames: u64,
}

/// Concatenates call streams into a single output.
///
/// Inputs are drained one at a time, in the order given, into one sink held
/// open for the whole run. Every failure is terminal: nothing is retried and
/// no later input is touched.
pub struct MergeDriver<B: TraceBackend> {
    backend: B,
    config: MergeConfig,
}

impl<B: TraceBackend> MergeDriver<B> {
    /// Create a driver writing through `backend`.
    pub fn new(backend: B, config: MergeConfig) -> Self {
        Self { backend, config }
    }

    /// The configuration this driver runs with.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge `inputs`, in order, into the configured output.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P]) -> MergeResult<MergeReport> {
        if inputs.is_empty() {
            return Err(MergeError::NoInputs);
        }

        let output = self.config.output_path();
        let write_path = match self.config.partial_output {
            PartialOutput::Keep => output.clone(),
            PartialOutput::Discard => staging_path(&output),
        };

        let mut sink = self
            .backend
            .create_sink(&write_path)
            .map_err(|source| MergeError::SinkOpen {
                path: output.clone(),
                source,
            })?;
        debug!(output = %write_path.display(), inputs = inputs.len(), "merge started");

        let mut tracker = FrameTracker::new();
        let mut summaries = Vec::with_capacity(inputs.len());
        if let Err(err) = self.drain_inputs(inputs, &write_path, &mut sink, &mut tracker, &mut summaries) {
            return Err(self.abort(err, sink, &write_path));
        }

        if let Err(source) = sink.finish() {
            drop(sink);
            let err = MergeError::Finalize {
                path: write_path.clone(),
                source,
                partial_output: None,
            };
            return Err(self.apply_policy(err, &write_path));
        }
        drop(sink);

        if self.config.partial_output == PartialOutput::Discard {
            if let Err(source) = self.backend.persist(&write_path, &output) {
                self.discard_staging(&write_path);
                return Err(MergeError::Finalize {
                    path: output,
                    source,
                    partial_output: None,
                });
            }
        }

        let calls: u64 = summaries.iter().map(|s| s.calls).sum();
        info!(
            output = %output.display(),
            inputs = summaries.len(),
            calls,
            frames = tracker.frames(),
            "merge complete"
        );
        Ok(MergeReport {
            output,
            inputs: summaries,
            calls,
            frames: tracker.frames(),
        })
    }

    fn drain_inputs<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        write_path: &Path,
        sink: &mut B::Sink,
        tracker: &mut FrameTracker,
        summaries: &mut Vec<InputSummary>,
    ) -> MergeResult<()> {
        for input in inputs {
            let path = input.as_ref();
            let mut source =
                self.backend
                    .open_source(path)
                    .map_err(|source| MergeError::SourceOpen {
                        path: path.to_path_buf(),
                        source,
                        partial_output: None,
                    })?;

            let frames_before = tracker.frames();
            let mut calls = 0u64;
            // Each record is moved out of the source, lent to the sink, and
            // dropped at the end of the iteration.
            while let Some(call) = source.next_call().map_err(|source| MergeError::SourceRead {
                path: path.to_path_buf(),
                source,
                partial_output: None,
            })? {
                sink.append(&call).map_err(|source| MergeError::SinkWrite {
                    path: write_path.to_path_buf(),
                    source,
                    partial_output: None,
                })?;
                tracker.observe(&call);
                calls += 1;
            }
            drop(source);

            let frames = tracker.frames() - frames_before;
            debug!(input = %path.display(), calls, frames, "drained input");
            summaries.push(InputSummary {
                path: path.to_path_buf(),
                calls,
                frames,
            });
        }
        Ok(())
    }

    /// Release the sink after a failed drain and apply the partial-output
    /// policy.
    fn abort(&self, err: MergeError, mut sink: B::Sink, write_path: &Path) -> MergeError {
        if self.config.partial_output == PartialOutput::Keep {
            if let Err(e) = sink.finish() {
                warn!(path = %write_path.display(), error = %e, "failed to flush partial output");
            }
        }
        drop(sink);
        self.apply_policy(err, write_path)
    }

    /// Keep or remove the output of a failed merge. The sink must already be
    /// released.
    fn apply_policy(&self, err: MergeError, write_path: &Path) -> MergeError {
        match self.config.partial_output {
            PartialOutput::Keep => {
                warn!(path = %write_path.display(), "merge aborted; partial output left on disk");
                err.with_partial_output(write_path)
            }
            PartialOutput::Discard => {
                self.discard_staging(write_path);
                err
            }
        }
    }

    fn discard_staging(&self, staged: &Path) {
        if let Err(e) = self.backend.discard(staged) {
            warn!(path = %staged.display(), error = %e, "failed to remove staging output");
        }
    }
}
