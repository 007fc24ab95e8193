use std::path::PathBuf;

use crate::naming::default_output_path;

/// What happens to the output when a merge fails after it was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartialOutput {
    /// Write straight to the output path and leave whatever was merged on
    /// failure. The error reports the partial file.
    #[default]
    Keep,
    /// Write to a staging file next to the output; rename it into place on
    /// success, remove it on failure.
    Discard,
}

/// Configuration for a merge run.
#[derive(Clone, Debug, Default)]
pub struct MergeConfig {
    /// Explicit output path. Defaults to `output-merge.trace`.
    pub output: Option<PathBuf>,
    /// Failure policy for the output file.
    pub partial_output: PartialOutput,
}

impl MergeConfig {
    /// Resolved output path.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(default_output_path)
    }
}
