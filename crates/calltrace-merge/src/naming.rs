use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Base name for the output when none is given.
pub const DEFAULT_OUTPUT_BASE: &str = "output";

/// Suffix appended to the extension-less base name.
pub const MERGE_SUFFIX: &str = "-merge.trace";

/// Suffix for the staging file used when partial output is discarded.
pub const STAGING_SUFFIX: &str = ".partial";

/// `base` with its extension stripped and [`MERGE_SUFFIX`] appended.
pub fn derive_output_name(base: &Path) -> PathBuf {
    let mut name: OsString = base.with_extension("").into_os_string();
    name.push(MERGE_SUFFIX);
    PathBuf::from(name)
}

/// Output path used when none is given: `output-merge.trace`.
pub fn default_output_path() -> PathBuf {
    derive_output_name(Path::new(DEFAULT_OUTPUT_BASE))
}

/// Staging path written next to `output`.
pub fn staging_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_output_merge_trace() {
        assert_eq!(default_output_path(), PathBuf::from("output-merge.trace"));
    }

    #[test]
    fn extension_is_stripped() {
        assert_eq!(
            derive_output_name(Path::new("capture.trace")),
            PathBuf::from("capture-merge.trace")
        );
        assert_eq!(
            derive_output_name(Path::new("runs/app.v2.trace")),
            PathBuf::from("runs/app.v2-merge.trace")
        );
    }

    #[test]
    fn staging_sits_next_to_output() {
        assert_eq!(
            staging_path(Path::new("dir/out.trace")),
            PathBuf::from("dir/out.trace.partial")
        );
    }
}
