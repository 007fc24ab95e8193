//! Merge engine for calltrace.
//!
//! Concatenates any number of call streams into one output, preserving call
//! order within each input and the order of the inputs themselves. Records
//! are forwarded untouched; frame boundaries are counted as they pass.
//!
//! The engine only drives the [`TraceBackend`](calltrace_codec::TraceBackend)
//! capability, so it runs the same against files and in-memory traces.
//!
//! # Failure policy
//!
//! Every failure is terminal. When an input fails after the output has been
//! created, [`PartialOutput`] decides whether the partially merged file is
//! kept (and reported through [`MergeError::partial_output`]) or discarded.

pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod naming;

pub use config::{MergeConfig, PartialOutput};
pub use driver::{InputSummary, MergeDriver, MergeReport};
pub use error::{MergeError, MergeResult};
pub use frame::FrameTracker;
pub use naming::{default_output_path, derive_output_name, staging_path};
