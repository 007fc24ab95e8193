//! Foundation types for calltrace.
//!
//! A trace is an ordered log of intercepted API calls. This crate holds the
//! data model shared by the codec and the merge engine; it has no behavior
//! beyond flag arithmetic.
//!
//! # Key Types
//!
//! - [`CallRecord`] — one recorded call: thread, flags, and an opaque payload
//! - [`CallFlags`] — bitmask describing a call (frame boundaries, markers, ...)

pub mod call;
pub mod flags;

pub use call::CallRecord;
pub use flags::CallFlags;
