use calltrace_types::CallRecord;

/// Counts frame boundaries across a whole merge.
///
/// The count never resets between inputs and is only reported; the output
/// carries frame boundaries through each record's own flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameTracker {
    frames: u64,
}

impl FrameTracker {
    /// A tracker that has seen no frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a forwarded record. Returns `true` if it ended a frame.
    pub fn observe(&mut self, call: &CallRecord) -> bool {
        let ends_frame = call.is_end_frame();
        if ends_frame {
            self.frames += 1;
        }
        ends_frame
    }

    /// Completed frames so far. Also the index of the frame in progress.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calltrace_types::CallFlags;

    fn call(flags: CallFlags) -> CallRecord {
        CallRecord::new(0, flags, Vec::new())
    }

    #[test]
    fn counts_only_end_frame() {
        let mut tracker = FrameTracker::new();
        assert!(!tracker.observe(&call(CallFlags::RENDER)));
        assert!(tracker.observe(&call(CallFlags::END_FRAME)));
        assert!(!tracker.observe(&call(CallFlags::empty())));
        assert!(tracker.observe(&call(CallFlags::END_FRAME | CallFlags::SWAP_RENDERTARGET)));
        assert_eq!(tracker.frames(), 2);
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(FrameTracker::new().frames(), 0);
    }
}
