use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitmask attached to every recorded call.
///
/// Bit values are part of the on-disk format and must never be renumbered.
/// Unknown bits are carried through untouched, so a trace written by a newer
/// recorder survives a merge unchanged.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallFlags(u32);

impl CallFlags {
    /// Call was synthesized by the recorder, not made by the application.
    pub const FAKE: Self = Self(1 << 0);
    /// Call cannot be reproduced faithfully on replay.
    pub const NON_REPRODUCIBLE: Self = Self(1 << 1);
    /// Call has no side effects.
    pub const NO_SIDE_EFFECTS: Self = Self(1 << 2);
    /// Call renders to the current render target.
    pub const RENDER: Self = Self(1 << 3);
    /// Call swaps the current render target.
    pub const SWAP_RENDERTARGET: Self = Self(1 << 4);
    /// Call concludes a frame.
    pub const END_FRAME: Self = Self(1 << 5);
    /// Call did not return before the capture ended.
    pub const INCOMPLETE: Self = Self(1 << 6);
    /// Call is only interesting in verbose listings.
    pub const VERBOSE: Self = Self(1 << 7);
    /// Debug marker.
    pub const MARKER: Self = Self(1 << 8);
    /// Opens a debug marker group.
    pub const MARKER_PUSH: Self = Self(1 << 9);
    /// Closes a debug marker group.
    pub const MARKER_POP: Self = Self(1 << 10);

    const NAMED: [(Self, &'static str); 11] = [
        (Self::FAKE, "FAKE"),
        (Self::NON_REPRODUCIBLE, "NON_REPRODUCIBLE"),
        (Self::NO_SIDE_EFFECTS, "NO_SIDE_EFFECTS"),
        (Self::RENDER, "RENDER"),
        (Self::SWAP_RENDERTARGET, "SWAP_RENDERTARGET"),
        (Self::END_FRAME, "END_FRAME"),
        (Self::INCOMPLETE, "INCOMPLETE"),
        (Self::VERBOSE, "VERBOSE"),
        (Self::MARKER, "MARKER"),
        (Self::MARKER_PUSH, "MARKER_PUSH"),
        (Self::MARKER_POP, "MARKER_POP"),
    ];

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wrap raw bits. Every bit pattern is accepted.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for CallFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CallFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for CallFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallFlags({self})")
    }
}

impl fmt::Display for CallFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        let mut rest = self.0;
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                rest &= !flag.0;
                first = false;
            }
        }
        if rest != 0 {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{rest:#x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_frame_bit_value() {
        assert_eq!(CallFlags::END_FRAME.bits(), 32);
        assert_eq!(CallFlags::MARKER_POP.bits(), 1024);
    }

    #[test]
    fn contains_and_insert() {
        let mut flags = CallFlags::RENDER;
        assert!(!flags.contains(CallFlags::END_FRAME));
        flags.insert(CallFlags::END_FRAME);
        assert!(flags.contains(CallFlags::END_FRAME));
        assert!(flags.contains(CallFlags::RENDER | CallFlags::END_FRAME));
        assert!(!flags.contains(CallFlags::FAKE));
    }

    #[test]
    fn empty_contains_empty() {
        assert!(CallFlags::empty().contains(CallFlags::empty()));
        assert!(CallFlags::default().is_empty());
    }

    #[test]
    fn unknown_bits_preserved() {
        let flags = CallFlags::from_bits(0x8000_0020);
        assert_eq!(flags.bits(), 0x8000_0020);
        assert!(flags.contains(CallFlags::END_FRAME));
    }

    #[test]
    fn display_names_known_bits() {
        let flags = CallFlags::RENDER | CallFlags::END_FRAME;
        assert_eq!(flags.to_string(), "RENDER|END_FRAME");
        assert_eq!(CallFlags::empty().to_string(), "0");
        assert_eq!(CallFlags::from_bits(0x1_0000).to_string(), "0x10000");
        assert_eq!(
            CallFlags::from_bits(0x1_0001).to_string(),
            "FAKE|0x10000"
        );
    }

    #[test]
    fn serializes_as_plain_u32() {
        let bytes = bincode::serialize(&CallFlags::END_FRAME).unwrap();
        assert_eq!(bytes, 32u32.to_le_bytes());
    }
}
