//! GOBS file flags

use std::fmt;

/// File-level payload flags
///
/// The format records these flags but does not act on them: the encryption
/// and compression engines live outside the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    /// Valid flag bits mask
    pub const VALID_MASK: u8 = Self::ENCRYPTED | Self::COMPRESSED;
    /// Payloads are encrypted
    pub const ENCRYPTED: u8 = 1 << 0;
    /// Payloads are compressed
    pub const COMPRESSED: u8 = 1 << 1;

    /// Create empty flags
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create from the two boolean header bytes
    #[must_use]
    pub const fn from_bools(encrypted: bool, compressed: bool) -> Self {
        let mut bits = 0;
        if encrypted {
            bits |= Self::ENCRYPTED;
        }
        if compressed {
            bits |= Self::COMPRESSED;
        }
        Self(bits)
    }

    /// Set a flag
    #[must_use]
    pub const fn with(mut self, flag: u8) -> Self {
        debug_assert!(flag & !Self::VALID_MASK == 0, "invalid flag bit");
        self.0 |= flag;
        self
    }

    /// Clear a flag
    #[must_use]
    pub const fn without(mut self, flag: u8) -> Self {
        self.0 &= !flag;
        self
    }

    /// Check if flag is set
    #[must_use]
    pub const fn has(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Check if encrypted
    #[must_use]
    pub const fn is_encrypted(self) -> bool {
        self.has(Self::ENCRYPTED)
    }

    /// Check if compressed
    #[must_use]
    pub const fn is_compressed(self) -> bool {
        self.has(Self::COMPRESSED)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_encrypted(), self.is_compressed()) {
            (false, false) => write!(f, "NONE"),
            (true, false) => write!(f, "ENCRYPTED"),
            (false, true) => write!(f, "COMPRESSED"),
            (true, true) => write!(f, "ENCRYPTED | COMPRESSED"),
        }
    }
}
