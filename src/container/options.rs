//! Container configuration

use crate::format::{FORMAT_VERSION, FileHeader, Flags, Result, checked_version};

/// Settings recorded in the file header of a new container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    version: u32,
    flags: Flags,
}

impl Options {
    /// Defaults: current format version, no flags
    #[must_use]
    pub const fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            flags: Flags::new(),
        }
    }

    /// Set the version recorded in the header.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::VersionOutOfRange`] if `version` does not fit in 4 bytes.
    pub fn with_version(mut self, version: u64) -> Result<Self> {
        self.version = checked_version(version)?;
        Ok(self)
    }

    /// Mark payloads as encrypted
    #[must_use]
    pub const fn encrypted(mut self, encrypted: bool) -> Self {
        self.flags = if encrypted {
            self.flags.with(Flags::ENCRYPTED)
        } else {
            self.flags.without(Flags::ENCRYPTED)
        };
        self
    }

    /// Mark payloads as compressed
    #[must_use]
    pub const fn compressed(mut self, compressed: bool) -> Self {
        self.flags = if compressed {
            self.flags.with(Flags::COMPRESSED)
        } else {
            self.flags.without(Flags::COMPRESSED)
        };
        self
    }

    /// Get version
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Unsealed header carrying these settings
    #[must_use]
    pub const fn header(&self) -> FileHeader {
        FileHeader::new(self.version, self.flags)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.version(), FORMAT_VERSION);
        assert_eq!(options.flags(), Flags::new());
    }

    #[test]
    fn test_builder() {
        let options = Options::new()
            .with_version(9)
            .unwrap()
            .encrypted(true)
            .compressed(true)
            .compressed(false);

        assert_eq!(options.version(), 9);
        assert!(options.flags().is_encrypted());
        assert!(!options.flags().is_compressed());
        assert_eq!(options.header().version(), 9);
    }

    #[test]
    fn test_version_out_of_range() {
        let result = Options::new().with_version(1 << 32);
        assert!(matches!(
            result,
            Err(Error::VersionOutOfRange { version }) if version == 1 << 32
        ));
    }
}
