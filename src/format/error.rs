//! GOBS error types

use thiserror::Error;

/// Boxed error produced by a payload serialization engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// GOBS format errors
#[derive(Error, Debug)]
pub enum Error {
    /// Payload is larger than a frame can carry
    #[error("maximum allowed bytes {max} exceeded: found {size}")]
    SizeExceeded {
        /// Maximum allowed
        max: usize,
        /// Payload size
        size: usize,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#010x}, got {found:#010x}")]
    ChecksumMismatch {
        /// Stored checksum
        expected: u32,
        /// Checksum computed over the received bytes
        found: u32,
    },

    /// Fewer payload bytes available than the prefix declares
    #[error("truncated frame: declared {declared} bytes, {available} available")]
    TruncatedFrame {
        /// Size recorded in the frame prefix
        declared: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Buffer too small for a fixed-size record
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Invalid magic bytes
    #[error("invalid magic: expected \"gobs\", got {found:02x?}")]
    InvalidMagic {
        /// Found magic bytes
        found: [u8; 4],
    },

    /// Flag byte other than 0x00 or 0x01
    #[error("invalid {field} flag byte: {value:#04x}")]
    InvalidFlag {
        /// Flag name
        field: &'static str,
        /// Offending byte
        value: u8,
    },

    /// Version number does not fit in the 4-byte version field
    #[error("version {version} does not fit in 4 bytes")]
    VersionOutOfRange {
        /// Requested version
        version: u64,
    },

    /// Serialization engine could not encode a value
    #[error("{codec} encode error: {source}")]
    Encode {
        /// Engine name
        codec: &'static str,
        /// Engine error
        #[source]
        source: BoxError,
    },

    /// Serialization engine could not decode a payload
    #[error("{codec} decode error: {source}")]
    Decode {
        /// Engine name
        codec: &'static str,
        /// Engine error
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Whether the error signals damaged or incomplete data rather than a caller mistake.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. }
                | Self::TruncatedFrame { .. }
                | Self::BufferTooSmall { .. }
                | Self::InvalidMagic { .. }
                | Self::InvalidFlag { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
