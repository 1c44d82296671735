//! GOBS wire format
//!
//! This module owns the two fixed-size metadata records of the format (the
//! file header and the frame prefix) and the frame built from them.
//!
//! ```text
//! FILE  := MAGIC(4) VERSION(u32) CHECKSUM(u32) ENCRYPTED(u8) COMPRESSED(u8) [FRAME]*
//! FRAME := SIZE(u32) CHECKSUM(u32) TIMESTAMP(u64) PAYLOAD(SIZE bytes)
//! ```
//!
//! All integers are little-endian.

mod error;
mod frame;
mod header;
mod join;
pub(crate) mod metrics;
mod prefix;
mod types;

pub use error::{BoxError, Error, Result};
pub use frame::Frame;
pub use header::{FileHeader, checked_version};
pub use join::join3;
pub use metrics::{MetricsSnapshot, snapshot as metrics_snapshot};
pub use prefix::{FramePrefix, build_prefix, checksum_field, size_field, timestamp_field};
pub use types::Flags;

/// Format identifier, written as the first four bytes of every file.
pub const BINARY_FORMAT_IDENTIFIER: &str = "gobs";

/// Magic bytes at the start of every file.
pub const MAGIC: [u8; 4] = identifier_bytes();

/// Conventional file extension: a dot followed by the identifier.
pub const FILE_EXTENSION: &str = ".gobs";

/// Current format revision.
pub const FORMAT_VERSION: u32 = 1;

// File header layout
pub(crate) const MAGIC_BYTES: usize = MAGIC.len();
pub(crate) const VERSION_BYTES: usize = 4;
pub(crate) const FILE_CHECKSUM_BYTES: usize = 4;
pub(crate) const ENCRYPTED_BYTES: usize = 1;
pub(crate) const COMPRESSED_BYTES: usize = 1;

/// File header size in bytes.
pub const FILE_HEADER_SIZE: usize =
    MAGIC_BYTES + VERSION_BYTES + FILE_CHECKSUM_BYTES + ENCRYPTED_BYTES + COMPRESSED_BYTES;

// Frame prefix layout
pub(crate) const SIZE_BYTES: usize = 4;
pub(crate) const CHECKSUM_BYTES: usize = 4;
pub(crate) const TIMESTAMP_BYTES: usize = 8;

pub(crate) const SIZE_START: usize = 0;
pub(crate) const SIZE_END: usize = SIZE_START + SIZE_BYTES;
pub(crate) const CHECKSUM_START: usize = SIZE_END;
pub(crate) const CHECKSUM_END: usize = CHECKSUM_START + CHECKSUM_BYTES;
pub(crate) const TIMESTAMP_START: usize = CHECKSUM_END;
pub(crate) const TIMESTAMP_END: usize = TIMESTAMP_START + TIMESTAMP_BYTES;

/// Frame prefix size in bytes.
pub const PREFIX_SIZE: usize = SIZE_BYTES + CHECKSUM_BYTES + TIMESTAMP_BYTES;

/// Largest total frame size, prefix included.
///
/// Lengths are bounded by the signed 32-bit range so that every platform can
/// address a frame.
pub const MAX_TOTAL_BYTES: usize = i32::MAX as usize;

/// Largest payload a single frame can carry.
pub const MAX_DATA_BYTES: usize = MAX_TOTAL_BYTES - PREFIX_SIZE;

const fn identifier_bytes() -> [u8; 4] {
    let id = BINARY_FORMAT_IDENTIFIER.as_bytes();
    assert!(id.len() == 4, "format identifier must be four bytes");
    [id[0], id[1], id[2], id[3]]
}

const _: () = assert!(FILE_HEADER_SIZE == 14);
const _: () = assert!(PREFIX_SIZE == 16);
const _: () = assert!(TIMESTAMP_END == PREFIX_SIZE);
