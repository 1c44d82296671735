//! GOBS frame prefix
//!
//! Every frame starts with a 16-byte prefix describing the payload that
//! follows it. The three fields are independent of each other and are
//! computed in parallel.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{instrument, trace};

use super::metrics::{IntegrityFailure, Metrics};
use super::{
    CHECKSUM_BYTES, CHECKSUM_END, CHECKSUM_START, Error, MAX_DATA_BYTES, PREFIX_SIZE, Result,
    SIZE_BYTES, SIZE_END, SIZE_START, TIMESTAMP_BYTES, TIMESTAMP_END, TIMESTAMP_START, join3,
};

/// Encode a payload length as the size field.
///
/// # Errors
///
/// Returns [`Error::SizeExceeded`] when `len` is larger than [`MAX_DATA_BYTES`].
pub fn size_field(len: usize) -> Result<[u8; SIZE_BYTES]> {
    if len > MAX_DATA_BYTES {
        return Err(Error::SizeExceeded {
            max: MAX_DATA_BYTES,
            size: len,
        });
    }
    // Bounded by MAX_DATA_BYTES above, so the length fits in a u32.
    Ok((len as u32).to_le_bytes())
}

/// CRC32 (IEEE) of the payload as the checksum field.
#[must_use]
pub fn checksum_field(payload: &[u8]) -> [u8; CHECKSUM_BYTES] {
    crc32fast::hash(payload).to_le_bytes()
}

/// Current Unix time in whole seconds as the timestamp field.
#[must_use]
pub fn timestamp_field() -> [u8; TIMESTAMP_BYTES] {
    unix_seconds().to_le_bytes()
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Build the 16-byte prefix for a payload.
///
/// # Format
///
/// ```text
/// [SIZE (4)] [CHECKSUM (4)] [TIMESTAMP (8)]
/// ```
///
/// # Errors
///
/// Returns [`Error::SizeExceeded`] when the payload is too large for a frame.
/// No bytes are produced in that case.
#[instrument(level = "trace", skip_all, fields(len = payload.len()))]
pub fn build_prefix(payload: &[u8]) -> Result<[u8; PREFIX_SIZE]> {
    assemble(payload.len(), payload)
}

/// Fork-join the three fields for a payload of length `len` and copy them
/// into place. `len` is passed separately from `payload` so the size bound
/// can be driven without a buffer of that size.
fn assemble(len: usize, payload: &[u8]) -> Result<[u8; PREFIX_SIZE]> {
    let started = Instant::now();

    let (size, checksum, timestamp) = join3(
        || size_field(len),
        || checksum_field(payload),
        timestamp_field,
    );
    let size = size?;

    let mut prefix = [0u8; PREFIX_SIZE];
    prefix[SIZE_START..SIZE_END].copy_from_slice(&size);
    prefix[CHECKSUM_START..CHECKSUM_END].copy_from_slice(&checksum);
    prefix[TIMESTAMP_START..TIMESTAMP_END].copy_from_slice(&timestamp);

    Metrics::record_prefix_latency(started.elapsed());
    trace!("frame prefix built");

    Ok(prefix)
}

/// GOBS frame prefix (16 bytes)
///
/// # Wire Format
///
/// ```text
/// 0      4          8                  16
/// +------+----------+------------------+
/// | size | checksum |    timestamp     |
/// +------+----------+------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePrefix {
    size: u32,
    checksum: u32,
    timestamp: u64,
}

impl FramePrefix {
    /// Build the prefix for a payload, stamped with the current time
    pub fn build(payload: &[u8]) -> Result<Self> {
        Self::from_bytes(&build_prefix(payload)?)
    }

    /// Get payload size in bytes
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Get payload checksum
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Get creation time in Unix seconds
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Payload size as a buffer length
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.size as usize
    }

    /// Check a payload against this prefix.
    ///
    /// Only the first `size` bytes of `payload` are covered.
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedFrame`] if fewer than `size` bytes are available
    /// - [`Error::ChecksumMismatch`] if the CRC32 differs
    pub fn verify(&self, payload: &[u8]) -> Result<()> {
        let declared = self.payload_len();
        let Some(payload) = payload.get(..declared) else {
            Metrics::record_failure(IntegrityFailure::Truncated);
            return Err(Error::TruncatedFrame {
                declared,
                available: payload.len(),
            });
        };

        let found = crc32fast::hash(payload);
        if found != self.checksum {
            Metrics::record_failure(IntegrityFailure::Checksum);
            return Err(Error::ChecksumMismatch {
                expected: self.checksum,
                found,
            });
        }
        Ok(())
    }

    /// Convert to bytes (little-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PREFIX_SIZE] {
        let mut bytes = [0u8; PREFIX_SIZE];

        bytes[SIZE_START..SIZE_END].copy_from_slice(&self.size.to_le_bytes());
        bytes[CHECKSUM_START..CHECKSUM_END].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[TIMESTAMP_START..TIMESTAMP_END].copy_from_slice(&self.timestamp.to_le_bytes());

        bytes
    }

    /// Parse from bytes (little-endian)
    ///
    /// # Errors
    ///
    /// - [`Error::BufferTooSmall`] if fewer than 16 bytes are given
    /// - [`Error::TruncatedFrame`] if the size field is beyond [`MAX_DATA_BYTES`]:
    ///   no valid frame can supply that many bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let total = bytes.len();
        let Some(bytes) = bytes.first_chunk::<PREFIX_SIZE>() else {
            return Err(Error::BufferTooSmall {
                needed: PREFIX_SIZE,
                got: total,
            });
        };

        let mut size = [0u8; SIZE_BYTES];
        size.copy_from_slice(&bytes[SIZE_START..SIZE_END]);
        let mut checksum = [0u8; CHECKSUM_BYTES];
        checksum.copy_from_slice(&bytes[CHECKSUM_START..CHECKSUM_END]);
        let mut timestamp = [0u8; TIMESTAMP_BYTES];
        timestamp.copy_from_slice(&bytes[TIMESTAMP_START..TIMESTAMP_END]);

        let size = u32::from_le_bytes(size);
        if size as usize > MAX_DATA_BYTES {
            Metrics::record_failure(IntegrityFailure::Truncated);
            return Err(Error::TruncatedFrame {
                declared: size as usize,
                available: total - PREFIX_SIZE,
            });
        }

        Ok(Self {
            size,
            checksum: u32::from_le_bytes(checksum),
            timestamp: u64::from_le_bytes(timestamp),
        })
    }
}
