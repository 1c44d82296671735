//! GOBS file header
//!
//! The header is 14 bytes and written once, ahead of the first frame.

use super::{
    COMPRESSED_BYTES, ENCRYPTED_BYTES, Error, FILE_CHECKSUM_BYTES, FILE_HEADER_SIZE, Flags,
    MAGIC, MAGIC_BYTES, Result, VERSION_BYTES,
};

const MAGIC_START: usize = 0;
const MAGIC_END: usize = MAGIC_START + MAGIC_BYTES;
const VERSION_START: usize = MAGIC_END;
const VERSION_END: usize = VERSION_START + VERSION_BYTES;
const CHECKSUM_START: usize = VERSION_END;
const CHECKSUM_END: usize = CHECKSUM_START + FILE_CHECKSUM_BYTES;
const ENCRYPTED_AT: usize = CHECKSUM_END;
const COMPRESSED_AT: usize = ENCRYPTED_AT + ENCRYPTED_BYTES;

const _: () = assert!(COMPRESSED_AT + COMPRESSED_BYTES == FILE_HEADER_SIZE);

/// GOBS file header (14 bytes)
///
/// # Wire Format
///
/// ```text
/// 0       4         8          12          13           14
/// +-------+---------+----------+-----------+------------+
/// | magic | version | checksum | encrypted | compressed |
/// +-------+---------+----------+-----------+------------+
/// ```
///
/// The checksum is CRC32 (IEEE) over the file body: every byte that follows
/// the header, which is the concatenation of all frames in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    version: u32,
    checksum: u32,
    flags: Flags,
}

impl FileHeader {
    /// Create an unsealed header (checksum zero)
    #[must_use]
    pub const fn new(version: u32, flags: Flags) -> Self {
        Self {
            version,
            checksum: 0,
            flags,
        }
    }

    /// Compute and record the checksum of the file body
    #[must_use]
    pub fn seal(mut self, body: &[u8]) -> Self {
        self.checksum = crc32fast::hash(body);
        self
    }

    /// Get version
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Get body checksum
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Get flags
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Check the body against the recorded checksum
    pub fn verify(&self, body: &[u8]) -> Result<()> {
        let found = crc32fast::hash(body);
        if found != self.checksum {
            return Err(Error::ChecksumMismatch {
                expected: self.checksum,
                found,
            });
        }
        Ok(())
    }

    /// Convert to bytes (little-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut bytes = [0u8; FILE_HEADER_SIZE];

        bytes[MAGIC_START..MAGIC_END].copy_from_slice(&MAGIC);
        bytes[VERSION_START..VERSION_END].copy_from_slice(&self.version.to_le_bytes());
        bytes[CHECKSUM_START..CHECKSUM_END].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[ENCRYPTED_AT] = u8::from(self.flags.is_encrypted());
        bytes[COMPRESSED_AT] = u8::from(self.flags.is_compressed());

        bytes
    }

    /// Parse from bytes (little-endian)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(bytes) = bytes.first_chunk::<FILE_HEADER_SIZE>() else {
            return Err(Error::BufferTooSmall {
                needed: FILE_HEADER_SIZE,
                got: bytes.len(),
            });
        };

        let mut magic = [0u8; MAGIC_BYTES];
        magic.copy_from_slice(&bytes[MAGIC_START..MAGIC_END]);
        if magic != MAGIC {
            return Err(Error::InvalidMagic { found: magic });
        }

        let mut version = [0u8; VERSION_BYTES];
        version.copy_from_slice(&bytes[VERSION_START..VERSION_END]);
        let mut checksum = [0u8; FILE_CHECKSUM_BYTES];
        checksum.copy_from_slice(&bytes[CHECKSUM_START..CHECKSUM_END]);

        let encrypted = flag_byte("encrypted", bytes[ENCRYPTED_AT])?;
        let compressed = flag_byte("compressed", bytes[COMPRESSED_AT])?;

        Ok(Self {
            version: u32::from_le_bytes(version),
            checksum: u32::from_le_bytes(checksum),
            flags: Flags::from_bools(encrypted, compressed),
        })
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new(super::FORMAT_VERSION, Flags::new())
    }
}

/// Narrow an externally supplied version number to the 4-byte version field.
pub fn checked_version(version: u64) -> Result<u32> {
    u32::try_from(version).map_err(|_| Error::VersionOutOfRange { version })
}

fn flag_byte(field: &'static str, value: u8) -> Result<bool> {
    match value {
        0x00 => Ok(false),
        0x01 => Ok(true),
        _ => Err(Error::InvalidFlag { field, value }),
    }
}
