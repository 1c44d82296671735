//! GOBS - self-describing binary container with per-frame integrity
//!
//! A GOBS file carries serialized values as frames. Each frame is preceded by
//! a 16-byte prefix holding the payload length, a CRC32 of the payload and a
//! creation timestamp, so a frame can be validated before its payload is
//! decoded. The file as a whole starts with a 14-byte header: the `"gobs"`
//! magic, a format version, a checksum over everything that follows, and
//! encrypted/compressed flags.
//!
//! # Quick Start
//!
//! ```rust
//! use gobs::{GobsReader, GobsWriter, Options};
//!
//! let mut writer = GobsWriter::new(Options::default());
//! writer.push(&("hello", 42u32))?;
//! let file = writer.finish();
//!
//! let mut reader = GobsReader::open(file)?;
//! let value: Option<(String, u32)> = reader.next_value()?;
//! assert_eq!(value, Some(("hello".to_string(), 42)));
//! # Ok::<(), gobs::Error>(())
//! ```
//!
//! # Features
//!
//! - **Parallel prefix computation** - size, checksum and timestamp are
//!   computed as a three-way fork-join
//! - **Zero-copy decoding** - verified payloads are slices of the input buffer
//! - **Pluggable serialization** - any engine behind [`PayloadCodec`]
//! - **`json`** - enables [`JsonCodec`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod container;
pub mod format;
pub mod payload;

pub use container::{GobsReader, GobsWriter, Options};
pub use format::{
    Error, FILE_EXTENSION, FILE_HEADER_SIZE, FORMAT_VERSION, FileHeader, Flags, Frame,
    FramePrefix, MAGIC, MAX_DATA_BYTES, PREFIX_SIZE, Result, build_prefix,
};
#[cfg(feature = "json")]
pub use payload::JsonCodec;
pub use payload::{BincodeCodec, PayloadCodec};
