//! # Payload Codecs
//!
//! Serialization engines that turn a value into frame payload bytes and back.
//!
//! The container never looks inside a payload: a codec's output is framed as
//! is, and a codec only ever sees bytes that already passed the frame
//! checksum. Any engine can be plugged in by implementing [`PayloadCodec`].
//!
//! - **Bincode** (default): compact binary, fastest
//! - **JSON** (`json` feature): human-readable, for debugging and interop

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::format::Result;

mod bincode;
#[cfg(feature = "json")]
mod json;

pub use self::bincode::BincodeCodec;
#[cfg(feature = "json")]
pub use self::json::JsonCodec;

/// Capability interface over a serialization engine
pub trait PayloadCodec {
    /// Engine name, used in error messages
    fn name(&self) -> &'static str;

    /// Serialize a value to payload bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Encode`] carrying the engine's error when the
    /// value cannot be represented.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize a value from payload bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] carrying the engine's error on
    /// malformed or mismatched input.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

impl<C: PayloadCodec + ?Sized> PayloadCodec for &C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        (**self).encode(value)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        (**self).decode(bytes)
    }
}
