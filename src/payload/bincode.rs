use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PayloadCodec;
use crate::format::{Error, Result};

/// Bincode payload engine (default)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl BincodeCodec {
    const NAME: &'static str = "bincode";
}

impl PayloadCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        ::bincode::serialize(value).map_err(|source| Error::Encode {
            codec: Self::NAME,
            source,
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        ::bincode::deserialize(bytes).map_err(|source| Error::Decode {
            codec: Self::NAME,
            source,
        })
    }
}
