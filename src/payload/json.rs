use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PayloadCodec;
use crate::format::{Error, Result};

/// JSON payload engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl JsonCodec {
    const NAME: &'static str = "json";
}

impl PayloadCodec for JsonCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|err| Error::Encode {
            codec: Self::NAME,
            source: Box::new(err),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|err| Error::Decode {
            codec: Self::NAME,
            source: Box::new(err),
        })
    }
}
