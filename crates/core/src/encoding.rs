//! Wire encoding helpers
//!
//! Byte payloads are carried as standard base64 strings in serialized
//! records, so a JSON consumer never sees a raw integer array.

/// `#[serde(with = "...")]` adapter for `bytes::Bytes` as base64 text.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a base64 string
    pub fn serialize<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    /// Deserialize bytes from a base64 string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
