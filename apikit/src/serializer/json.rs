//! JSON serialization

use std::io::Read;

use serde::Deserialize;

use super::Serializer;
use crate::error::{Error, Result};

/// Media type produced by [`Json`]
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// JSON serializer
///
/// Every encoded value is followed by a newline. Decoding reads the first
/// value from the reader and ignores anything after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Serializer for Json {
    fn media_type(&self) -> &'static str {
        MEDIA_TYPE_JSON
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn decode_value(&self, reader: &mut dyn Read) -> Result<serde_json::Value> {
        let mut deserializer = serde_json::Deserializer::from_reader(reader);
        Ok(serde_json::Value::deserialize(&mut deserializer)?)
    }

    fn encode_value(&self, value: &serde_json::Value) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(value).map_err(Error::JsonEncode)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::SerializerExt;

    #[test]
    fn test_media_type() {
        // Hardcoded in case the constant is changed
        assert_eq!(Json.media_type(), "application/json");
        assert_eq!(Json.name(), "json");
    }

    #[test]
    fn test_encode_appends_newline() {
        let bytes = Json.to_vec(&serde_json::json!({"message": "yes"})).unwrap();
        assert_eq!(bytes, b"{\"message\":\"yes\"}\n");
    }

    #[test]
    fn test_decode_value() {
        let mut input = &b" {\"ids\": [1, 2]}\n"[..];
        let value = Json.decode_value(&mut input).unwrap();
        assert_eq!(value, serde_json::json!({"ids": [1, 2]}));
    }

    #[test]
    fn test_decode_reads_first_value_only() {
        let mut input = &b"{\"a\":1} {\"b\":2} trailing"[..];
        let value = Json.decode_value(&mut input).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_decode_empty_input_fails() {
        let mut input = &b""[..];
        assert!(matches!(
            Json.decode_value(&mut input),
            Err(Error::JsonDecode(e)) if e.is_eof()
        ));
    }

    #[derive(serde::Serialize)]
    struct Person {
        name: &'static str,
        id: i64,
    }

    #[test]
    fn test_encode_keeps_field_order() {
        let person = Person { name: "a", id: 1 };
        let bytes = Json.to_vec(&person).unwrap();
        assert_eq!(bytes, b"{\"name\":\"a\",\"id\":1}\n");

        let mut expected = serde_json::to_vec(&person).unwrap();
        expected.push(b'\n');
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_encode_failure_is_encode_error() {
        let map = std::collections::BTreeMap::from([(vec![1], 1)]);
        assert!(matches!(Json.to_vec(&map), Err(Error::JsonEncode(_))));
    }
}
