//! URL-encoded form serialization

use std::io::Read;

use serde_json::{Map, Value};

use super::Serializer;
use crate::error::Result;

/// Media type produced by [`Form`]
pub const MEDIA_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// `application/x-www-form-urlencoded` serializer
///
/// Only flat objects encode. Decoded values are always strings; a key that
/// repeats decodes to an array of strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Form;

impl Serializer for Form {
    fn media_type(&self) -> &'static str {
        MEDIA_TYPE_FORM
    }

    fn name(&self) -> &'static str {
        "form"
    }

    fn decode_value(&self, reader: &mut dyn Read) -> Result<Value> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&raw)?;

        let mut object = Map::new();
        for (key, value) in pairs {
            match object.get_mut(&key) {
                Some(Value::Array(values)) => values.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    object.insert(key, Value::String(value));
                }
            }
        }
        Ok(Value::Object(object))
    }

    fn encode_value(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_urlencoded::to_string(value)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::serializer::SerializerExt;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Search {
        q: String,
        tag: Vec<String>,
    }

    #[test]
    fn test_media_type() {
        assert_eq!(Form.media_type(), "application/x-www-form-urlencoded");
        assert_eq!(Form.name(), "form");
    }

    #[test]
    fn test_encode_flat_object() {
        let bytes = Form
            .to_vec(&serde_json::json!({"name": "a b", "limit": 10, "active": true}))
            .unwrap();
        assert_eq!(bytes, b"name=a+b&limit=10&active=true");
    }

    #[test]
    fn test_encode_nested_fails() {
        assert!(Form.to_vec(&serde_json::json!({"a": {"b": 1}})).is_err());
    }

    #[test]
    fn test_decode_repeated_keys() {
        let search: Search = Form.decode(&b"q=rust&tag=a&tag=b"[..]).unwrap();
        assert_eq!(
            search,
            Search {
                q: "rust".to_string(),
                tag: vec!["a".to_string(), "b".to_string()],
            }
        );
    }
}
