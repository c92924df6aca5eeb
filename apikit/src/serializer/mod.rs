//! Pluggable response serialization
//!
//! A [`Serializer`] pairs a media type with an encoder and decoder. The
//! typed operations (`decode`, `encode`, `write`) live on [`SerializerExt`],
//! which is implemented for every serializer including `dyn Serializer`, so
//! implementations can be stored in a [`SerializerRegistry`] and picked per
//! request.
//!
//! # Response policy
//!
//! [`SerializerExt::write`] maps a payload and an error to a response:
//!
//! | error | payload | status | body |
//! |---|---|---|---|
//! | none | none | 204 No Content | empty |
//! | some | any | the error's code | the encoded payload, empty if none |
//! | none | some | 200 OK | the encoded payload |
//!
//! The `Content-Type` header is set to [`Serializer::media_type`] on every path.
//!
//! # Example
//!
//! ```rust
//! use apikit::serializer::{Json, SerializerExt};
//! use axum::http::{header, StatusCode};
//!
//! let response = Json.write(Some(&vec![1, 2, 3]), None).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
//!
//! let empty = Json.write::<()>(None, None).unwrap();
//! assert_eq!(empty.status(), StatusCode::NO_CONTENT);
//! ```

mod envelope;
mod form;
mod json;
mod registry;

use std::fmt;
use std::io::{Read, Write};

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::api_error::ApiError;
use crate::error::{Error, Result};

pub use envelope::Envelope;
pub use form::{Form, MEDIA_TYPE_FORM};
pub use json::{Json, MEDIA_TYPE_JSON};
pub use registry::SerializerRegistry;

/// A wire format for API payloads
///
/// Implementations work on [`serde_json::Value`] so the trait stays object
/// safe; typed access goes through [`SerializerExt`].
pub trait Serializer: fmt::Debug + Send + Sync {
    /// Content type produced and consumed, e.g. `application/json`
    fn media_type(&self) -> &'static str;

    /// Short format name accepted in the `format` query parameter
    fn name(&self) -> &'static str;

    /// Read one value from the reader
    fn decode_value(&self, reader: &mut dyn Read) -> Result<serde_json::Value>;

    /// Encode one value to bytes
    fn encode_value(&self, value: &serde_json::Value) -> Result<Vec<u8>>;
}

/// Typed operations available on every [`Serializer`]
pub trait SerializerExt: Serializer {
    /// Decode the reader into `T`, consuming and dropping the reader
    ///
    /// Decoding errors are returned unchanged.
    fn decode<T, R>(&self, mut reader: R) -> Result<T>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let value = self.decode_value(&mut reader)?;
        drop(reader);
        Ok(serde_json::from_value(value)?)
    }

    /// Encode `value` into a byte buffer
    fn to_vec<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(Error::JsonEncode)?;
        self.encode_value(&value)
    }

    /// Encode `value` and write it to `writer`
    ///
    /// The value is fully encoded before anything is written, so an encoding
    /// error leaves the writer untouched.
    fn encode<T, W>(&self, writer: &mut W, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
        W: Write + ?Sized,
    {
        let bytes = self.to_vec(value)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Build the response for a payload and an optional error
    ///
    /// Fails only when the payload cannot be encoded.
    fn write<T>(&self, payload: Option<&T>, error: Option<&ApiError>) -> Result<Response>
    where
        T: Serialize,
    {
        let (status, body) = match (error, payload) {
            (None, None) => (StatusCode::NO_CONTENT, Vec::new()),
            (Some(error), payload) => {
                let body = match payload {
                    Some(payload) => self.to_vec(payload)?,
                    None => Vec::new(),
                };
                (error.code, body)
            }
            (None, Some(payload)) => (StatusCode::OK, self.to_vec(payload)?),
        };

        let response = Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, HeaderValue::from_static(self.media_type()))
            .body(Body::from(body))?;
        Ok(response)
    }
}

impl<S: Serializer + ?Sized> SerializerExt for S {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Message {
        message: String,
    }

    async fn body(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn content_types(response: &Response) -> Vec<&HeaderValue> {
        response.headers().get_all(header::CONTENT_TYPE).iter().collect()
    }

    #[tokio::test]
    async fn test_write_no_content() {
        let response = Json.write::<Message>(None, None).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(content_types(&response), vec!["application/json"]);
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_write_payload() {
        let payload = Message {
            message: "yes".to_string(),
        };
        let response = Json.write(Some(&payload), None).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_types(&response), vec!["application/json"]);

        let mut expected = serde_json::to_vec(&payload).unwrap();
        expected.push(b'\n');
        assert_eq!(body(response).await, expected);
    }

    #[tokio::test]
    async fn test_write_error_uses_error_code_and_payload_body() {
        let error = ApiError::new(StatusCode::UNPROCESSABLE_ENTITY);
        let payload = Message {
            message: "partial".to_string(),
        };
        let response = Json.write(Some(&payload), Some(&error)).unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(content_types(&response), vec!["application/json"]);
        assert_eq!(body(response).await, b"{\"message\":\"partial\"}\n");
    }

    #[tokio::test]
    async fn test_write_error_without_payload_has_empty_body() {
        let error = ApiError::bad_request("bad");
        let response = Json.write::<Message>(None, Some(&error)).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(content_types(&response), vec!["application/json"]);
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_write_through_trait_object() {
        let serializer: Arc<dyn Serializer> = Arc::new(Form);
        let response = serializer.write(Some(&serde_json::json!({"a": "1"})), None).unwrap();
        assert_eq!(content_types(&response), vec![MEDIA_TYPE_FORM]);
        assert_eq!(body(response).await, b"a=1");
    }

    #[test]
    fn test_write_encoding_failure() {
        // Form cannot encode a bare number
        assert!(Form.write(Some(&5), None).is_err());
    }

    #[test]
    fn test_decode() {
        let message: Message = Json.decode(&b"{\"message\":\"hi\"}"[..]).unwrap();
        assert_eq!(message.message, "hi");
    }

    #[test]
    fn test_decode_error_propagates() {
        let result: Result<Message> = Json.decode(&b"{\"message\":1}"[..]);
        assert!(matches!(result, Err(crate::Error::JsonDecode(_))));
    }

    #[test]
    fn test_encode_does_not_write_on_error() {
        let mut out = b"header;".to_vec();
        assert!(Form.encode(&mut out, &vec![1, 2]).is_err());
        assert_eq!(out, b"header;");

        Json.encode(&mut out, &true).unwrap();
        assert_eq!(out, b"header;true\n");
    }
}
