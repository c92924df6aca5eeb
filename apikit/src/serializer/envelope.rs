//! Handler return type that serializes with a negotiated serializer

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::{Serializer, SerializerExt};
use crate::api_error::ApiError;

/// A payload, an optional error and the serializer to write them with
///
/// Rendered through [`SerializerExt::write`], so status and body follow the
/// same rules: 204 for nothing, the error's code when an error is present,
/// 200 otherwise. An encoding failure renders as the crate error response.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use apikit::serializer::{Envelope, Json};
/// use axum::{http::StatusCode, response::IntoResponse};
///
/// let response = Envelope::ok(Arc::new(Json), vec!["a", "b"]).into_response();
/// assert_eq!(response.status(), StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    /// Body to encode
    pub payload: Option<T>,
    /// Error deciding the status code
    pub error: Option<ApiError>,
    serializer: Arc<dyn Serializer>,
}

impl<T> Envelope<T> {
    /// Envelope with neither payload nor error
    pub fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self {
            payload: None,
            error: None,
            serializer,
        }
    }

    /// Envelope with a payload
    pub fn ok(serializer: Arc<dyn Serializer>, payload: T) -> Self {
        Self::new(serializer).with_payload(payload)
    }

    /// Envelope with an error
    pub fn err(serializer: Arc<dyn Serializer>, error: ApiError) -> Self {
        Self::new(serializer).with_error(error)
    }

    /// Set the payload
    #[must_use]
    pub fn with_payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Set the error, merging into one already present
    #[must_use]
    pub fn with_error(mut self, error: ApiError) -> Self {
        match self.error.as_mut() {
            Some(existing) => existing.merge(error),
            None => self.error = Some(error),
        }
        self
    }

    /// Serializer this envelope writes with
    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match self
            .serializer
            .write(self.payload.as_ref(), self.error.as_ref())
        {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::Query,
        http::{header, Request, StatusCode},
        routing::get,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;
    use crate::params::{Meta, FORMAT_KEY};
    use crate::serializer::{Form, Json, SerializerRegistry};

    #[derive(Debug, Serialize)]
    struct Item {
        id: i64,
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Lookup {
        id: i64,
    }

    async fn handler(mut meta: Meta, Query(lookup): Query<Lookup>) -> Envelope<Item> {
        let registry = SerializerRegistry::with_defaults();
        let serializer = match registry.negotiate(&meta.format(), None) {
            Ok(serializer) => serializer,
            Err(e) => {
                return Envelope::err(registry.default_serializer(), ApiError::bad_request(e.to_string()))
            }
        };

        if lookup.id == 0 {
            return Envelope::err(serializer, ApiError::not_found("no such item"));
        }
        Envelope::ok(
            serializer,
            Item {
                id: lookup.id,
                name: format!("item {}", lookup.id),
            },
        )
    }

    async fn call(uri: &str) -> (StatusCode, String, Vec<u8>) {
        let app = Router::new().route("/", get(handler));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_json_by_default() {
        let (status, content_type, body) = call("/?id=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, b"{\"id\":3,\"name\":\"item 3\"}\n");
    }

    #[tokio::test]
    async fn test_format_param_selects_form() {
        let uri = format!("/?id=3&{FORMAT_KEY}=form");
        let (status, content_type, body) = call(&uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/x-www-form-urlencoded");
        assert_eq!(body, b"id=3&name=item+3");
    }

    #[tokio::test]
    async fn test_error_without_payload() {
        let (status, content_type, body) = call("/?id=0").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type, "application/json");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_format() {
        let (status, _, _) = call("/?id=1&format=yaml").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_encoding_failure_renders_error_response() {
        // Form cannot encode a sequence
        let response = Envelope::ok(Arc::new(Form), vec![1, 2]).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "ENCODING_ERROR");
    }

    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
    struct Key {
        a: i32,
    }

    #[tokio::test]
    async fn test_json_encoding_failure_is_server_error() {
        // Struct map keys cannot become JSON object keys
        let payload = std::collections::BTreeMap::from([(Key { a: 1 }, 1)]);
        let response = Envelope::ok(Arc::new(Json), payload).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "ENCODING_ERROR");
    }

    #[test]
    fn test_with_error_merges() {
        let envelope: Envelope<()> = Envelope::new(Arc::new(Json))
            .with_error(ApiError::bad_request("first"))
            .with_error(ApiError::bad_request("second").with_field("limit", "too large"));
        let error = envelope.error.unwrap();
        assert_eq!(error.messages, vec!["first", "second"]);
        assert!(error.has_field("limit"));
    }
}
