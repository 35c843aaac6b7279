//! Response buffering and encoding.
//!
//! # Responsibilities
//! - Buffer status, headers and body written by handlers
//! - Encode the closed set of payload kinds (text, JSON, HTML, bytes)
//! - Convert the buffered response into an axum response
//!
//! # Design Decisions
//! - Handlers write into a buffer; nothing reaches the socket until the
//!   chain has finished, so an abort can replace a half-written body
//! - Last status set wins

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
pub const APPLICATION_JSON: &str = "application/json";

/// A response body together with its encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(serde_json::Value),
    Html(String),
    Bytes(Bytes),
}

impl Payload {
    /// Content type for the payload, if it implies one.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Payload::Text(_) => Some(TEXT_PLAIN),
            Payload::Json(_) => Some(APPLICATION_JSON),
            Payload::Html(_) => Some(TEXT_HTML),
            Payload::Bytes(_) => None,
        }
    }

    /// Encode the payload into body bytes.
    pub fn into_bytes(self) -> Result<Bytes, serde_json::Error> {
        match self {
            Payload::Text(text) | Payload::Html(text) => Ok(Bytes::from(text)),
            Payload::Json(value) => {
                let mut encoded = serde_json::to_vec(&value)?;
                encoded.push(b'\n');
                Ok(Bytes::from(encoded))
            }
            Payload::Bytes(bytes) => Ok(bytes),
        }
    }
}

/// Buffered response sink handed to handlers through the context.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Append bytes to the body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Drop the buffered body and content type; other headers survive.
    pub fn discard_body(&mut self) {
        self.body.clear();
        self.headers.remove(header::CONTENT_TYPE);
    }

    /// Build the final axum response.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_content_types() {
        assert_eq!(Payload::Text("a".into()).content_type(), Some(TEXT_PLAIN));
        assert_eq!(
            Payload::Json(serde_json::json!({})).content_type(),
            Some(APPLICATION_JSON)
        );
        assert_eq!(Payload::Html("<p></p>".into()).content_type(), Some(TEXT_HTML));
        assert_eq!(Payload::Bytes(Bytes::new()).content_type(), None);
    }

    #[test]
    fn test_json_payload_is_newline_terminated() {
        let bytes = Payload::Json(serde_json::json!({"message": "hi"}))
            .into_bytes()
            .unwrap();
        assert_eq!(&bytes[..], b"{\"message\":\"hi\"}\n");
    }

    #[test]
    fn test_writer_buffers_until_converted() {
        let mut writer = ResponseWriter::new();
        writer.set_status(StatusCode::CREATED);
        writer.set_header(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        writer.write(b"hello ");
        writer.write(b"world");
        assert_eq!(writer.body(), b"hello world");

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_PLAIN);
    }

    #[test]
    fn test_discard_body() {
        let mut writer = ResponseWriter::new();
        writer.set_header(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML));
        writer.set_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc"),
        );
        writer.write(b"partial");
        writer.discard_body();
        assert!(writer.body().is_empty());
        assert!(writer.headers().get(header::CONTENT_TYPE).is_none());
        assert_eq!(writer.headers()["x-request-id"], "abc");
    }
}
