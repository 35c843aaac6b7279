//! Per-request context and chain driver.
//!
//! # Responsibilities
//! - Expose the request (method, path, headers, query, form, body)
//! - Hold path variables bound by routing
//! - Drive the handler chain: [`Context::next`] and [`Context::abort`]
//! - Offer response helpers over the buffered [`ResponseWriter`]
//!
//! # Design Decisions
//! - One context per request, owned by the worker serving it
//! - `index` is the position of the next handler to run
//! - Abort jumps `index` to the end of the chain, so no later `next` call
//!   can run anything

use std::time::Instant;

use axum::body::Bytes;
use axum::http::{header, request, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use serde::Serialize;

use crate::http::chain::{BoxedHandler, ChainState, Flow};
use crate::http::request::{self as req, X_REQUEST_ID};
use crate::http::response::{Payload, ResponseWriter, TEXT_PLAIN};
use crate::routing::Params;

/// State of a single request while it travels through its handler chain.
pub struct Context {
    request_id: String,
    method: Method,
    path: String,
    head: request::Parts,
    body: Bytes,
    started_at: Instant,

    params: Params,
    full_path: Option<String>,
    writer: ResponseWriter,

    handlers: Vec<BoxedHandler>,
    index: usize,
    state: ChainState,
}

impl Context {
    /// Create a context from a request head and its buffered body.
    pub fn new(head: request::Parts, body: Bytes) -> Self {
        let request_id = req::request_id(&head.headers);
        let mut writer = ResponseWriter::new();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            writer.set_header(HeaderName::from_static(X_REQUEST_ID), value);
        }

        Self {
            method: head.method.clone(),
            path: req::decode_path(head.uri.path()).into_owned(),
            request_id,
            head,
            body,
            started_at: Instant::now(),
            params: Params::new(),
            full_path: None,
            writer,
            handlers: Vec::new(),
            index: 0,
            state: ChainState::NotStarted,
        }
    }

    /// Create a context from a complete request.
    pub fn from_request(request: Request<Bytes>) -> Self {
        let (head, body) = request.into_parts();
        Self::new(head, body)
    }

    // --- Chain ---

    /// Replace the handler chain. Only meaningful before the chain starts.
    pub fn set_handlers(&mut self, handlers: Vec<BoxedHandler>) {
        self.handlers = handlers;
        self.index = 0;
        self.state = ChainState::NotStarted;
    }

    /// Run the chain from the current position.
    ///
    /// Keeps running handlers for as long as each returns
    /// [`Flow::Continue`]. Returns the flow that ended the run: the
    /// stopping handler's own flow, or [`Flow::Handled`] once the end of the
    /// chain is reached.
    pub fn next(&mut self) -> Flow {
        if self.state.is_finished() {
            return self.finished_flow();
        }
        self.state = ChainState::Running;

        while self.index < self.handlers.len() {
            let handler = self.handlers[self.index].clone();
            self.index += 1;

            match handler.call(self) {
                Flow::Continue => {
                    // The handler may have driven the rest of the chain itself.
                    if self.state.is_finished() {
                        return self.finished_flow();
                    }
                }
                Flow::Handled => {
                    if self.state == ChainState::Running {
                        self.state = if self.index >= self.handlers.len() {
                            ChainState::Completed
                        } else {
                            ChainState::Halted
                        };
                    }
                    return self.finished_flow();
                }
                Flow::Aborted => {
                    if self.state != ChainState::Aborted {
                        self.index = self.handlers.len();
                        self.state = ChainState::Aborted;
                    }
                    return Flow::Aborted;
                }
            }
        }

        self.state = ChainState::Completed;
        Flow::Handled
    }

    /// Stop the chain and answer with `{"message": message}`.
    ///
    /// Anything already buffered in the body is discarded.
    pub fn abort(&mut self, status: StatusCode, message: impl Into<String>) -> Flow {
        let message = message.into();
        tracing::debug!(
            request_id = %self.request_id,
            status = status.as_u16(),
            message = %message,
            "Chain aborted"
        );

        self.index = self.handlers.len();
        self.state = ChainState::Aborted;
        self.writer.discard_body();
        self.render(status, Payload::Json(serde_json::json!({ "message": message })));
        Flow::Aborted
    }

    pub fn chain_state(&self) -> ChainState {
        self.state
    }

    pub fn is_aborted(&self) -> bool {
        self.state == ChainState::Aborted
    }

    fn finished_flow(&self) -> Flow {
        if self.state == ChainState::Aborted {
            Flow::Aborted
        } else {
            Flow::Handled
        }
    }

    // --- Request ---

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// First value of a request header, if it is valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// When the context was created.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Decoded value of a query string parameter.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.head.uri.query()?;
        req::form_value(query.as_bytes(), key)
    }

    /// Decoded value of a url-encoded form field from the body.
    pub fn post_form(&self, key: &str) -> Option<String> {
        if !req::is_form(&self.head.headers) {
            return None;
        }
        req::form_value(&self.body, key)
    }

    // --- Routing ---

    /// Record the matched pattern and its path variables.
    pub fn bind_route(&mut self, pattern: &str, params: Params) {
        self.full_path = Some(pattern.to_string());
        self.params = params;
    }

    /// Value bound to a `:name` or `*name` segment.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered pattern that matched, if any route did.
    pub fn full_path(&self) -> Option<&str> {
        self.full_path.as_deref()
    }

    // --- Response ---

    pub fn status_code(&self) -> StatusCode {
        self.writer.status()
    }

    pub fn status(&mut self, status: StatusCode) {
        self.writer.set_status(status);
    }

    /// Set a response header. Invalid names or values are logged and skipped.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => self.writer.set_header(name, value),
            _ => tracing::warn!(
                request_id = %self.request_id,
                header = %name,
                "Skipping invalid response header"
            ),
        }
    }

    pub fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    /// Write `payload` with `status` and its content type.
    pub fn render(&mut self, status: StatusCode, payload: Payload) {
        let content_type = payload.content_type();
        match payload.into_bytes() {
            Ok(bytes) => {
                if let Some(content_type) = content_type {
                    self.writer
                        .set_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                self.writer.set_status(status);
                self.writer.write(&bytes);
            }
            Err(e) => self.encoding_failed(&e),
        }
    }

    /// Replace the response with a plain-text 500 carrying `error`.
    fn encoding_failed(&mut self, error: &serde_json::Error) {
        tracing::error!(request_id = %self.request_id, error = %error, "Failed to encode response");
        self.writer.discard_body();
        self.writer
            .set_header(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        self.writer.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        self.writer.write(error.to_string().as_bytes());
    }

    pub fn string(&mut self, status: StatusCode, text: impl Into<String>) {
        self.render(status, Payload::Text(text.into()));
    }

    /// Serialize `value` as JSON. Serialization failure answers 500.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => self.render(status, Payload::Json(value)),
            Err(e) => self.encoding_failed(&e),
        }
    }

    pub fn html(&mut self, status: StatusCode, markup: impl Into<String>) {
        self.render(status, Payload::Html(markup.into()));
    }

    pub fn data(&mut self, status: StatusCode, bytes: impl Into<Bytes>) {
        self.render(status, Payload::Bytes(bytes.into()));
    }

    /// Finish the request, yielding the buffered response.
    pub fn into_response(self) -> Response {
        self.writer.into_response()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::chain::boxed;
    use std::sync::{Arc, Mutex};

    type Trace = Arc<Mutex<Vec<&'static str>>>;

    fn context(method: &str, uri: &str) -> Context {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap();
        Context::from_request(request)
    }

    fn step(trace: &Trace, name: &'static str, flow: Flow) -> BoxedHandler {
        let trace = trace.clone();
        boxed(move |_: &mut Context| {
            trace.lock().unwrap().push(name);
            flow
        })
    }

    fn body_json(ctx: &Context) -> serde_json::Value {
        serde_json::from_slice(ctx.writer().body()).unwrap()
    }

    #[test]
    fn test_chain_runs_in_order_once() {
        let trace = Trace::default();
        let mut ctx = context("GET", "/");
        ctx.set_handlers(vec![
            step(&trace, "m1", Flow::Continue),
            step(&trace, "m2", Flow::Continue),
            step(&trace, "h", Flow::Handled),
        ]);

        assert_eq!(ctx.chain_state(), ChainState::NotStarted);
        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(*trace.lock().unwrap(), vec!["m1", "m2", "h"]);
        assert_eq!(ctx.chain_state(), ChainState::Completed);

        // Driving a finished chain again runs nothing.
        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(trace.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_terminal_continue_completes_chain() {
        let trace = Trace::default();
        let mut ctx = context("GET", "/");
        ctx.set_handlers(vec![step(&trace, "h", Flow::Continue)]);
        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(ctx.chain_state(), ChainState::Completed);
    }

    #[test]
    fn test_abort_short_circuits() {
        let trace = Trace::default();
        let mut ctx = context("GET", "/admin");
        let t = trace.clone();
        ctx.set_handlers(vec![
            boxed(move |ctx: &mut Context| {
                t.lock().unwrap().push("m1");
                ctx.abort(StatusCode::FORBIDDEN, "denied")
            }),
            step(&trace, "m2", Flow::Continue),
            step(&trace, "h", Flow::Handled),
        ]);

        assert_eq!(ctx.next(), Flow::Aborted);
        assert_eq!(*trace.lock().unwrap(), vec!["m1"]);
        assert_eq!(ctx.status_code(), StatusCode::FORBIDDEN);
        assert!(ctx.is_aborted());
        assert_eq!(body_json(&ctx), serde_json::json!({"message": "denied"}));
        assert_eq!(ctx.writer().headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_handler_that_stops_halts_chain() {
        let trace = Trace::default();
        let mut ctx = context("GET", "/");
        ctx.set_handlers(vec![
            step(&trace, "m1", Flow::Handled),
            step(&trace, "h", Flow::Handled),
        ]);

        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(*trace.lock().unwrap(), vec!["m1"]);
        assert_eq!(ctx.chain_state(), ChainState::Halted);
        assert_eq!(ctx.status_code(), StatusCode::OK);
        assert!(ctx.writer().body().is_empty());
    }

    #[test]
    fn test_inline_next_wraps_downstream() {
        let trace = Trace::default();
        let mut ctx = context("GET", "/");
        let t = trace.clone();
        ctx.set_handlers(vec![
            boxed(move |ctx: &mut Context| {
                t.lock().unwrap().push("before");
                let flow = ctx.next();
                t.lock().unwrap().push("after");
                flow
            }),
            step(&trace, "h", Flow::Handled),
        ]);

        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(*trace.lock().unwrap(), vec!["before", "h", "after"]);
        assert_eq!(ctx.chain_state(), ChainState::Completed);
    }

    #[test]
    fn test_inline_next_then_continue_does_not_resume_halted_chain() {
        let trace = Trace::default();
        let mut ctx = context("GET", "/");
        let t = trace.clone();
        ctx.set_handlers(vec![
            boxed(move |ctx: &mut Context| {
                t.lock().unwrap().push("wrap");
                ctx.next();
                Flow::Continue
            }),
            step(&trace, "stop", Flow::Handled),
            step(&trace, "h", Flow::Handled),
        ]);

        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(*trace.lock().unwrap(), vec!["wrap", "stop"]);
        assert_eq!(ctx.chain_state(), ChainState::Halted);
    }

    #[test]
    fn test_abort_seen_through_wrapping_middleware() {
        let mut ctx = context("GET", "/");
        ctx.set_handlers(vec![
            boxed(|ctx: &mut Context| ctx.next()),
            boxed(|ctx: &mut Context| ctx.abort(StatusCode::UNAUTHORIZED, "no token")),
        ]);
        assert_eq!(ctx.next(), Flow::Aborted);
        assert_eq!(ctx.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_abort_replaces_partial_body() {
        let mut ctx = context("GET", "/");
        ctx.set_handlers(vec![boxed(|ctx: &mut Context| {
            ctx.html(StatusCode::OK, "<p>half");
            ctx.abort(StatusCode::BAD_REQUEST, "bad input")
        })]);
        ctx.next();
        assert_eq!(ctx.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&ctx), serde_json::json!({"message": "bad input"}));
    }

    #[test]
    fn test_empty_chain_completes() {
        let mut ctx = context("GET", "/");
        assert_eq!(ctx.next(), Flow::Handled);
        assert_eq!(ctx.chain_state(), ChainState::Completed);
    }

    #[test]
    fn test_query_and_form() {
        let request = Request::builder()
            .method("POST")
            .uri("/login?next=%2Fhome&lang=go")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from_static(b"user=geek&pass=s3cret"))
            .unwrap();
        let ctx = Context::from_request(request);

        assert_eq!(ctx.path(), "/login");
        assert_eq!(ctx.query("next").as_deref(), Some("/home"));
        assert_eq!(ctx.query("lang").as_deref(), Some("go"));
        assert_eq!(ctx.query("user"), None);
        assert_eq!(ctx.post_form("user").as_deref(), Some("geek"));
        assert_eq!(ctx.post_form("pass").as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_form_requires_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .body(Bytes::from_static(b"user=geek"))
            .unwrap();
        assert_eq!(Context::from_request(request).post_form("user"), None);
    }

    #[test]
    fn test_response_helpers() {
        let mut ctx = context("GET", "/");
        ctx.string(StatusCode::OK, "hello");
        assert_eq!(ctx.writer().body(), b"hello");
        assert_eq!(ctx.writer().headers()[header::CONTENT_TYPE], "text/plain");

        let mut ctx = context("GET", "/");
        ctx.json(StatusCode::CREATED, &serde_json::json!({"id": 1}));
        assert_eq!(ctx.status_code(), StatusCode::CREATED);
        assert_eq!(body_json(&ctx), serde_json::json!({"id": 1}));

        let mut ctx = context("GET", "/");
        ctx.set_header("X-Powered-By", "waypoint");
        ctx.set_header("bad header", "ignored");
        ctx.data(StatusCode::OK, &b"\x00\x01"[..]);
        assert_eq!(ctx.writer().headers()["x-powered-by"], "waypoint");
        assert_eq!(ctx.writer().headers().len(), 2);
    }

    #[test]
    fn test_json_serialization_failure_answers_500() {
        use std::collections::HashMap;

        let mut ctx = context("GET", "/");
        ctx.html(StatusCode::OK, "<p>partial");

        let mut value = HashMap::new();
        value.insert(vec![1u8, 2], 1);
        ctx.json(StatusCode::OK, &value);

        assert_eq!(ctx.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ctx.writer().headers()[header::CONTENT_TYPE], "text/plain");
        let body = String::from_utf8(ctx.writer().body().to_vec()).unwrap();
        assert!(!body.contains("partial"));
        assert!(body.contains("key must be a string"), "{body}");
    }

    #[test]
    fn test_path_is_percent_decoded() {
        let ctx = context("GET", "/p/go%20lang/doc?q=a%20b");
        assert_eq!(ctx.path(), "/p/go lang/doc");
        assert_eq!(ctx.query("q").as_deref(), Some("a b"));
    }

    #[test]
    fn test_request_id_echoed() {
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(Bytes::new())
            .unwrap();
        let ctx = Context::from_request(request);
        assert_eq!(ctx.request_id(), "abc-123");
        assert_eq!(ctx.into_response().headers()[X_REQUEST_ID], "abc-123");
    }

    #[test]
    fn test_bind_route() {
        let mut ctx = context("GET", "/p/go/doc");
        let mut params = Params::new();
        params.insert("lang".to_string(), "go".to_string());
        ctx.bind_route("/p/:lang/doc", params);
        assert_eq!(ctx.param("lang"), Some("go"));
        assert_eq!(ctx.param("missing"), None);
        assert_eq!(ctx.full_path(), Some("/p/:lang/doc"));
    }
}
