//! Outgoing HTTP response type and the per-request response slot.
//!
//! A request's response is finalized exactly once. Middleware and handlers
//! never return a response up the chain; they [`send`](ResponseHandle::send)
//! it into the request's [`ResponseHandle`], and the first send wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use tracing::warn;

use crate::error::Error;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use canopy::Response;
/// use http::StatusCode;
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use canopy::Response;
/// use http::StatusCode;
///
/// Response::builder()
///     .status(StatusCode::UNAUTHORIZED)
///     .header("www-authenticate", "Bearer")
///     .json(br#"{"error":"Unauthorized"}"#.to_vec());
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Response {
    /// `200 OK` with an `application/json` body.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` with a `text/plain; charset=utf-8` body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { status: code, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// `200 OK` with an empty body and no content-type.
    pub fn empty() -> Self {
        Self::status(StatusCode::OK)
    }

    /// Serializes `value` as JSON under the given status.
    pub fn payload<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::builder().status(status).json(body))
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Converts into the `http` response type served by hyper.
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Appends a header. Invalid names or values are dropped with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!(header = name, "dropping invalid response header"),
        }
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.finish(JSON, body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT, Bytes::from(body.into()))
    }

    /// Terminate with no body (e.g. `204 No Content`, redirects).
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Bytes::new() }
    }

    fn finish(mut self, content_type: &'static str, body: Bytes) -> Response {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Response { status: self.status, headers: self.headers, body }
    }
}

// ── ResponseHandle ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Open,
    Sent(Response),
    Taken(StatusCode),
}

/// The per-request response slot.
///
/// Cloning is cheap and every clone points at the same slot, so a middleware
/// can keep a handle across `next.run(ctx)` and inspect what downstream code
/// sent. The slot accepts exactly one response.
#[derive(Clone, Debug, Default)]
pub struct ResponseHandle {
    slot: Arc<Mutex<Slot>>,
}

impl ResponseHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Finalizes the response.
    ///
    /// Returns `false`, dropping `response`, if the request was already
    /// finalized.
    pub fn send(&self, response: Response) -> bool {
        let mut slot = self.lock();
        if !matches!(*slot, Slot::Open) {
            warn!(status = %response.status, "response already sent, discarding");
            return false;
        }
        *slot = Slot::Sent(response);
        true
    }

    /// Whether a response has been sent for this request.
    pub fn is_sent(&self) -> bool {
        !matches!(*self.lock(), Slot::Open)
    }

    /// Status of the sent response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match &*self.lock() {
            Slot::Open => None,
            Slot::Sent(res) => Some(res.status),
            Slot::Taken(status) => Some(*status),
        }
    }

    /// Takes the finalized response out for writing. Later sends are refused.
    pub(crate) fn take(&self) -> Option<Response> {
        let mut slot = self.lock();
        match std::mem::take(&mut *slot) {
            Slot::Sent(res) => {
                *slot = Slot::Taken(res.status);
                Some(res)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_sets_content_type() {
        let res = Response::json(r#"{"ok":true}"#);
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_TYPE], JSON);
        assert_eq!(res.body(), br#"{"ok":true}"#);
    }

    #[test]
    fn empty_response_has_no_content_type() {
        let res = Response::empty();
        assert!(res.headers().get(CONTENT_TYPE).is_none());
        assert!(res.body().is_empty());
    }

    #[test]
    fn builder_keeps_extra_headers() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/users/99")
            .header("bad header", "x")
            .text("created");
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.headers()["location"], "/users/99");
        assert_eq!(res.headers().len(), 2);
    }

    #[test]
    fn no_body_keeps_status_and_headers() {
        let res = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("cache-control", "no-store")
            .no_body();
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(res.headers()["cache-control"], "no-store");
        assert!(res.headers().get(CONTENT_TYPE).is_none());
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn into_http_carries_status_headers_and_body() {
        use http_body_util::BodyExt;

        let res = Response::builder()
            .status(StatusCode::ACCEPTED)
            .header("x-request-id", "abc")
            .json(r#"{"queued":true}"#)
            .into_http();

        assert_eq!(res.status(), StatusCode::ACCEPTED);
        assert_eq!(res.headers()[CONTENT_TYPE], JSON);
        assert_eq!(res.headers()["x-request-id"], "abc");
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"queued":true}"#);
    }

    #[test]
    fn handle_accepts_only_first_send() {
        let handle = ResponseHandle::new();
        let other = handle.clone();
        assert!(!handle.is_sent());

        assert!(other.send(Response::status(StatusCode::UNAUTHORIZED)));
        assert!(!handle.send(Response::empty()));

        assert!(handle.is_sent());
        assert_eq!(handle.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn take_closes_the_slot() {
        let handle = ResponseHandle::new();
        assert!(handle.take().is_none());
        assert!(!handle.is_sent());

        handle.send(Response::text("hi"));
        let res = handle.take().unwrap();
        assert_eq!(res.body(), b"hi");

        assert!(handle.is_sent());
        assert_eq!(handle.status(), Some(StatusCode::OK));
        assert!(!handle.send(Response::empty()));
        assert!(handle.take().is_none());
    }
}
