//! Request dispatch: one request in, exactly one response out.
//!
//! ```text
//! parse method, path, query
//!        ↓
//! resolve ── miss ──→ 404 {"error":"Not Found","path","method"}   (no middleware runs)
//!        ↓
//! read + decode body
//!        ↓
//! build Context ──→ middleware… ──→ handler
//!        ↓
//! fault and nothing sent yet ──→ 500 {"error":"Internal Server Error","message"}
//! ```

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use http::StatusCode;
use hyper::body::Body;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::body::read_body;
use crate::context::Context;
use crate::error::Error;
use crate::middleware::Next;
use crate::query::parse_query;
use crate::resolve::resolve;
use crate::response::Response;
use crate::tree::RouteTree;

/// Surfaced when a fault carries no readable message.
const FALLBACK_MESSAGE: &str = "Unknown error";

/// Routes one request through `tree` and produces its response.
///
/// Never fails: routing misses become `404`, handler and middleware faults
/// (returned errors and panics alike) become `500` unless a response was
/// already sent, in which case the sent response stands.
pub async fn dispatch<B>(tree: &RouteTree, req: http::Request<B>) -> Response
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let (head, body) = req.into_parts();
    let query = head.uri.query().map(parse_query).unwrap_or_default();

    let Some(resolution) = resolve(tree, &head.method, head.uri.path()) else {
        debug!(method = %head.method, path = head.uri.path(), "no route matched");
        return not_found(&head.method, head.uri.path());
    };

    let body = read_body(body).await;
    let handler = resolution.handler;
    let next = Next::new(resolution.middleware.into(), handler);
    let ctx = Context::new(head, resolution.params, query, body);
    let response = ctx.response().clone();

    let outcome = match AssertUnwindSafe(next.run(ctx)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(Error::from_panic(payload)),
    };

    if let Err(e) = outcome {
        if response.is_sent() {
            warn!(error = %e, "request failed after its response was sent");
        } else {
            error!(error = %e, "request failed");
            response.send(server_error(&e));
        }
    }

    response.take().unwrap_or_else(|| {
        debug!("chain finished without a response, sending empty 200");
        Response::empty()
    })
}

fn not_found(method: &http::Method, path: &str) -> Response {
    let body = json!({
        "error": "Not Found",
        "path": path,
        "method": method.as_str(),
    });
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .json(body.to_string())
}

fn server_error(err: &Error) -> Response {
    let message = err.message().unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());
    let body = json!({
        "error": "Internal Server Error",
        "message": message,
    });
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .json(body.to_string())
}
