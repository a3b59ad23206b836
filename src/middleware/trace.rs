//! Per-request tracing span with method, path, status and latency.
//!
//! The span also records the HTTP version and how many middleware sit
//! between it and the handler.

use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};

use crate::context::Context;
use crate::error::Error;
use crate::middleware::Next;

/// Wraps the rest of the chain in a `request` span and logs the outcome.
///
/// Attach it to the tree root to cover every matched route:
///
/// ```rust,no_run
/// use canopy::{RouteTree, middleware};
///
/// let tree = RouteTree::new().middleware(middleware::trace);
/// ```
pub async fn trace(ctx: Context, next: Next) -> Result<(), Error> {
    let span = info_span!(
        "request",
        method = %ctx.method(),
        path = ctx.path(),
        version = ?ctx.head().version,
        middleware = next.remaining(),
    );
    let response = ctx.response().clone();
    let started = Instant::now();

    let result = next.run(ctx).instrument(span.clone()).await;

    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    span.in_scope(|| match (&result, response.status()) {
        (Err(e), _) => warn!(latency_ms, error = %e, "request failed"),
        (Ok(()), Some(status)) => info!(latency_ms, status = status.as_u16(), "request completed"),
        (Ok(()), None) => info!(latency_ms, "request completed without a response"),
    });
    result
}
