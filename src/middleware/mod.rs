//! Middleware and the continuation that drives the chain.
//!
//! A middleware is any async function taking the request [`Context`] and a
//! [`Next`] continuation:
//!
//! ```rust
//! use canopy::{Context, Error, Next, Response};
//! use http::StatusCode;
//!
//! async fn require_auth(ctx: Context, next: Next) -> Result<(), Error> {
//!     if ctx.header("authorization").is_none() {
//!         ctx.send(Response::status(StatusCode::UNAUTHORIZED));
//!         return Ok(());
//!     }
//!     next.run(ctx).await
//! }
//! ```
//!
//! Calling `next.run(ctx)` runs everything downstream (the remaining
//! middleware, then the handler) and resolves once all of it has completed,
//! so code after the `.await` runs on the way back out. Not calling it
//! short-circuits the chain: nothing downstream runs, including the handler.
//! `run` consumes `Next`, so a middleware cannot resume the chain twice.

use std::future::Future;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler};

mod trace;

pub use trace::trace;

#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, ctx: Context, next: Next) -> BoxFuture<Result<(), Error>>;
}

/// A type-erased middleware shared across concurrent requests.
#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware function.
///
/// Satisfied by any `async fn` (or closure returning a future) with the
/// signature:
///
/// ```text
/// async fn name(ctx: Context, next: Next) -> Result<(), Error>
/// ```
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
}

impl<F, Fut> Middleware for F
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Context, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    fn call(&self, ctx: Context, next: Next) -> BoxFuture<Result<(), Error>> {
        Box::pin((self.0)(ctx, next))
    }
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The continuation of a middleware chain.
///
/// Each `Next` carries its own position in the chain by value; the chain and
/// the terminal handler are shared, immutable, and per request.
pub struct Next {
    chain: Arc<[BoxedMiddleware]>,
    cursor: usize,
    handler: BoxedHandler,
}

impl Next {
    pub(crate) fn new(chain: Arc<[BoxedMiddleware]>, handler: BoxedHandler) -> Self {
        Self { chain, cursor: 0, handler }
    }

    /// Runs the rest of the chain: the next middleware if there is one,
    /// otherwise the handler, whose return value finalizes the response
    /// unless something downstream already sent one.
    pub fn run(self, ctx: Context) -> BoxFuture<Result<(), Error>> {
        Box::pin(async move {
            let middleware = self.chain.get(self.cursor).cloned();
            match middleware {
                Some(middleware) => {
                    let next = Self { cursor: self.cursor + 1, ..self };
                    middleware.call(ctx, next).await
                }
                None => {
                    let response = ctx.response().clone();
                    let reply = self.handler.call(ctx).await?;
                    if response.is_sent() {
                        return Ok(());
                    }
                    response.send(reply.into_response()?);
                    Ok(())
                }
            }
        })
    }

    /// Number of middleware still to run before the handler.
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.cursor)
    }
}
