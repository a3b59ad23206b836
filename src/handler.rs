//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The route tree holds handlers of *different* types side by side in its
//! endpoints. Rust collections can only hold one concrete type, so handlers
//! are hidden behind a trait object (`dyn ErasedHandler`) and stored
//! uniformly.
//!
//! ```text
//! async fn show(ctx: Context) -> Json<User> { … }   ← user writes this
//!        ↓ group.get("/:id", show)
//! show.into_boxed_handler()                        ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(show))                        ← stored as BoxedHandler
//!        ↓
//! handler.call(ctx)  once the middleware chain is exhausted
//!        ↓
//! Box::pin(async { show(ctx).await.into_reply() }) ← BoxFuture
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::reply::{IntoReply, Reply};

/// A heap-allocated, type-erased future.
///
/// `Send + 'static` lets tokio move the future across worker threads.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, ctx: Context) -> BoxFuture<Result<Reply, Error>>;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is satisfied by any `async fn` (or
/// closure returning a future) with the signature:
///
/// ```text
/// async fn name(ctx: Context) -> impl IntoReply
/// ```
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoReply + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<Result<Reply, Error>> {
        let fut = (self.0)(ctx);
        Box::pin(async move { fut.await.into_reply() })
    }
}
