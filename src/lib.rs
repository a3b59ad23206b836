//! # canopy
//!
//! A nested route-tree router with scoped middleware, for Rust services
//! behind a reverse proxy.
//!
//! ## The model
//!
//! Routes are declared once, as a tree: groups contribute a path prefix and
//! a middleware scope, endpoints bind a method and a path suffix to a
//! handler. At request time the tree is walked in declaration order and the
//! first matching endpoint wins. The middleware of the root and of every
//! enclosing group runs outer to inner, then the handler, and exactly one
//! response goes back to the client.
//!
//! - Segment matching: literal segments and `:name` parameters, nothing else
//! - Middleware with a continuation: work before and after `next.run(ctx)`,
//!   or short-circuit by not calling it
//! - Handler return values become JSON; errors and panics become a `500`
//! - Async I/O on tokio + hyper, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use canopy::{Context, Error, Group, Json, Next, Response, RouteTree, Server, middleware};
//! use http::StatusCode;
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let tree = RouteTree::new()
//!         .middleware(middleware::trace)
//!         .group(
//!             Group::new("/api")
//!                 .get("/health", |_ctx: Context| async { "ok" })
//!                 .group(
//!                     Group::new("/users")
//!                         .middleware(require_auth)
//!                         .get("/:id", get_user)
//!                         .post("", create_user),
//!                 ),
//!         );
//!
//!     Server::bind(([0, 0, 0, 0], 3000).into()).serve(tree).await
//! }
//!
//! async fn require_auth(ctx: Context, next: Next) -> Result<(), Error> {
//!     if ctx.header("authorization").is_none() {
//!         ctx.send(Response::status(StatusCode::UNAUTHORIZED));
//!         return Ok(());
//!     }
//!     next.run(ctx).await
//! }
//!
//! async fn get_user(ctx: Context) -> Value {
//!     json!({ "id": ctx.param("id") })
//! }
//!
//! async fn create_user(ctx: Context) -> Result<Json<Value>, Error> {
//!     let body = ctx.body().cloned().ok_or("missing body")?;
//!     Ok(Json(body))
//! }
//! ```

mod body;
mod config;
mod context;
mod dispatch;
mod error;
mod handler;
mod path;
mod query;
mod reply;
mod resolve;
mod response;
mod server;
mod tree;

pub mod health;
pub mod middleware;

pub use body::decode_body;
pub use config::ServerConfig;
pub use context::Context;
pub use dispatch::dispatch;
pub use error::{BoxError, Error};
pub use handler::{BoxFuture, Handler};
pub use middleware::{Middleware, Next};
pub use path::{Params, join_paths, match_path};
pub use query::parse_query;
pub use reply::{IntoReply, Json, Reply};
pub use resolve::{Resolution, resolve};
pub use response::{Response, ResponseBuilder, ResponseHandle};
pub use server::Server;
pub use tree::{Endpoint, Group, Node, RouteTree};
