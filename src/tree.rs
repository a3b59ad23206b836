//! The immutable route tree.
//!
//! Built once at startup, then shared read-only by every request:
//!
//! ```rust
//! use canopy::{Context, Group, RouteTree, middleware};
//!
//! # async fn health(_: Context) -> &'static str { "ok" }
//! # async fn list_users(_: Context) {}
//! # async fn show_user(_: Context) {}
//! # async fn require_auth(ctx: Context, next: canopy::Next) -> Result<(), canopy::Error> { next.run(ctx).await }
//! let tree = RouteTree::new()
//!     .middleware(middleware::trace)
//!     .group(
//!         Group::new("/api")
//!             .get("/health", health)
//!             .group(
//!                 Group::new("/users")
//!                     .middleware(require_auth)
//!                     .get("", list_users)
//!                     .get("/:id", show_user),
//!             ),
//!     );
//! ```
//!
//! Middleware attaches to the root or to a group, never to an endpoint. A
//! group's middleware applies to every endpoint beneath it, after the
//! middleware of all enclosing groups.

use http::Method;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{BoxedMiddleware, Middleware};

/// One node of the tree.
pub enum Node {
    Group(Group),
    Endpoint(Endpoint),
}

/// A leaf bound to one method and one path suffix.
pub struct Endpoint {
    method: Method,
    suffix: String,
    handler: BoxedHandler,
}

impl Endpoint {
    /// `suffix` is appended to the enclosing groups' prefixes; `""` binds the
    /// endpoint to the group path itself.
    pub fn new(method: Method, suffix: &str, handler: impl Handler) -> Self {
        Self { method, suffix: suffix.to_owned(), handler: handler.into_boxed_handler() }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn suffix(&self) -> &str { &self.suffix }
    pub(crate) fn handler(&self) -> &BoxedHandler { &self.handler }
}

/// A path prefix plus a middleware scope over everything nested in it.
pub struct Group {
    prefix: String,
    middleware: Vec<BoxedMiddleware>,
    children: Vec<Node>,
}

impl Group {
    pub fn new(prefix: &str) -> Self {
        Self { prefix: prefix.to_owned(), middleware: Vec::new(), children: Vec::new() }
    }

    pub fn prefix(&self) -> &str { &self.prefix }
    pub fn children(&self) -> &[Node] { &self.children }
    pub(crate) fn middleware_list(&self) -> &[BoxedMiddleware] { &self.middleware }

    /// Endpoints declared directly in this group, in declaration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.children.iter().filter_map(|node| match node {
            Node::Endpoint(endpoint) => Some(endpoint),
            Node::Group(_) => None,
        })
    }

    /// Groups nested directly in this group, in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.children.iter().filter_map(|node| match node {
            Node::Group(group) => Some(group),
            Node::Endpoint(_) => None,
        })
    }
}

/// The root of the tree.
#[derive(Default)]
pub struct RouteTree {
    middleware: Vec<BoxedMiddleware>,
    children: Vec<Node>,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[Node] { &self.children }
    pub(crate) fn middleware_list(&self) -> &[BoxedMiddleware] { &self.middleware }
}

/// Builder methods shared by the root and groups. Each returns `self` so
/// declarations chain in the order they are matched.
macro_rules! builder_methods {
    ($ty:ty) => {
        impl $ty {
            /// Attaches middleware to this scope. Runs in attachment order.
            pub fn middleware(mut self, middleware: impl Middleware) -> Self {
                self.middleware.push(middleware.into_boxed_middleware());
                self
            }

            /// Nests a group.
            pub fn group(mut self, group: Group) -> Self {
                self.children.push(Node::Group(group));
                self
            }

            /// Adds a prebuilt endpoint.
            pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
                self.children.push(Node::Endpoint(endpoint));
                self
            }

            /// Registers a handler for a method + suffix pair.
            pub fn route(self, method: Method, suffix: &str, handler: impl Handler) -> Self {
                self.endpoint(Endpoint::new(method, suffix, handler))
            }

            pub fn get(self, suffix: &str, handler: impl Handler) -> Self {
                self.route(Method::GET, suffix, handler)
            }

            pub fn post(self, suffix: &str, handler: impl Handler) -> Self {
                self.route(Method::POST, suffix, handler)
            }

            pub fn put(self, suffix: &str, handler: impl Handler) -> Self {
                self.route(Method::PUT, suffix, handler)
            }

            pub fn patch(self, suffix: &str, handler: impl Handler) -> Self {
                self.route(Method::PATCH, suffix, handler)
            }

            pub fn delete(self, suffix: &str, handler: impl Handler) -> Self {
                self.route(Method::DELETE, suffix, handler)
            }
        }
    };
}

builder_methods!(RouteTree);
builder_methods!(Group);
