//! Route resolution: first match wins, in declaration order.
//!
//! Siblings are visited in the order they were declared. When the walk
//! reaches a group, the group's own endpoints are tried before anything in
//! its nested groups, so `/api` + `/health` is found before any group nested
//! under `/api` is considered. Overlapping patterns are never rejected; the
//! earlier declaration simply wins.
//!
//! Resolution is synchronous and total: it either finds an endpoint or
//! reports no match.

use std::sync::Arc;

use http::Method;
use tracing::trace;

use crate::handler::BoxedHandler;
use crate::middleware::BoxedMiddleware;
use crate::path::{Params, join_paths, match_path};
use crate::tree::{Endpoint, Group, Node, RouteTree};

/// The endpoint a request resolved to.
pub struct Resolution {
    pub(crate) handler: BoxedHandler,
    pub(crate) params: Params,
    /// Root middleware first, then each enclosing group's, outer to inner.
    pub(crate) middleware: Vec<BoxedMiddleware>,
}

impl Resolution {
    pub fn params(&self) -> &Params { &self.params }
    pub fn middleware_len(&self) -> usize { self.middleware.len() }
}

/// Finds the endpoint for `method` + `path`.
pub fn resolve(tree: &RouteTree, method: &Method, path: &str) -> Option<Resolution> {
    let mut scope: Vec<&BoxedMiddleware> = tree.middleware_list().iter().collect();

    for node in tree.children() {
        let found = match node {
            Node::Endpoint(endpoint) => try_endpoint(endpoint, "/", &scope, method, path),
            Node::Group(group) => resolve_group(group, "/", &mut scope, method, path),
        };
        if found.is_some() {
            return found;
        }
    }
    trace!(%method, path, "no route matched");
    None
}

fn resolve_group<'t>(
    group: &'t Group,
    parent_prefix: &str,
    scope: &mut Vec<&'t BoxedMiddleware>,
    method: &Method,
    path: &str,
) -> Option<Resolution> {
    let prefix = join_paths(parent_prefix, group.prefix());
    let depth = scope.len();
    scope.extend(group.middleware_list());

    let found = group
        .endpoints()
        .find_map(|endpoint| try_endpoint(endpoint, &prefix, scope, method, path))
        .or_else(|| {
            group
                .groups()
                .find_map(|nested| resolve_group(nested, &prefix, scope, method, path))
        });

    scope.truncate(depth);
    found
}

fn try_endpoint(
    endpoint: &Endpoint,
    prefix: &str,
    scope: &[&BoxedMiddleware],
    method: &Method,
    path: &str,
) -> Option<Resolution> {
    if endpoint.method() != method {
        return None;
    }
    let pattern = join_paths(prefix, endpoint.suffix());
    let params = match_path(&pattern, path)?;
    trace!(%method, %pattern, path, "route matched");
    Some(Resolution {
        handler: Arc::clone(endpoint.handler()),
        params,
        middleware: scope.iter().map(|&mw| Arc::clone(mw)).collect(),
    })
}
