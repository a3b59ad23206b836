//! Per-request context handed to middleware and handlers.

use std::collections::HashMap;

use http::request::Parts;
use http::{Extensions, HeaderMap, Method};
use serde_json::Value;

use crate::path::Params;
use crate::response::{Response, ResponseHandle};

/// Everything known about one request while it runs through its chain.
///
/// Created fresh by the dispatcher for every matched request and dropped once
/// the response is finalized. Never shared between requests.
pub struct Context {
    head: Parts,
    path: String,
    params: Params,
    query: HashMap<String, String>,
    body: Option<Value>,
    response: ResponseHandle,
}

impl Context {
    pub(crate) fn new(
        head: Parts,
        params: Params,
        query: HashMap<String, String>,
        body: Option<Value>,
    ) -> Self {
        let path = head.uri.path().to_owned();
        Self { head, path, params, query, body, response: ResponseHandle::new() }
    }

    pub fn method(&self) -> &Method { &self.head.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.head.headers }
    pub fn params(&self) -> &Params { &self.params }
    pub fn query_map(&self) -> &HashMap<String, String> { &self.query }

    /// The raw request head as received from the transport.
    pub fn head(&self) -> &Parts { &self.head }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `ctx.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns a query-string value. For repeated keys, the last one wins.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// The decoded request body.
    ///
    /// `None` for an empty body. A body that is not valid JSON is exposed as
    /// a [`Value::String`] holding the raw text.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Header lookup. Returns `None` for absent or non-visible-ASCII values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Typed per-request data, e.g. the authenticated user a middleware
    /// resolved for the handler.
    pub fn extensions(&self) -> &Extensions { &self.head.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.head.extensions }

    /// The request's response slot. Clone it to observe the outcome after
    /// handing the context down the chain.
    pub fn response(&self) -> &ResponseHandle { &self.response }

    /// Finalizes the response. Returns `false` if one was already sent.
    pub fn send(&self, response: Response) -> bool {
        self.response.send(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(uri: &str) -> Context {
        let (head, ()) = http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("authorization", "Bearer abc")
            .body(())
            .unwrap()
            .into_parts();
        let params = Params::from([("id".to_owned(), "42".to_owned())]);
        let query = HashMap::from([("page".to_owned(), "2".to_owned())]);
        Context::new(head, params, query, Some(json!({"name": "alice"})))
    }

    #[test]
    fn exposes_request_data() {
        let ctx = context("/users/42?page=2");
        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.path(), "/users/42");
        assert_eq!(ctx.param("id"), Some("42"));
        assert_eq!(ctx.param("missing"), None);
        assert_eq!(ctx.query("page"), Some("2"));
        assert_eq!(ctx.header("Authorization"), Some("Bearer abc"));
        assert_eq!(ctx.body(), Some(&json!({"name": "alice"})));
        assert_eq!(ctx.head().uri.query(), Some("page=2"));
        assert_eq!(ctx.head().version, http::Version::HTTP_11);
    }

    #[test]
    fn extensions_carry_typed_data() {
        #[derive(Clone, Debug, PartialEq)]
        struct UserId(u64);

        let mut ctx = context("/");
        ctx.extensions_mut().insert(UserId(7));
        assert_eq!(ctx.extensions().get::<UserId>(), Some(&UserId(7)));
    }

    #[test]
    fn send_goes_through_the_shared_handle() {
        let ctx = context("/");
        let handle = ctx.response().clone();
        assert!(ctx.send(Response::text("done")));
        assert!(handle.is_sent());
        assert!(!ctx.send(Response::empty()));
    }
}
