//! Handler return values and the [`IntoReply`] conversion trait.
//!
//! A handler does not have to build a [`Response`]. It returns a value, and
//! the chain finalizes the response from it: a present value is serialized as
//! JSON, the "no value" reply produces an empty `200 OK`, and a full
//! [`Response`] is sent as-is. If the response was already sent by the time
//! the handler returns, the value is discarded.

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::response::Response;

/// What a handler produced.
#[derive(Debug)]
pub enum Reply {
    /// No value. Finalizes with an empty body.
    Empty,
    /// A value to serialize as the JSON body.
    Value(Value),
    /// A complete response, sent unchanged.
    Response(Response),
}

impl Reply {
    /// Converts into the response that finalizes the request.
    pub(crate) fn into_response(self) -> Result<Response, Error> {
        match self {
            Self::Empty => Ok(Response::empty()),
            Self::Value(value) => Response::payload(StatusCode::OK, &value),
            Self::Response(res) => Ok(res),
        }
    }
}

/// Conversion of a handler's return value into a [`Reply`].
///
/// An `Err` marks a handler fault: the dispatcher answers
/// `500 Internal Server Error` if nothing was sent yet.
///
/// ```rust,ignore
/// use canopy::{Context, Error, Json};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { id: String }
///
/// async fn get_user(ctx: Context) -> Result<Json<User>, Error> {
///     let id = ctx.param("id").ok_or("missing id")?;
///     Ok(Json(User { id: id.to_owned() }))
/// }
/// ```
pub trait IntoReply {
    fn into_reply(self) -> Result<Reply, Error>;
}

/// Serializes any `T: Serialize` as the JSON body.
#[derive(Clone, Debug)]
pub struct Json<T>(pub T);

impl IntoReply for Reply {
    fn into_reply(self) -> Result<Reply, Error> { Ok(self) }
}

impl IntoReply for () {
    fn into_reply(self) -> Result<Reply, Error> { Ok(Reply::Empty) }
}

impl IntoReply for Value {
    fn into_reply(self) -> Result<Reply, Error> { Ok(Reply::Value(self)) }
}

impl<T: Serialize> IntoReply for Json<T> {
    fn into_reply(self) -> Result<Reply, Error> {
        Ok(Reply::Value(serde_json::to_value(self.0)?))
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Result<Reply, Error> { Ok(Reply::Value(Value::String(self))) }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Result<Reply, Error> { self.to_owned().into_reply() }
}

impl IntoReply for Response {
    fn into_reply(self) -> Result<Reply, Error> { Ok(Reply::Response(self)) }
}

/// Return a status directly from a handler: `return StatusCode::NO_CONTENT`
impl IntoReply for StatusCode {
    fn into_reply(self) -> Result<Reply, Error> { Ok(Reply::Response(Response::status(self))) }
}

/// `None` is the "no value" reply.
impl<T: IntoReply> IntoReply for Option<T> {
    fn into_reply(self) -> Result<Reply, Error> {
        match self {
            Some(inner) => inner.into_reply(),
            None => Ok(Reply::Empty),
        }
    }
}

impl<T, E> IntoReply for Result<T, E>
where
    T: IntoReply,
    E: Into<Error>,
{
    fn into_reply(self) -> Result<Reply, Error> {
        self.map_err(Into::into)?.into_reply()
    }
}
