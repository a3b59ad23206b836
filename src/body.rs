//! Request body decoding.

use http_body_util::BodyExt;
use hyper::body::Body;
use serde_json::Value;
use tracing::debug;

/// Buffers the whole body and decodes it.
///
/// A read error (e.g. the client went away mid-body) yields `None`, the same
/// as an empty body.
pub(crate) async fn read_body<B>(body: B) -> Option<Value>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    match body.collect().await {
        Ok(collected) => decode_body(&collected.to_bytes()),
        Err(e) => {
            debug!(error = %e, "failed to read request body");
            None
        }
    }
}

/// Decodes a buffered body.
///
/// Empty input is `None`. JSON input is parsed; anything else comes back as
/// a [`Value::String`] holding the raw text (invalid UTF-8 replaced).
pub fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use bytes::Bytes;
    use http_body_util::{Empty, Full, StreamBody};
    use hyper::body::Frame;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_is_none() {
        assert_eq!(decode_body(b""), None);
    }

    #[test]
    fn json_is_parsed() {
        assert_eq!(decode_body(br#"{"name":"alice","age":30}"#), Some(json!({"name": "alice", "age": 30})));
        assert_eq!(decode_body(b"[1,2]"), Some(json!([1, 2])));
    }

    #[test]
    fn non_json_falls_back_to_text() {
        assert_eq!(decode_body(b"hello world"), Some(json!("hello world")));
        assert_eq!(decode_body(br#"{"broken":"#), Some(json!(r#"{"broken":"#)));
    }

    #[tokio::test]
    async fn reads_full_bodies() {
        let body = Full::new(Bytes::from_static(br#"{"ok":true}"#));
        assert_eq!(read_body(body).await, Some(json!({"ok": true})));
        assert_eq!(read_body(Empty::<Bytes>::new()).await, None);
    }

    #[tokio::test]
    async fn read_error_is_none() {
        let frames: Vec<Result<Frame<Bytes>, &'static str>> = vec![
            Ok(Frame::data(Bytes::from_static(b"{\"par"))),
            Err("connection reset"),
        ];
        let body = StreamBody::new(futures::stream::iter(frames));
        assert_eq!(read_body(body).await, None);

        let ok: Vec<Result<Frame<Bytes>, Infallible>> = vec![Ok(Frame::data(Bytes::from_static(b"plain")))];
        assert_eq!(read_body(StreamBody::new(futures::stream::iter(ok))).await, Some(json!("plain")));
    }
}
