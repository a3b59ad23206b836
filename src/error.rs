//! Unified error type.

use std::any::Any;
use std::fmt;

/// A boxed application error, as returned by fallible handlers and middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by canopy's fallible operations.
///
/// Application-level outcomes (404, 401, 422, etc.) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// infrastructure failures (binding, configuration) and faults raised while a
/// request runs through its middleware chain and handler.
#[derive(Debug)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    Io(std::io::Error),
    /// The server configuration could not be parsed.
    Config(toml::de::Error),
    /// A handler's return value could not be serialized.
    Encode(serde_json::Error),
    /// A handler or middleware returned an error.
    Handler(BoxError),
    /// A handler or middleware panicked. Carries the panic message when the
    /// payload was a string.
    Panic(Option<String>),
}

impl Error {
    /// Wraps any application error.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    /// The message surfaced to clients in a server-error payload, if this
    /// error carries one worth showing.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Panic(message) => message.clone(),
            Self::Encode(e) => Some(e.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(s) => Some(*s),
            Err(payload) => payload.downcast_ref::<&str>().map(|s| (*s).to_owned()),
        };
        Self::Panic(message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Encode(e) => write!(f, "encode: {e}"),
            Self::Handler(e) => write!(f, "{e}"),
            Self::Panic(Some(message)) => f.write_str(message),
            Self::Panic(None) => f.write_str("panic with non-string payload"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Handler(e) => Some(e.as_ref()),
            Self::Panic(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

impl From<BoxError> for Error {
    fn from(e: BoxError) -> Self {
        Self::Handler(e)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::Handler(message.into())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::Handler(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_errors_surface_their_message() {
        let err = Error::from("database unavailable");
        assert_eq!(err.message().as_deref(), Some("database unavailable"));
    }

    #[test]
    fn string_panics_are_recognized() {
        let err = Error::from_panic(Box::new("boom"));
        assert_eq!(err.message().as_deref(), Some("boom"));

        let err = Error::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(err.message().as_deref(), Some("kaboom"));
    }

    #[test]
    fn encode_errors_surface_the_serializer_text() {
        let inner = serde_json::from_str::<u8>("x").unwrap_err();
        let expected = inner.to_string();
        let err = Error::from(inner);

        assert_eq!(err.message(), Some(expected));
        assert!(err.to_string().starts_with("encode: "));
    }

    #[test]
    fn wrapped_application_errors_keep_their_text() {
        let err = Error::handler("12a".parse::<u32>().unwrap_err());
        assert_eq!(err.message().as_deref(), Some("invalid digit found in string"));
    }

    #[test]
    fn opaque_panics_carry_no_message() {
        let err = Error::from_panic(Box::new(42_u32));
        assert!(err.message().is_none());
    }
}
