use crate::config::ConfigError;
use crate::http::StatusCode;
use std::fmt;

/// A type-erased error, used for arbitrary handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while registering routes or handling a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A handler gave up on the request with an explicit HTTP status.
  ///
  /// [`AbortMiddleware`](crate::middleware::AbortMiddleware) turns these into
  /// responses carrying `status`; without it they are treated like any other
  /// handler failure.
  #[error("{status}: {message}")]
  Abort { status: StatusCode, message: String },

  #[error(transparent)]
  Route(#[from] RouteError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Hyper(#[from] hyper::Error),

  #[error(transparent)]
  Other(BoxError),
}

impl Error {
  pub fn abort(status: StatusCode, message: impl Into<String>) -> Self {
    Error::Abort {
      status,
      message: message.into(),
    }
  }

  pub fn bad_request() -> Self {
    Self::abort(StatusCode::BAD_REQUEST, "Invalid request")
  }

  pub fn unauthorized() -> Self {
    Self::abort(StatusCode::UNAUTHORIZED, "Unauthorized")
  }

  pub fn forbidden() -> Self {
    Self::abort(StatusCode::FORBIDDEN, "Forbidden")
  }

  pub fn not_found() -> Self {
    Self::abort(StatusCode::NOT_FOUND, "Page not found")
  }

  pub fn internal() -> Self {
    Self::abort(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
  }

  /// Wraps any error a handler wants to propagate.
  pub fn other(err: impl Into<BoxError>) -> Self {
    Error::Other(err.into())
  }
}

/// Route registration conflicts, detected before any request is served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
  #[error("route `{path}`: parameter segment is missing a name")]
  EmptyParameter { path: String },

  #[error("route `{path}`: parameter `:{name}` conflicts with `:{existing}` at the same depth")]
  ParameterConflict {
    path: String,
    name: String,
    existing: String,
  },

  #[error("route `{path}`: parameter `:{name}` is used more than once")]
  DuplicateParameter { path: String, name: String },

  #[error("route `{path}`: `:{name}` is reserved for the wildcard capture")]
  ReservedParameter { path: String, name: String },

  #[error("route `{path}`: the wildcard segment must be the last segment")]
  WildcardNotLast { path: String },
}

/// The payload of a handler panic caught by the dispatcher.
#[derive(Debug)]
pub(crate) struct Panic(pub(crate) String);

impl Panic {
  pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
      (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "handler panicked".to_owned()
    };
    Panic(message)
  }
}

impl fmt::Display for Panic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "handler panicked: {}", self.0)
  }
}
