use crate::handler::{BoxedHandler, Handler};
use crate::http::Method;
use crate::tree::{parse_path, Segment};
use std::fmt;
use std::sync::Arc;

/// A host that matches any request, equivalent to registering no host.
pub const ANY_HOST: &str = "*";

/// Associates a host, method and path pattern with a handler.
///
/// Routes are immutable once built and are consumed by
/// [`Router::register`](crate::router::Router::register).
pub struct Route {
  // Only requests with this exact `Host` header match, unless `None` or `*`.
  host: Option<String>,

  method: Method,

  // The pattern as registered, kept for logging.
  path: String,

  segments: Vec<Segment>,

  // Request handler for the route.
  handler: BoxedHandler,
}

impl Route {
  pub fn new(method: Method, path: impl Into<String>, handler: impl Handler) -> Self {
    Self::from_boxed(method, path, Arc::new(handler))
  }

  pub fn from_boxed(method: Method, path: impl Into<String>, handler: BoxedHandler) -> Self {
    let path = path.into();
    Self {
      host: None,
      method,
      segments: parse_path(&path),
      path,
      handler,
    }
  }

  /// Restricts the route to requests for `host`.
  pub fn with_host(mut self, host: impl Into<String>) -> Self {
    self.host = Some(host.into());
    self
  }

  pub fn host(&self) -> Option<&str> {
    self.host.as_deref()
  }

  pub fn method(&self) -> &Method {
    &self.method
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn handler(&self) -> &BoxedHandler {
    &self.handler
  }
}

impl fmt::Debug for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Route")
      .field("host", &self.host)
      .field("method", &self.method)
      .field("path", &self.path)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::handler::NotFound;

  #[test]
  fn parses_its_path_once() {
    let route = Route::new(Method::GET, "/test/:string", NotFound);
    assert_eq!(route.path(), "/test/:string");
    assert_eq!(
      route.segments(),
      &[
        Segment::Literal("test".into()),
        Segment::Param("string".into())
      ][..]
    );
    assert_eq!(route.host(), None);
  }

  #[test]
  fn host_is_optional() {
    let route = Route::new(Method::POST, "/", NotFound).with_host("vapor.test");
    assert_eq!(route.host(), Some("vapor.test"));
    assert_eq!(route.method(), &Method::POST);
    assert!(route.segments().is_empty());
  }
}
