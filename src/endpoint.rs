use crate::handler::BoxedHandler;
use std::fmt;

/// A handler stored at a terminal node of the routing tree.
pub(crate) struct Endpoint {
  /// the handler service.
  handler: BoxedHandler,

  /// the routing pattern the handler was registered under
  pattern: String,
}

impl Endpoint {
  pub(crate) fn new(handler: BoxedHandler, pattern: impl Into<String>) -> Self {
    Self {
      handler,
      pattern: pattern.into(),
    }
  }

  pub(crate) fn handler(&self) -> &BoxedHandler {
    &self.handler
  }

  pub(crate) fn pattern(&self) -> &str {
    &self.pattern
  }
}

impl fmt::Debug for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Endpoint")
      .field("pattern", &self.pattern)
      .finish()
  }
}
