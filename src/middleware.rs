//! Cross-cutting request/response transformers.
//!
//! A middleware receives the next handler in the chain and returns a new
//! handler wrapping it. It may observe or rewrite the request on the way in,
//! the response on the way out, or skip `next` entirely to short-circuit.

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::http::{Request, Response};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

pub trait Middleware: Send + Sync + 'static {
  fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

impl<F> Middleware for F
where
  F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
  fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
    self(next)
  }
}

/// An ordered list of middleware.
///
/// The first middleware pushed is the outermost: it runs first on the way in
/// and last on the way out.
#[derive(Clone, Default)]
pub struct Pipeline {
  middleware: Vec<BoxedMiddleware>,
}

impl Pipeline {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, middleware: impl Middleware) {
    self.middleware.push(Arc::new(middleware));
  }

  pub fn len(&self) -> usize {
    self.middleware.len()
  }

  pub fn is_empty(&self) -> bool {
    self.middleware.is_empty()
  }

  /// Composes the pipeline around `terminal`, yielding
  /// `m[0](m[1](...m[n-1](terminal)))`.
  pub fn wrap(&self, terminal: BoxedHandler) -> BoxedHandler {
    self
      .middleware
      .iter()
      .rev()
      .fold(terminal, |next, middleware| middleware.wrap(next))
  }
}

/// The rest of the chain, as seen from a [`from_fn`] middleware.
pub struct Next(BoxedHandler);

impl Next {
  pub async fn run(self, req: Request) -> Result<Response, Error> {
    self.0.call(req).await
  }
}

/// Builds a middleware from an async function of the request and the rest of
/// the chain.
/// ```
/// use switchboard::middleware::{from_fn, Next};
/// use switchboard::{Error, Request, Response, StatusCode};
///
/// let auth = from_fn(|req: Request, next: Next| async move {
///   if req.header("authorization").is_none() {
///     return Err(Error::unauthorized());
///   }
///   next.run(req).await
/// });
/// ```
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
  F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
  FromFn { f: Arc::new(f) }
}

pub struct FromFn<F> {
  f: Arc<F>,
}

impl<F, Fut> Middleware for FromFn<F>
where
  F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
  fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
    Arc::new(FromFnHandler {
      f: self.f.clone(),
      next,
    })
  }
}

struct FromFnHandler<F> {
  f: Arc<F>,
  next: BoxedHandler,
}

#[async_trait]
impl<F, Fut> Handler for FromFnHandler<F>
where
  F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
  async fn call(&self, req: Request) -> Result<Response, Error> {
    (self.f)(req, Next(self.next.clone())).await
  }
}

/// Turns [`Error::Abort`] failures into JSON responses carrying the abort's
/// status. Other errors pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortMiddleware;

impl Middleware for AbortMiddleware {
  fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
    Arc::new(Abort { next })
  }
}

struct Abort {
  next: BoxedHandler,
}

#[async_trait]
impl Handler for Abort {
  async fn call(&self, req: Request) -> Result<Response, Error> {
    match self.next.call(req).await {
      Err(Error::Abort { status, message }) => {
        debug!(%status, %message, "request aborted");
        Ok(Response::error(status, message))
      }
      other => other,
    }
  }
}
