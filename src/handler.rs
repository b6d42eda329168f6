use crate::error::Error;
use crate::http::{Request, Response, StatusCode};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Anything that can turn a request into a response.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
  async fn call(&self, req: Request) -> Result<Response, Error>;
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// A [`Handler`] backed by an async function or closure. See [`handler_fn`].
pub struct HandlerFn<F> {
  f: F,
}

/// Converts an async function or closure into a [`Handler`].
/// ```
/// use switchboard::{handler_fn, Request, Response, StatusCode};
///
/// let hello = handler_fn(|_: Request| async {
///   Ok(Response::text(StatusCode::OK, "Hello, World!"))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
  F: Fn(Request) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
  HandlerFn { f }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
  F: Fn(Request) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
  async fn call(&self, req: Request) -> Result<Response, Error> {
    (self.f)(req).await
  }
}

#[async_trait]
impl Handler for BoxedHandler {
  async fn call(&self, req: Request) -> Result<Response, Error> {
    (**self).call(req).await
  }
}

/// Always answers `404 Page not found`.
pub(crate) struct NotFound;

#[async_trait]
impl Handler for NotFound {
  async fn call(&self, _: Request) -> Result<Response, Error> {
    Ok(Response::text(StatusCode::NOT_FOUND, "Page not found"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn closures_are_handlers() {
    let handler = handler_fn(|req: Request| async move {
      Ok(Response::text(StatusCode::OK, req.path().to_owned()))
    });

    let res = handler.call(Request::get("/echo")).await.unwrap();
    assert_eq!(&res.body()[..], b"/echo");
  }

  #[tokio::test]
  async fn boxed_handlers_delegate() {
    let boxed: BoxedHandler = Arc::new(NotFound);
    let res = boxed.call(Request::get("/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }
}
