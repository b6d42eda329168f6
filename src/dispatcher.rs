use crate::config::Environment;
use crate::error::{Error, Panic};
use crate::files::FileSource;
use crate::handler::{BoxedHandler, Handler, NotFound};
use crate::http::{Request, Response, StatusCode};
use crate::middleware::Pipeline;
use crate::router::Router;
use async_trait::async_trait;
use bytes::Bytes;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, warn};

/// The body detail of a 500 response in production.
pub const REDACTED_ERROR: &str = "Something went wrong";

/// Translates each inbound request into exactly one response.
///
/// The handler is resolved from the router, then the static file source, then
/// the not-found handler, wrapped in the middleware pipeline, and invoked
/// inside a failure boundary: errors and panics become 500 responses and
/// never escape [`Dispatcher::handle`].
///
/// A dispatcher is immutable; share it between workers behind an `Arc`.
pub struct Dispatcher {
  router: Router,
  pipeline: Pipeline,
  files: Option<Arc<dyn FileSource>>,
  not_found: BoxedHandler,
  environment: Environment,
}

impl Dispatcher {
  pub fn new(router: Router, pipeline: Pipeline, environment: Environment) -> Self {
    Self {
      router,
      pipeline,
      files: None,
      not_found: Arc::new(NotFound),
      environment,
    }
  }

  /// Consults `files` for requests no route matches.
  pub fn with_files(mut self, files: Arc<dyn FileSource>) -> Self {
    self.files = Some(files);
    self
  }

  /// Replaces the default `404 Page not found` handler.
  pub fn with_not_found(mut self, handler: BoxedHandler) -> Self {
    self.not_found = handler;
    self
  }

  pub fn router(&self) -> &Router {
    &self.router
  }

  pub fn environment(&self) -> &Environment {
    &self.environment
  }

  pub async fn handle(&self, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();

    match AssertUnwindSafe(self.dispatch(req)).catch_unwind().await {
      Ok(Ok(res)) => {
        if res.content_type().is_none() {
          warn!(%method, %path, status = %res.status(), "response had no Content-Type header");
        }
        res
      }
      Ok(Err(err)) => {
        error!(%method, %path, error = %err, "handler failed");
        self.failure(&err)
      }
      Err(payload) => {
        let panic = Panic::from_payload(payload);
        error!(%method, %path, error = %panic, "handler panicked");
        self.failure(&panic)
      }
    }
  }

  /// Resolves the handler for `req`, wraps it in the pipeline and calls it.
  async fn dispatch(&self, mut req: Request) -> Result<Response, Error> {
    let handler = match self.router.route(&mut req) {
      Some(handler) => handler,
      None => match self.static_file(req.path()).await {
        Some(handler) => handler,
        None => self.not_found.clone(),
      },
    };

    self.pipeline.wrap(handler).call(req).await
  }

  /// Finds a handler serving the static file at `path`, if there is one.
  ///
  /// A file that exists but cannot be read is answered with a 404.
  async fn static_file(&self, path: &str) -> Option<BoxedHandler> {
    let files = self.files.as_ref()?;
    if !files.exists(path).await {
      return None;
    }

    match files.read(path).await {
      Ok(body) => Some(Arc::new(StaticFile {
        body,
        content_type: files.content_type(path),
      })),
      Err(err) => {
        warn!(path, error = %err, "could not open file, returning 404");
        Some(self.not_found.clone())
      }
    }
  }

  fn failure(&self, err: &dyn std::fmt::Display) -> Response {
    let message = if self.environment.is_production() {
      REDACTED_ERROR.to_owned()
    } else {
      format!("Server Error: {}", err)
    };
    Response::error(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

struct StaticFile {
  body: Bytes,
  content_type: Option<String>,
}

#[async_trait]
impl Handler for StaticFile {
  async fn call(&self, _: Request) -> Result<Response, Error> {
    Ok(Response::bytes(
      StatusCode::OK,
      self.body.clone(),
      self.content_type.as_deref(),
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::handler::handler_fn;
  use crate::http::Method;
  use crate::router::Route;
  use std::io;

  async fn explode(_: Request) -> Result<Response, Error> {
    panic!("secret panic")
  }

  fn dispatcher(environment: Environment) -> Dispatcher {
    let mut router = Router::new();
    router
      .register(Route::new(
        Method::GET,
        "ok",
        handler_fn(|_| async { Ok(Response::text(StatusCode::OK, "ok")) }),
      ))
      .unwrap();
    router
      .register(Route::new(
        Method::GET,
        "fail",
        handler_fn(|_| async { Err(Error::other("secret connection string")) }),
      ))
      .unwrap();
    router
      .register(Route::new(
        Method::GET,
        "panic",
        handler_fn(explode),
      ))
      .unwrap();
    router
      .register(Route::new(
        Method::GET,
        "bare",
        handler_fn(|_| async { Ok(Response::new(StatusCode::NO_CONTENT)) }),
      ))
      .unwrap();
    Dispatcher::new(router, Pipeline::new(), environment)
  }

  fn body(res: &Response) -> String {
    String::from_utf8(res.body().to_vec()).unwrap()
  }

  struct Files {
    readable: bool,
  }

  #[async_trait]
  impl FileSource for Files {
    async fn exists(&self, path: &str) -> bool {
      path == "/robots.txt"
    }

    async fn read(&self, _: &str) -> io::Result<Bytes> {
      if self.readable {
        Ok(Bytes::from_static(b"User-agent: *"))
      } else {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
      }
    }
  }

  #[tokio::test]
  async fn routes_matched_requests() {
    let res = dispatcher(Environment::Test).handle(Request::get("/ok")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res), "ok");
  }

  #[tokio::test]
  async fn unmatched_requests_are_not_found() {
    let res = dispatcher(Environment::Test).handle(Request::get("/nope")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn custom_not_found_handler() {
    let dispatcher = dispatcher(Environment::Test).with_not_found(Arc::new(handler_fn(|_| async {
      Ok(Response::html(StatusCode::NOT_FOUND, "<h1>Lost?</h1>"))
    })));
    let res = dispatcher.handle(Request::get("/nope")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body(&res).contains("Lost?"));
  }

  #[tokio::test]
  async fn falls_back_to_static_files() {
    let dispatcher = dispatcher(Environment::Test).with_files(Arc::new(Files { readable: true }));

    let res = dispatcher.handle(Request::get("/robots.txt")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res), "User-agent: *");
    assert_eq!(res.content_type(), Some("text/plain"));

    // Routes win over files.
    let res = dispatcher.handle(Request::get("/ok")).await;
    assert_eq!(body(&res), "ok");
  }

  #[tokio::test]
  async fn unreadable_static_files_are_not_found() {
    let dispatcher = dispatcher(Environment::Test).with_files(Arc::new(Files { readable: false }));
    let res = dispatcher.handle(Request::get("/robots.txt")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn failures_are_verbose_outside_production() {
    let res = dispatcher(Environment::Development).handle(Request::get("/fail")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body(&res).contains("secret connection string"));
  }

  #[tokio::test]
  async fn failures_are_redacted_in_production() {
    let res = dispatcher(Environment::Production).handle(Request::get("/fail")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body(&res).contains(REDACTED_ERROR));
    assert!(!body(&res).contains("secret"));
  }

  #[tokio::test]
  async fn panics_become_server_errors() {
    let dev = dispatcher(Environment::Development).handle(Request::get("/panic")).await;
    assert_eq!(dev.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body(&dev).contains("secret panic"));

    let prod = dispatcher(Environment::Production).handle(Request::get("/panic")).await;
    assert_eq!(prod.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body(&prod).contains("secret"));
  }

  struct BrokenFiles;

  #[async_trait]
  impl FileSource for BrokenFiles {
    async fn exists(&self, _: &str) -> bool {
      panic!("disk on fire")
    }

    async fn read(&self, _: &str) -> io::Result<Bytes> {
      Ok(Bytes::new())
    }
  }

  #[tokio::test]
  async fn panicking_file_sources_become_server_errors() {
    let dispatcher = dispatcher(Environment::Development).with_files(Arc::new(BrokenFiles));
    let res = dispatcher.handle(Request::get("/robots.txt")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body(&res).contains("disk on fire"));
  }

  #[tokio::test]
  async fn panicking_middleware_becomes_a_server_error() {
    let mut router = Router::new();
    router
      .register(Route::new(
        Method::GET,
        "ok",
        handler_fn(|_| async { Ok(Response::text(StatusCode::OK, "ok")) }),
      ))
      .unwrap();
    let mut pipeline = Pipeline::new();
    pipeline.push(|_: BoxedHandler| -> BoxedHandler { panic!("bad wrap") });

    let dispatcher = Dispatcher::new(router, pipeline, Environment::Production);
    let res = dispatcher.handle(Request::get("/ok")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body(&res).contains(REDACTED_ERROR));
  }

  #[tokio::test]
  async fn responses_without_content_type_are_returned_unmodified() {
    let res = dispatcher(Environment::Test).handle(Request::get("/bare")).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.content_type(), None);
  }

  #[tokio::test]
  async fn dispatch_is_idempotent() {
    let dispatcher = dispatcher(Environment::Test);
    let req = Request::get("/ok");
    let first = dispatcher.handle(req.clone()).await;
    let second = dispatcher.handle(req).await;
    assert_eq!(first.status(), second.status());
    assert_eq!(first.body(), second.body());
  }
}
