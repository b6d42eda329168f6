use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::files::{FileSource, PublicDir};
use crate::handler::{BoxedHandler, Handler};
use crate::http::Method;
use crate::middleware::{AbortMiddleware, Middleware, Pipeline};
use crate::router::{Route, Router, Routes};
use crate::server;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Collects configuration, routes and middleware during setup, then builds
/// the immutable [`Dispatcher`] that serves requests.
/// ```
/// use switchboard::{handler_fn, App, Request, Response, StatusCode};
///
/// # async fn doc() -> Result<(), switchboard::Error> {
/// let dispatcher = App::new()
///   .routes(|r| {
///     r.get("hello/:name", handler_fn(|req: Request| async move {
///       let name = req.param("name").unwrap_or("world").to_owned();
///       Ok(Response::text(StatusCode::OK, format!("Hello, {}!", name)))
///     }));
///   })
///   .build()?;
///
/// let res = dispatcher.handle(Request::get("/hello/ann")).await;
/// assert_eq!(&res.body()[..], b"Hello, ann!");
/// # Ok(())
/// # }
/// ```
pub struct App {
  config: Config,
  routes: Routes,
  middleware: Pipeline,
  files: Option<Arc<dyn FileSource>>,
  not_found: Option<BoxedHandler>,
}

impl Default for App {
  fn default() -> Self {
    Self::new()
  }
}

impl App {
  /// A new application whose middleware list starts with
  /// [`AbortMiddleware`].
  pub fn new() -> Self {
    let mut middleware = Pipeline::new();
    middleware.push(AbortMiddleware);

    Self {
      config: Config::default(),
      routes: Routes::new(),
      middleware,
      files: None,
      not_found: None,
    }
  }

  pub fn config(mut self, config: Config) -> Self {
    self.config = config;
    self
  }

  /// Appends `middleware` to the application-wide list. Middleware runs in
  /// the order it is added.
  pub fn middleware(mut self, middleware: impl Middleware) -> Self {
    self.middleware.push(middleware);
    self
  }

  /// Drops every middleware added so far, including the default
  /// [`AbortMiddleware`].
  pub fn clear_middleware(mut self) -> Self {
    self.middleware = Pipeline::new();
    self
  }

  /// Registers routes through a [`Routes`] builder.
  pub fn routes(mut self, f: impl FnOnce(&mut Routes)) -> Self {
    f(&mut self.routes);
    self
  }

  /// Registers a single route, optionally restricted to `host`.
  pub fn register(
    mut self,
    host: Option<&str>,
    method: Method,
    path: &str,
    handler: impl Handler,
  ) -> Self {
    let route = Route::new(method, path, handler);
    let route = match host {
      Some(host) => route.with_host(host),
      None => route,
    };
    self.routes.append(route);
    self
  }

  /// Replaces the default `Public` directory lookup.
  pub fn files(mut self, files: impl FileSource) -> Self {
    self.files = Some(Arc::new(files));
    self
  }

  /// Replaces the default `404 Page not found` handler.
  pub fn not_found(mut self, handler: impl Handler) -> Self {
    self.not_found = Some(Arc::new(handler));
    self
  }

  /// Registers every route and freezes the application into a dispatcher.
  ///
  /// Fails on the first route that conflicts with an earlier registration.
  pub fn build(self) -> Result<Dispatcher, Error> {
    let App {
      config,
      routes,
      middleware,
      files,
      not_found,
    } = self;

    let count = routes.len();
    let mut router = Router::new();
    for route in routes {
      router.register(route)?;
    }

    let files = files.unwrap_or_else(|| Arc::new(PublicDir::new(config.public_dir())));
    info!(
      routes = count,
      middleware = middleware.len(),
      environment = %config.environment,
      "application built"
    );

    let dispatcher = Dispatcher::new(router, middleware, config.environment).with_files(files);
    Ok(match not_found {
      Some(handler) => dispatcher.with_not_found(handler),
      None => dispatcher,
    })
  }

  /// Builds the application and serves it until the server fails.
  pub async fn run(self) -> Result<(), Error> {
    let config = self.config.clone();
    let dispatcher = self.build()?;

    info!(
      address = %SocketAddr::new(config.address, config.port),
      environment = %config.environment,
      "server starting"
    );
    server::serve(dispatcher, &config).await
  }
}
