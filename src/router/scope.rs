use crate::action::{Action, ResourceHandler};
use crate::handler::{BoxedHandler, Handler};
use crate::http::Method;
use crate::middleware::{BoxedMiddleware, Middleware};
use crate::resource::Resource;
use crate::router::Route;
use std::sync::Arc;

/// Every method registered by [`Routes::any`].
const ANY_METHODS: [Method; 7] = [
  Method::GET,
  Method::POST,
  Method::PUT,
  Method::PATCH,
  Method::DELETE,
  Method::HEAD,
  Method::OPTIONS,
];

/// Modifiers stamped onto every route registered inside a scope.
#[derive(Clone, Default)]
struct Scope {
  host: Option<String>,
  prefix: Vec<String>,
  middleware: Vec<BoxedMiddleware>,
}

impl Scope {
  fn route(&self, method: Method, path: &str, handler: BoxedHandler) -> Route {
    let path = self
      .prefix
      .iter()
      .map(String::as_str)
      .chain(std::iter::once(path.trim_matches('/')))
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join("/");

    let handler = self
      .middleware
      .iter()
      .rev()
      .fold(handler, |next, middleware| middleware.wrap(next));

    let route = Route::from_boxed(method, format!("/{}", path), handler);
    match &self.host {
      Some(host) => route.with_host(host.clone()),
      None => route,
    }
  }
}

/// Accumulates routes before the application is built.
///
/// Scopes nest: `group`, `host` and `with` each open a child scope that
/// inherits the current modifiers and adds its own.
/// ```
/// use switchboard::{handler_fn, Error, Response, Routes, StatusCode};
///
/// let mut routes = Routes::new();
/// routes.group("abort", |abort| {
///   abort.get("400", handler_fn(|_| async { Err(Error::bad_request()) }));
///   abort.get("404", handler_fn(|_| async { Err(Error::not_found()) }));
/// });
/// routes.host("admin.example.com", |admin| {
///   admin.get("/", handler_fn(|_| async { Ok(Response::text(StatusCode::OK, "admin")) }));
/// });
/// assert_eq!(routes.len(), 3);
/// ```
#[derive(Default)]
pub struct Routes {
  scope: Scope,
  routes: Vec<Route>,
}

impl Routes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `handler` for `method` at `path` within the current scope.
  pub fn add(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
    self.add_boxed(method, path, Arc::new(handler))
  }

  fn add_boxed(&mut self, method: Method, path: &str, handler: BoxedHandler) -> &mut Self {
    let route = self.scope.route(method, path, handler);
    self.routes.push(route);
    self
  }

  pub fn get(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::GET, path, handler)
  }

  pub fn post(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::POST, path, handler)
  }

  pub fn put(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::PUT, path, handler)
  }

  pub fn patch(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::PATCH, path, handler)
  }

  pub fn delete(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::DELETE, path, handler)
  }

  pub fn head(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::HEAD, path, handler)
  }

  pub fn options(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    self.add(Method::OPTIONS, path, handler)
  }

  /// Registers `handler` for every standard method.
  pub fn any(&mut self, path: &str, handler: impl Handler) -> &mut Self {
    let handler: BoxedHandler = Arc::new(handler);
    for method in ANY_METHODS.iter() {
      self.add_boxed(method.clone(), path, handler.clone());
    }
    self
  }

  /// Registers the RESTful actions of `resource` under `name`:
  ///
  /// | method | path        | action  |
  /// |--------|-------------|---------|
  /// | GET    | `name`      | index   |
  /// | POST   | `name`      | store   |
  /// | GET    | `name/:id`  | show    |
  /// | PUT    | `name/:id`  | update  |
  /// | PATCH  | `name/:id`  | update  |
  /// | DELETE | `name/:id`  | destroy |
  pub fn resource(&mut self, name: &str, resource: impl Resource) -> &mut Self {
    let resource: Arc<dyn Resource> = Arc::new(resource);
    let name = name.trim_matches('/');
    let member = format!("{}/:id", name);

    let actions = [
      (Method::GET, name, Action::Index),
      (Method::POST, name, Action::Store),
      (Method::GET, member.as_str(), Action::Show),
      (Method::PUT, member.as_str(), Action::Update),
      (Method::PATCH, member.as_str(), Action::Update),
      (Method::DELETE, member.as_str(), Action::Destroy),
    ];

    for (method, path, action) in actions.iter() {
      let handler = ResourceHandler::new(resource.clone(), *action);
      self.add(method.clone(), path, handler);
    }
    self
  }

  /// Prefixes every route registered inside `f` with `prefix`.
  pub fn group(&mut self, prefix: &str, f: impl FnOnce(&mut Routes)) -> &mut Self {
    let mut scope = self.scope.clone();
    scope.prefix.extend(
      prefix
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned),
    );
    self.nest(scope, f)
  }

  /// Restricts every route registered inside `f` to requests for `host`.
  pub fn host(&mut self, host: &str, f: impl FnOnce(&mut Routes)) -> &mut Self {
    let mut scope = self.scope.clone();
    scope.host = Some(host.to_owned());
    self.nest(scope, f)
  }

  /// Wraps every route registered inside `f` with `middleware`, inside any
  /// middleware added by enclosing scopes.
  pub fn with(&mut self, middleware: impl Middleware, f: impl FnOnce(&mut Routes)) -> &mut Self {
    let mut scope = self.scope.clone();
    scope.middleware.push(Arc::new(middleware));
    self.nest(scope, f)
  }

  fn nest(&mut self, scope: Scope, f: impl FnOnce(&mut Routes)) -> &mut Self {
    let mut child = Routes {
      scope,
      routes: Vec::new(),
    };
    f(&mut child);
    self.routes.append(&mut child.routes);
    self
  }

  pub fn len(&self) -> usize {
    self.routes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.routes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Route> {
    self.routes.iter()
  }

  pub(crate) fn append(&mut self, route: Route) {
    self.routes.push(route);
  }
}

impl IntoIterator for Routes {
  type Item = Route;
  type IntoIter = std::vec::IntoIter<Route>;

  fn into_iter(self) -> Self::IntoIter {
    self.routes.into_iter()
  }
}
