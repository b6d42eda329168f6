pub mod route;
pub mod scope;

pub use route::Route;
pub use scope::Routes;

use crate::endpoint::Endpoint;
use crate::error::RouteError;
use crate::handler::BoxedHandler;
use crate::http::{Method, Request};
use crate::tree::Node;
use std::collections::HashMap;
use tracing::debug;

/// Route parameters captured while matching a request, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub(crate) fn push(&mut self, name: String, value: String) {
    self.0.push((name, value));
  }
}

/// Host-scoped routing.
///
/// Routes registered with a host land in that host's tree; everything else
/// lands in the default tree. A request is matched against the tree for its
/// exact `Host` header first and falls back to the default tree only if that
/// yields nothing, so host-specific routes always take priority.
///
/// All registration happens before serving; the router is read-only while
/// requests are dispatched.
#[derive(Default)]
pub struct Router {
  hosts: HashMap<String, Node>,
  default: Node,
}

/// Stores information about a matched route.
pub struct Match<'a> {
  pub handler: &'a BoxedHandler,
  pub pattern: &'a str,
  pub params: Params,
}

impl Router {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts `route` into the tree for its host. Re-registering a path and
  /// method replaces the earlier handler.
  pub fn register(&mut self, route: Route) -> Result<(), RouteError> {
    let tree = match route.host() {
      Some(host) if host != route::ANY_HOST => self.hosts.entry(host.to_owned()).or_default(),
      _ => &mut self.default,
    };

    let endpoint = Endpoint::new(route.handler().clone(), route.path());
    let replaced = tree.insert(
      route.path(),
      route.segments(),
      route.method().clone(),
      endpoint,
    )?;

    if let Some(previous) = replaced {
      debug!(
        host = route.host().unwrap_or(route::ANY_HOST),
        method = %route.method(),
        pattern = previous.pattern(),
        "replacing previously registered route"
      );
    }
    Ok(())
  }

  /// Looks up the handler for `method` and `path` as requested on `host`.
  pub fn lookup<'a>(
    &'a self,
    host: Option<&str>,
    method: &Method,
    path: &str,
  ) -> Option<Match<'a>> {
    host
      .and_then(|host| self.hosts.get(host))
      .and_then(|tree| tree.at(path, method))
      .or_else(|| self.default.at(path, method))
      .map(|(endpoint, params)| Match {
        handler: endpoint.handler(),
        pattern: endpoint.pattern(),
        params,
      })
  }

  /// Resolves the handler for `req`, storing the captured parameters on the
  /// request when a route matches.
  pub fn route(&self, req: &mut Request) -> Option<BoxedHandler> {
    let found = self.lookup(req.host(), req.method(), req.path());

    match found {
      Some(Match {
        handler,
        pattern,
        params,
      }) => {
        debug!(method = %req.method(), path = req.path(), pattern, "route matched");
        let handler = handler.clone();
        req.set_params(params);
        Some(handler)
      }
      None => {
        debug!(method = %req.method(), path = req.path(), "no route matched");
        None
      }
    }
  }

  /// Whether no routes have been registered.
  pub fn is_empty(&self) -> bool {
    self.default.is_empty() && self.hosts.values().all(Node::is_empty)
  }
}
