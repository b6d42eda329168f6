use crate::endpoint::Endpoint;
use crate::error::RouteError;
use crate::http::Method;
use crate::router::Params;
use percent_encoding::percent_decode_str;
use std::collections::{HashMap, HashSet};

/// Marks a named parameter segment, ex: `/:id`.
pub const PARAM_MARKER: char = ':';

/// A segment that consumes the rest of the path, ex: `/assets/*`.
pub const WILDCARD: &str = "*";

/// The parameter key the wildcard's captured remainder is stored under.
pub const WILDCARD_KEY: &str = "*";

/// One `/`-delimited component of a registered route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Matches exactly this text (case-sensitive).
  Literal(String),
  /// Matches any single segment, captured under the given name.
  Param(String),
  /// Matches one or more remaining segments.
  Wildcard,
}

impl Segment {
  pub fn parse(raw: &str) -> Segment {
    if raw == WILDCARD {
      Segment::Wildcard
    } else if let Some(name) = raw.strip_prefix(PARAM_MARKER) {
      Segment::Param(name.to_owned())
    } else {
      Segment::Literal(raw.to_owned())
    }
  }
}

/// Splits a registered path into segments. Empty segments are discarded, so
/// leading, trailing, and doubled slashes are insignificant.
pub fn parse_path(path: &str) -> Vec<Segment> {
  path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(Segment::parse)
    .collect()
}

/// Decodes one request path segment. `None` if it is not valid UTF-8 once
/// decoded.
fn decode(raw: &str) -> Option<String> {
  percent_decode_str(raw)
    .decode_utf8()
    .ok()
    .map(|s| s.into_owned())
}

/// One depth of the routing tree.
///
/// Children are tried in order of specificity: an exact literal match first,
/// then the parameter child, then the wildcard. Registration order never
/// affects which child wins.
#[derive(Default)]
pub(crate) struct Node {
  statics: HashMap<String, Node>,
  param: Option<(String, Box<Node>)>,
  wildcard: Option<Box<Node>>,
  endpoints: HashMap<Method, Endpoint>,
}

impl Node {
  /// Registers `endpoint` for `method` at `path`.
  ///
  /// Registering the same path and method twice replaces the earlier
  /// endpoint, which is returned. A rejected path leaves the tree untouched.
  pub(crate) fn insert(
    &mut self,
    path: &str,
    segments: &[Segment],
    method: Method,
    endpoint: Endpoint,
  ) -> Result<Option<Endpoint>, RouteError> {
    self.check(path, segments)?;

    let mut node = self;
    for segment in segments {
      node = match segment {
        Segment::Literal(text) => node.statics.entry(text.clone()).or_default(),
        Segment::Param(name) => {
          let (_, child) = node
            .param
            .get_or_insert_with(|| (name.clone(), Box::new(Node::default())));
          &mut **child
        }
        Segment::Wildcard => &mut **node.wildcard.get_or_insert_with(Box::default),
      };
    }

    Ok(node.endpoints.insert(method, endpoint))
  }

  /// Validates `segments` against each other and against the existing tree.
  fn check(&self, path: &str, segments: &[Segment]) -> Result<(), RouteError> {
    let mut names = HashSet::new();
    let mut node = Some(self);

    for (i, segment) in segments.iter().enumerate() {
      node = match segment {
        Segment::Literal(text) => node.and_then(|node| node.statics.get(text)),

        Segment::Param(name) => {
          if name.is_empty() {
            return Err(RouteError::EmptyParameter { path: path.into() });
          }
          if name == WILDCARD_KEY {
            return Err(RouteError::ReservedParameter {
              path: path.into(),
              name: name.clone(),
            });
          }
          if !names.insert(name.as_str()) {
            return Err(RouteError::DuplicateParameter {
              path: path.into(),
              name: name.clone(),
            });
          }

          match node.and_then(|node| node.param.as_ref()) {
            Some((existing, _)) if existing != name => {
              return Err(RouteError::ParameterConflict {
                path: path.into(),
                name: name.clone(),
                existing: existing.clone(),
              });
            }
            Some((_, child)) => Some(&**child),
            None => None,
          }
        }

        Segment::Wildcard => {
          if i + 1 != segments.len() {
            return Err(RouteError::WildcardNotLast { path: path.into() });
          }
          node.and_then(|node| node.wildcard.as_deref())
        }
      };
    }

    Ok(())
  }

  /// Finds the endpoint for `method` at the request path `path`, capturing
  /// percent-decoded parameters along the way.
  ///
  /// The walk never backtracks: once a segment is consumed by a literal child,
  /// the parameter and wildcard children of that depth are not revisited if
  /// the match later fails.
  pub(crate) fn at(&self, path: &str, method: &Method) -> Option<(&Endpoint, Params)> {
    let mut node = self;
    let mut params = Params::default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    while let Some(raw) = segments.next() {
      let segment = decode(raw)?;

      if let Some(child) = node.statics.get(&segment) {
        node = child;
      } else if let Some((name, child)) = &node.param {
        params.push(name.clone(), segment);
        node = child;
      } else if let Some(child) = &node.wildcard {
        let mut rest = vec![segment];
        for raw in segments.by_ref() {
          rest.push(decode(raw)?);
        }
        params.push(WILDCARD_KEY.to_owned(), rest.join("/"));
        node = child;
      } else {
        return None;
      }
    }

    node.endpoints.get(method).map(|endpoint| (endpoint, params))
  }

  /// Whether anything at all has been registered under this node.
  pub(crate) fn is_empty(&self) -> bool {
    self.endpoints.is_empty()
      && self.statics.is_empty()
      && self.param.is_none()
      && self.wildcard.is_none()
  }
}
