use crate::http::{header, HeaderMap, HeaderValue, Method};
use crate::router::Params;
use bytes::Bytes;
use cookie::Cookie;
use tracing::warn;

/// An incoming HTTP request.
///
/// The path is kept exactly as received; captured route parameters are
/// percent-decoded by the router when the request is matched.
#[derive(Debug, Clone)]
pub struct Request {
  method: Method,
  path: String,
  query: Option<String>,
  headers: HeaderMap<HeaderValue>,
  body: Bytes,
  params: Params,
}

impl Request {
  /// Creates a request for `path`, which may carry a `?query` suffix.
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    let mut path = path.into();
    let query = path.find('?').map(|i| {
      let query = path[i + 1..].to_owned();
      path.truncate(i);
      query
    });

    Self {
      method,
      path,
      query,
      headers: HeaderMap::new(),
      body: Bytes::new(),
      params: Params::default(),
    }
  }

  pub fn get(path: impl Into<String>) -> Self {
    Self::new(Method::GET, path)
  }

  pub fn post(path: impl Into<String>) -> Self {
    Self::new(Method::POST, path)
  }

  /// Appends a header. Values that are not valid header text are dropped.
  pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
    match HeaderValue::from_str(value) {
      Ok(value) => {
        self.headers.append(name, value);
      }
      Err(_) => warn!(header = name, "dropping header with an invalid value"),
    }
    self
  }

  pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
    self.body = body.into();
    self
  }

  pub(crate) fn from_parts(
    method: Method,
    path: &str,
    query: Option<&str>,
    headers: HeaderMap<HeaderValue>,
    body: Bytes,
  ) -> Self {
    Self {
      method,
      path: path.to_owned(),
      query: query.map(str::to_owned),
      headers,
      body,
      params: Params::default(),
    }
  }

  pub fn method(&self) -> &Method {
    &self.method
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn query(&self) -> Option<&str> {
    self.query.as_deref()
  }

  pub fn headers(&self) -> &HeaderMap<HeaderValue> {
    &self.headers
  }

  pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
    &mut self.headers
  }

  /// Looks up a header by name, ignoring case.
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|v| v.to_str().ok())
  }

  /// The value of the `Host` header, if any.
  pub fn host(&self) -> Option<&str> {
    self.header(header::HOST.as_str())
  }

  pub fn body(&self) -> &Bytes {
    &self.body
  }

  /// The route parameters captured when this request was matched.
  pub fn params(&self) -> &Params {
    &self.params
  }

  pub fn param(&self, name: &str) -> Option<&str> {
    self.params.get(name)
  }

  pub(crate) fn set_params(&mut self, params: Params) {
    self.params = params;
  }

  /// Cookies sent with the request. Malformed pairs are skipped.
  pub fn cookies(&self) -> Vec<Cookie<'static>> {
    self
      .headers
      .get_all(header::COOKIE)
      .iter()
      .filter_map(|v| v.to_str().ok())
      .flat_map(|v| v.split(';'))
      .map(str::trim)
      .filter(|pair| !pair.is_empty())
      .filter_map(|pair| Cookie::parse(pair.to_owned()).ok())
      .collect()
  }

  pub fn cookie(&self, name: &str) -> Option<String> {
    self
      .cookies()
      .into_iter()
      .find(|c| c.name() == name)
      .map(|c| c.value().to_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_the_query_from_the_path() {
    let req = Request::get("/search?q=rust&page=2");
    assert_eq!(req.path(), "/search");
    assert_eq!(req.query(), Some("q=rust&page=2"));

    let req = Request::get("/plain");
    assert_eq!(req.path(), "/plain");
    assert_eq!(req.query(), None);
  }

  #[test]
  fn header_lookup_ignores_case() {
    let req = Request::get("/").with_header("Host", "vapor.test");
    assert_eq!(req.host(), Some("vapor.test"));
    assert_eq!(req.header("HOST"), Some("vapor.test"));
    assert_eq!(req.header("x-missing"), None);
  }

  #[test]
  fn invalid_header_values_are_dropped() {
    let req = Request::get("/").with_header("x-bad", "line\nbreak");
    assert!(req.headers().get("x-bad").is_none());
  }

  #[test]
  fn parses_cookies() {
    let req = Request::get("/")
      .with_header("Cookie", "session=abc123; theme=dark")
      .with_header("Cookie", "lang=en");

    assert_eq!(req.cookie("session").as_deref(), Some("abc123"));
    assert_eq!(req.cookie("theme").as_deref(), Some("dark"));
    assert_eq!(req.cookie("lang").as_deref(), Some("en"));
    assert_eq!(req.cookies().len(), 3);
  }

  #[test]
  fn params_start_empty() {
    let req = Request::get("/users/1");
    assert!(req.params().is_empty());
    assert_eq!(req.param("id"), None);
  }
}
