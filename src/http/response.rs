use crate::http::{header, HeaderMap, HeaderValue, StatusCode};
use bytes::Bytes;
use cookie::Cookie;
use serde_json::json;
use tracing::warn;

/// The value of the `Server` header stamped on every response.
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const TEXT: &str = "text/plain; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

/// An HTTP response: status, headers, and a fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
  status: StatusCode,
  headers: HeaderMap<HeaderValue>,
  body: Bytes,
}

impl Response {
  /// An empty response with no content type.
  pub fn new(status: StatusCode) -> Self {
    let mut headers = HeaderMap::new();
    headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
    Self {
      status,
      headers,
      body: Bytes::new(),
    }
  }

  /// A response with an explicit body and optional content type.
  pub fn bytes(status: StatusCode, body: impl Into<Bytes>, content_type: Option<&str>) -> Self {
    let mut res = Self::new(status).with_body(body);
    if let Some(content_type) = content_type {
      res = res.with_header(header::CONTENT_TYPE.as_str(), content_type);
    }
    res
  }

  pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
    Self::bytes(status, text.into(), Some(TEXT))
  }

  /// Wraps `html` in a minimal UTF-8 document.
  pub fn html(status: StatusCode, html: impl AsRef<str>) -> Self {
    let document = format!(
      "<html><meta charset=\"UTF-8\"><body>{}</body></html>",
      html.as_ref()
    );
    Self::bytes(status, document, Some(HTML))
  }

  pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
    Self::bytes(status, value.to_string(), Some(JSON))
  }

  /// A JSON error body: `{"error": true, "message": ...}`.
  pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
    Self::json(
      status,
      &json!({
        "error": true,
        "message": message.into(),
      }),
    )
  }

  /// A `301 Moved Permanently` pointing at `location`.
  pub fn redirect(location: &str) -> Self {
    Self::new(StatusCode::MOVED_PERMANENTLY).with_header(header::LOCATION.as_str(), location)
  }

  /// Sets a header, replacing any previous value. Invalid values are dropped.
  pub fn with_header(mut self, name: &str, value: &str) -> Self {
    self.set_header(name, value);
    self
  }

  pub fn set_header(&mut self, name: &str, value: &str) {
    let name = match header::HeaderName::from_bytes(name.as_bytes()) {
      Ok(name) => name,
      Err(_) => {
        warn!(header = name, "dropping header with an invalid name");
        return;
      }
    };
    match HeaderValue::from_str(value) {
      Ok(value) => {
        self.headers.insert(name, value);
      }
      Err(_) => warn!(header = %name, "dropping header with an invalid value"),
    }
  }

  pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
    self.body = body.into();
    self
  }

  /// Appends a `Set-Cookie` header.
  pub fn set_cookie(&mut self, cookie: Cookie<'_>) {
    match HeaderValue::from_str(&cookie.to_string()) {
      Ok(value) => {
        self.headers.append(header::SET_COOKIE, value);
      }
      Err(_) => warn!(cookie = cookie.name(), "dropping cookie with an invalid value"),
    }
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }

  pub fn set_status(&mut self, status: StatusCode) {
    self.status = status;
  }

  pub fn headers(&self) -> &HeaderMap<HeaderValue> {
    &self.headers
  }

  pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
    &mut self.headers
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|v| v.to_str().ok())
  }

  pub fn content_type(&self) -> Option<&str> {
    self.header(header::CONTENT_TYPE.as_str())
  }

  pub fn body(&self) -> &Bytes {
    &self.body
  }

  pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap<HeaderValue>, Bytes) {
    (self.status, self.headers, self.body)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_response_names_the_server() {
    let res = Response::new(StatusCode::NO_CONTENT);
    assert_eq!(res.header("server"), Some(SERVER_NAME));
    assert_eq!(res.content_type(), None);
    assert!(res.body().is_empty());
  }

  #[test]
  fn redirect_sets_location() {
    let url = "http://tanner.xyz";
    let res = Response::redirect(url);
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.header("Location"), Some(url));
  }

  #[test]
  fn html_is_wrapped_in_a_document() {
    let res = Response::html(StatusCode::OK, "<p>hi</p>");
    assert_eq!(res.content_type(), Some(HTML));
    assert_eq!(
      &res.body()[..],
      &b"<html><meta charset=\"UTF-8\"><body><p>hi</p></body></html>"[..]
    );
  }

  #[test]
  fn error_bodies_are_json() {
    let res = Response::error(StatusCode::INTERNAL_SERVER_ERROR, "nope");
    assert_eq!(res.content_type(), Some(JSON));
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "nope");
  }

  #[test]
  fn header_names_are_case_insensitive_and_unique() {
    let res = Response::text(StatusCode::OK, "a")
      .with_header("X-Thing", "1")
      .with_header("x-thing", "2");
    assert_eq!(res.headers().get_all("x-thing").iter().count(), 1);
    assert_eq!(res.header("X-THING"), Some("2"));
  }

  #[test]
  fn cookies_are_appended() {
    let mut res = Response::new(StatusCode::OK);
    res.set_cookie(Cookie::new("a", "1"));
    res.set_cookie(Cookie::new("b", "2"));
    let cookies: Vec<_> = res
      .headers()
      .get_all(header::SET_COOKIE)
      .iter()
      .map(|v| v.to_str().unwrap().to_owned())
      .collect();
    assert_eq!(cookies, vec!["a=1".to_owned(), "b=2".to_owned()]);
  }

  #[test]
  fn arbitrary_status_codes_are_allowed() {
    let status = StatusCode::from_u16(420).unwrap();
    let res = Response::text(status, "Enhance your calm");
    assert_eq!(res.status().as_u16(), 420);
  }
}
