use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::http::{header, HeaderValue, Request, Response};
use hyper::service::Service;
use hyper::Body;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tracing::error;

/// Serves `dispatcher` on the configured address until the server fails.
pub(crate) async fn serve(dispatcher: Dispatcher, config: &Config) -> Result<(), Error> {
  let addr = SocketAddr::new(config.address, config.port);

  let server = hyper::Server::try_bind(&addr)?
    .http1_keepalive(config.keep_alive.is_some())
    .http2_keep_alive_interval(config.keep_alive.map(Duration::from_secs))
    .serve(MakeDispatchService::new(dispatcher));

  if let Err(err) = server.await {
    error!(%addr, error = %err, "server error");
    return Err(err.into());
  }
  Ok(())
}

pub(crate) struct MakeDispatchService(DispatchService);

impl MakeDispatchService {
  pub fn new(dispatcher: Dispatcher) -> Self {
    Self(DispatchService(Arc::new(dispatcher)))
  }
}

impl<T> Service<T> for MakeDispatchService {
  type Response = DispatchService;
  type Error = hyper::Error;
  type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

  fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
    Poll::Ready(Ok(()))
  }

  fn call(&mut self, _: T) -> Self::Future {
    let service = self.0.clone();
    let fut = async move { Ok(service) };
    Box::pin(fut)
  }
}

#[derive(Clone)]
pub(crate) struct DispatchService(Arc<Dispatcher>);

impl Service<hyper::Request<Body>> for DispatchService {
  type Response = hyper::Response<Body>;
  type Error = hyper::Error;
  type Future = Pin<Box<dyn Future<Output = hyper::Result<hyper::Response<Body>>> + Send>>;

  fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
    Poll::Ready(Ok(()))
  }

  fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
    Box::pin(dispatch(self.0.clone(), req))
  }
}

async fn dispatch(
  dispatcher: Arc<Dispatcher>,
  req: hyper::Request<Body>,
) -> hyper::Result<hyper::Response<Body>> {
  let req = into_request(req).await?;
  Ok(into_response(dispatcher.handle(req).await))
}

/// Buffers the body and carries the URI authority over to `Host` when the
/// client sent none, as HTTP/2 clients do.
async fn into_request(req: hyper::Request<Body>) -> hyper::Result<Request> {
  let (parts, body) = req.into_parts();
  let body = hyper::body::to_bytes(body).await?;

  let mut headers = parts.headers;
  if !headers.contains_key(header::HOST) {
    let authority = parts
      .uri
      .authority()
      .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok());
    if let Some(authority) = authority {
      headers.insert(header::HOST, authority);
    }
  }

  Ok(Request::from_parts(
    parts.method,
    parts.uri.path(),
    parts.uri.query(),
    headers,
    body,
  ))
}

fn into_response(res: Response) -> hyper::Response<Body> {
  let (status, headers, body) = res.into_parts();
  let mut out = hyper::Response::new(Body::from(body));
  *out.status_mut() = status;
  *out.headers_mut() = headers;
  out
}
