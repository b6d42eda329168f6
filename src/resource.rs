use crate::error::Error;
use crate::http::{Request, Response};
use async_trait::async_trait;

/// A RESTful controller, registered with
/// [`Routes::resource`](crate::router::Routes::resource).
///
/// Every action defaults to `404 Page not found`, so implementors only
/// provide the actions they support. Member actions find the identifier in
/// `req.param("id")`.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
  /// `GET /name`
  async fn index(&self, _req: Request) -> Result<Response, Error> {
    Err(Error::not_found())
  }

  /// `POST /name`
  async fn store(&self, _req: Request) -> Result<Response, Error> {
    Err(Error::not_found())
  }

  /// `GET /name/:id`
  async fn show(&self, _req: Request) -> Result<Response, Error> {
    Err(Error::not_found())
  }

  /// `PUT` or `PATCH /name/:id`
  async fn update(&self, _req: Request) -> Result<Response, Error> {
    Err(Error::not_found())
  }

  /// `DELETE /name/:id`
  async fn destroy(&self, _req: Request) -> Result<Response, Error> {
    Err(Error::not_found())
  }
}
