use crate::error::Error;
use crate::handler::Handler;
use crate::http::{Request, Response};
use crate::resource::Resource;
use async_trait::async_trait;
use std::sync::Arc;

/// One of the RESTful actions a [`Resource`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Index,
  Store,
  Show,
  Update,
  Destroy,
}

/// Routes a request to a single action of a shared resource.
pub(crate) struct ResourceHandler {
  resource: Arc<dyn Resource>,
  action: Action,
}

impl ResourceHandler {
  pub(crate) fn new(resource: Arc<dyn Resource>, action: Action) -> Self {
    Self { resource, action }
  }
}

#[async_trait]
impl Handler for ResourceHandler {
  async fn call(&self, req: Request) -> Result<Response, Error> {
    match self.action {
      Action::Index => self.resource.index(req).await,
      Action::Store => self.resource.store(req).await,
      Action::Show => self.resource.show(req).await,
      Action::Update => self.resource.update(req).await,
      Action::Destroy => self.resource.destroy(req).await,
    }
  }
}
