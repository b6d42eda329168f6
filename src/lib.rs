//! An HTTP request dispatcher: host-aware trie routing, composable
//! middleware, static file fallback and a failure boundary that turns every
//! error or panic into a response.
//!
//! ```no_run
//! use switchboard::{handler_fn, App, Config, Request, Response, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), switchboard::Error> {
//!   let config = Config::from_file("switchboard.toml").unwrap_or_default();
//!   switchboard::logging::init(config.get_environment());
//!
//!   App::new()
//!     .config(config)
//!     .routes(|r| {
//!       r.get("/", handler_fn(|_: Request| async {
//!         Ok(Response::text(StatusCode::OK, "Hello, World!"))
//!       }));
//!     })
//!     .run()
//!     .await
//! }
//! ```

pub mod action;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod files;
pub mod handler;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod resource;
pub mod router;
pub mod tree;

mod endpoint;
mod server;

pub use action::Action;
pub use app::App;
pub use config::{Config, Environment};
pub use dispatcher::Dispatcher;
pub use error::{BoxError, Error, RouteError};
pub use files::{FileSource, PublicDir};
pub use handler::{handler_fn, BoxedHandler, Handler};
pub use crate::http::{Method, Request, Response, StatusCode};
pub use middleware::{AbortMiddleware, Middleware, Pipeline};
pub use resource::Resource;
pub use router::{Params, Route, Router, Routes};
