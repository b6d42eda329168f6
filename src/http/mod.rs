mod request;
mod response;

#[doc(inline)]
pub use request::Request;

#[doc(inline)]
pub use response::{Response, SERVER_NAME};

#[doc(inline)]
pub use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
