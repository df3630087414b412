//! Port traits (interfaces for adapters).
//!
//! The auth cache and the resource clients depend on these traits, not on
//! concrete transports or stores.

mod auth;
mod http;

pub use auth::{AuthTokenSource, Clock, TokenCacheStore};
pub use http::{HttpRequest, HttpResponse, HttpTransport, Method, RequestSigner};
