//! # Payments Types
//!
//! Wire models and port traits for the payments API client.
//! This crate performs no IO: only data structures, the tagged unions they
//! carry, and trait definitions.
//!
//! ## Layout
//!
//! - `domain/` - Resource models (payments, payouts, merchant accounts, providers, tokens)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Envelopes shared by endpoints
//! - `error/` - Auth, transport and signing errors

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::*;
pub use dto::{AuthTokenRequest, ListResponse, ProblemDetails, TokenErrorResponse};
pub use error::{AuthError, AuthFailure, SigningError, TransportError};
pub use ports::{
    AuthTokenSource, Clock, HttpRequest, HttpResponse, HttpTransport, Method, RequestSigner,
    TokenCacheStore,
};
