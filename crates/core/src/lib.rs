//! Core domain types, errors, and constants for the Super Message SDK.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum, its `ErrorKind` classification and the
//!   platform's `ApiError`.
//! - **`member`**: the identity a request token resolves to.
//! - **`query`**: `RequestContext`, decoded from the query string the platform
//!   client attaches to each request.
//! - **`subscription`**: channel subscribe / unsubscribe hook events.
//! - **`constants`**: wire parameter names, error codes and defaults.

pub mod constants;
pub mod errors;
pub mod member;
pub mod query;
pub mod subscription;

pub use self::{
    constants::*,
    errors::{ApiError, Error, ErrorKind, Result},
    member::Member,
    query::RequestContext,
    subscription::SubscriptionEvent,
};
