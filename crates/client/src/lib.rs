//! Server-side SDK for Super Message channels.
//!
//! A channel's web handlers receive requests from the Super Message client
//! carrying a short-lived request token. This crate:
//!
//! - decodes the request context and verifies the token ([`Client::authenticate`]),
//!   caching verified tokens in a [`RequestTokenCache`]
//! - builds the [`Response`] telling the client what to do with the card
//!   that sent the request, including partial [`UpdatePart`] patches
//! - pushes, updates and deletes messages through the platform API
//!
//! ```no_run
//! use supermsg::{Client, MemoryCache, Rejection, Response};
//!
//! # async fn handle(query: &str) -> Response {
//! let client = Client::new("access-token", Some(MemoryCache::with_janitor())).unwrap();
//! match client.authenticate(query).await {
//!     Ok(auth) => Response::new()
//!         .delete_this_message(&auth.context)
//!         .show_success("Done"),
//!     Err(e) => Rejection::of(&e).response(),
//! }
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod logging;
pub mod models;

pub use auth::{Authenticated, Rejection};
pub use client::Client;
pub use config::{default_api_host, ClientConfig};
pub use models::{CreateMessageRequest, MessageContent, UpdateMessageRequest};

pub use supermsg_cache::{
    Clock, ManualClock, MemoryCache, RequestTokenCache, SystemClock, DEFAULT_JANITOR_INTERVAL,
};
pub use supermsg_card::{
    Action, DeleteMessage, Dismiss, InsertOp, InsertPosition, NewMessage, Operation, RemoveOp,
    Response, SetOp, TipType, UnsetOp, UpdateMessage, UpdatePart,
};
pub use supermsg_core::{
    ApiError, Error, ErrorKind, Member, RequestContext, Result, SubscriptionEvent,
};
