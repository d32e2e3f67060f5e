//! Card instructions for the Super Message client
//!
//! Nothing here renders anything. These types describe how the client
//! should change the card a request came from:
//!
//! - [`operations`]: partial updates (`$set`, `$unset`, `$insert`,
//!   `$remove`) batched in an [`UpdatePart`]
//! - [`response`]: the per-request [`Response`] envelope
//!
//! ```
//! use supermsg_card::{RemoveOp, Response, SetOp, UpdatePart};
//!
//! let part = UpdatePart::new()
//!     .set(SetOp::new().set("list.0.done", true))
//!     .remove(RemoveOp::new("list", [0]));
//! let body = Response::new()
//!     .update_part_data(part)
//!     .show_success("done")
//!     .output()
//!     .unwrap();
//! assert!(!body.is_empty());
//! ```

#[cfg(feature = "axum")]
mod axum_response;
pub mod operations;
pub mod response;

pub use operations::{
    InsertOp, InsertPosition, Operation, RemoveOp, SetOp, UnsetOp, UpdatePart,
};
pub use response::{
    Action, DeleteMessage, Dismiss, NewMessage, Response, TipType, UpdateMessage,
};
