//! Request token caches for the Super Message SDK
//!
//! Verifying a request token costs a round trip to the platform. Tokens stay
//! the same for one member for the whole token lifetime, so caching the
//! verified [`Member`](supermsg_core::Member) until its `expired_at` makes
//! every later request from that member answer immediately.
//!
//! - [`RequestTokenCache`]: the pluggable interface the verifier uses
//! - [`MemoryCache`]: a process-local implementation
//! - [`Clock`]: the time source expiry decisions are made against

pub mod clock;
pub mod memory;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::{MemoryCache, DEFAULT_JANITOR_INTERVAL};
pub use traits::RequestTokenCache;
