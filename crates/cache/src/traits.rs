//! The token cache interface
//!
//! The verifier only talks to this trait, so a durable backend (Redis, a
//! database table) can replace the in-memory cache and survive restarts
//! without re-verifying every token.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use supermsg_core::{Member, Result};

/// Store of verified request tokens
#[async_trait]
pub trait RequestTokenCache: Send + Sync + Debug {
    /// Look up a token.
    ///
    /// Must return `None` once `member.expired_at` has passed, even if the
    /// entry is still physically stored.
    async fn get(&self, token: &str) -> Option<Member>;

    /// Store a verified member until `member.expired_at`.
    ///
    /// An already expired member is not stored. Fails with
    /// [`supermsg_core::Error::Storage`] when the backend is unavailable.
    async fn set(&self, token: &str, member: Member) -> Result<()>;

    /// Forget a token. Deleting an absent token is a no-op.
    async fn delete(&self, token: &str);
}

#[async_trait]
impl<C: RequestTokenCache + ?Sized> RequestTokenCache for Arc<C> {
    async fn get(&self, token: &str) -> Option<Member> {
        (**self).get(token).await
    }

    async fn set(&self, token: &str, member: Member) -> Result<()> {
        (**self).set(token, member).await
    }

    async fn delete(&self, token: &str) {
        (**self).delete(token).await
    }
}
