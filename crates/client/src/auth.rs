//! Authenticating inbound card requests
//!
//! The decoded [`RequestContext`] and the verified [`Member`] are handed back
//! together and passed explicitly to whatever handles the request.

use crate::client::Client;
use supermsg_card::Response;
use supermsg_core::{Error, ErrorKind, Member, RequestContext, Result};

/// A request whose token has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub context: RequestContext,
    pub member: Member,
}

impl Client {
    /// Decode the request query and verify its token
    pub async fn authenticate(&self, query: &str) -> Result<Authenticated> {
        let context = RequestContext::from_query(query)?;
        let member = self.verify_request_token(&context.request_token).await?;
        Ok(Authenticated { context, member })
    }
}

/// How a failed authentication should be presented to the member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The request itself is malformed
    InvalidRequest,
    /// The request token is invalid or expired
    Reauthenticate,
    /// Anything else; the member may simply try again later
    Unavailable,
}

impl Rejection {
    pub fn of(error: &Error) -> Self {
        if error.is_invalid_request_token() {
            return Rejection::Reauthenticate;
        }
        match error.kind() {
            ErrorKind::Validation => Rejection::InvalidRequest,
            ErrorKind::Business | ErrorKind::Infrastructure => Rejection::Unavailable,
        }
    }

    pub fn default_tip(self) -> &'static str {
        match self {
            Rejection::InvalidRequest => "Unable to parse the request",
            Rejection::Reauthenticate => "Unable to verify your identity, the request token is invalid",
            Rejection::Unavailable => "The service is temporarily unavailable",
        }
    }

    /// Error tip with the default wording
    pub fn response(self) -> Response {
        Response::error(self.default_tip())
    }
}
