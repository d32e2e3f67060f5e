//! Decoding of the query parameters the platform client attaches to every
//! request it sends to a developer server.

use crate::constants::{
    PARAM_CHANNEL_ID, PARAM_MESSAGE_ID, PARAM_MESSAGE_LOCAL_ID, PARAM_REQUEST_TOKEN,
    PARAM_TEMPLATE_ID, PARAM_TEMPLATE_VERSION, PARAM_TOKEN_EXPIRED_AT,
};
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::str::FromStr;

/// Per-request context decoded from the inbound query string.
///
/// `message_id` is `0` when the request did not come from a stored message,
/// e.g. a menu action that makes the client render a fresh local card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_token: String,
    /// Expiry hint for the request token, unix seconds
    pub token_expired_at: i64,
    pub channel_id: String,
    pub message_id: i64,
    pub message_local_id: i64,
    pub template_id: String,
    pub template_version: i32,
}

impl RequestContext {
    /// Decode from a raw, URL-encoded query string (without the leading `?`)
    pub fn from_query(query: &str) -> Result<Self> {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Decode from already split key/value pairs. The first occurrence of a
    /// key wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in pairs {
            params
                .entry(key.as_ref().to_string())
                .or_insert_with(|| value.as_ref().to_string());
        }
        Self::decode(&params)
    }

    fn decode(params: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| params.get(key).map(String::as_str).unwrap_or("");

        // rt/rte/cid are always sent by the client
        let request_token = get(PARAM_REQUEST_TOKEN).trim().to_string();
        if request_token.is_empty() {
            return Err(Error::validation(
                PARAM_REQUEST_TOKEN,
                "request token is required",
            ));
        }

        let rte = get(PARAM_TOKEN_EXPIRED_AT);
        if rte.is_empty() {
            return Err(Error::validation(
                PARAM_TOKEN_EXPIRED_AT,
                "token expiration is required",
            ));
        }
        let token_expired_at = parse_field::<i64>(PARAM_TOKEN_EXPIRED_AT, rte)?;

        let channel_id = get(PARAM_CHANNEL_ID).trim().to_string();
        if channel_id.is_empty() {
            return Err(Error::validation(PARAM_CHANNEL_ID, "channel id not presented"));
        }

        let mut context = RequestContext {
            request_token,
            token_expired_at,
            channel_id,
            template_id: get(PARAM_TEMPLATE_ID).trim().to_string(),
            ..Default::default()
        };

        if let Some(id) = optional(get(PARAM_MESSAGE_ID)) {
            context.message_id = parse_field(PARAM_MESSAGE_ID, id)?;
        }
        if let Some(lid) = optional(get(PARAM_MESSAGE_LOCAL_ID)) {
            context.message_local_id = parse_field(PARAM_MESSAGE_LOCAL_ID, lid)?;
        }
        if let Some(tv) = optional(get(PARAM_TEMPLATE_VERSION)) {
            context.template_version = parse_field(PARAM_TEMPLATE_VERSION, tv)?;
        }

        tracing::trace!(
            channel_id = %context.channel_id,
            message_id = context.message_id,
            "decoded request context"
        );

        Ok(context)
    }

    /// Check the fields a request triggered from a message card must carry
    pub fn check_for_message_request(&self) -> Result<()> {
        if self.message_id < 0 {
            return Err(Error::validation(PARAM_MESSAGE_ID, "invalid message id"));
        }
        if self.message_local_id < 0 {
            return Err(Error::validation(
                PARAM_MESSAGE_LOCAL_ID,
                "invalid local message id",
            ));
        }
        if self.template_id.is_empty() {
            return Err(Error::validation(PARAM_TEMPLATE_ID, "template id is required"));
        }
        if self.template_version <= 0 {
            return Err(Error::validation(
                PARAM_TEMPLATE_VERSION,
                "invalid template version number",
            ));
        }
        Ok(())
    }
}

impl FromStr for RequestContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_query(s.strip_prefix('?').unwrap_or(s))
    }
}

fn optional(raw: &str) -> Option<&str> {
    (!raw.is_empty()).then_some(raw)
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| Error::validation(field, format!("invalid {field} value '{raw}': {e}")))
}
