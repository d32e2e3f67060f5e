//! Channel subscription hook
//!
//! The platform calls the developer's hook URL with `_a=subscribe` or
//! `_a=unsubscribe`. Unsubscribe also carries the member's request token in
//! `_rt` so that any cached identity for it can be dropped.

use crate::constants::{PARAM_HOOK_ACTION, PARAM_HOOK_REQUEST_TOKEN};
use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    Subscribe,
    Unsubscribe { request_token: String },
}

impl SubscriptionEvent {
    pub fn from_query(query: &str) -> Result<Self> {
        let mut action = None;
        let mut request_token = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                PARAM_HOOK_ACTION if action.is_none() => action = Some(value.into_owned()),
                PARAM_HOOK_REQUEST_TOKEN if request_token.is_none() => {
                    request_token = Some(value.trim().to_string())
                }
                _ => {}
            }
        }

        match action.as_deref() {
            Some("subscribe") => Ok(SubscriptionEvent::Subscribe),
            Some("unsubscribe") => match request_token {
                Some(token) if !token.is_empty() => Ok(SubscriptionEvent::Unsubscribe {
                    request_token: token,
                }),
                _ => Err(Error::validation(
                    PARAM_HOOK_REQUEST_TOKEN,
                    "request token is required for unsubscribe",
                )),
            },
            Some(other) => Err(Error::validation(
                PARAM_HOOK_ACTION,
                format!("unknown subscription action '{other}'"),
            )),
            None => Err(Error::validation(
                PARAM_HOOK_ACTION,
                "subscription action is required",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe() {
        assert_eq!(
            SubscriptionEvent::from_query("_a=subscribe&rt=x&rte=1&cid=c").unwrap(),
            SubscriptionEvent::Subscribe
        );
    }

    #[test]
    fn test_unsubscribe_carries_token() {
        assert_eq!(
            SubscriptionEvent::from_query("_a=unsubscribe&_rt=tok").unwrap(),
            SubscriptionEvent::Unsubscribe {
                request_token: "tok".to_string()
            }
        );
        assert!(SubscriptionEvent::from_query("_a=unsubscribe").is_err());
    }

    #[test]
    fn test_unknown_action() {
        let err = SubscriptionEvent::from_query("_a=ping").unwrap_err();
        assert!(err.to_string().contains("ping"));
        assert!(SubscriptionEvent::from_query("").is_err());
    }
}
