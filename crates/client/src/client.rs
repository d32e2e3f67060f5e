//! Platform API client and request token verification

use crate::config::ClientConfig;
use crate::models::{
    ApiResponse, CreateMessageRequest, CreateMessageResponse, UpdateMessageRequest,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use supermsg_cache::{Clock, RequestTokenCache, SystemClock};
use supermsg_core::{ApiError, Error, Member, Result, SubscriptionEvent};

const VERIFY_PATH: &str = "/user/verify";
const MESSAGES_PATH: &str = "/messages";

/// Client for the platform server API.
///
/// Cloning is cheap; clones share the connection pool and the token cache.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    cache: Option<Arc<dyn RequestTokenCache>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client for the default API host.
    ///
    /// Without a cache every verification goes to the platform:
    ///
    /// ```no_run
    /// use supermsg::{Client, MemoryCache};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let cached = Client::new("access-token", Some(MemoryCache::with_janitor())).unwrap();
    /// let uncached = Client::new("access-token", None).unwrap();
    /// # }
    /// ```
    pub fn new(
        access_token: impl Into<String>,
        cache: Option<Arc<dyn RequestTokenCache>>,
    ) -> Result<Self> {
        Self::with_config(ClientConfig::new(access_token), cache)
    }

    pub fn with_config(
        config: ClientConfig,
        cache: Option<Arc<dyn RequestTokenCache>>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            cache,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used to decide whether a verified token is
    /// worth caching
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<dyn RequestTokenCache>> {
        self.cache.as_ref()
    }

    /// Resolve the member behind a request token.
    ///
    /// Business errors come back as [`Error::Business`]; use
    /// [`Error::is_invalid_request_token`] to tell an expired or forged token
    /// apart from other rejections. Transport problems are infrastructure
    /// errors and are not retried here.
    ///
    /// A request token stays the same for one member during its lifetime, so
    /// verified tokens are cached until shortly before they expire.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn verify_request_token(&self, request_token: &str) -> Result<Member> {
        if request_token.trim().is_empty() {
            return Err(Error::validation("token", "request token is required"));
        }

        if let Some(cache) = &self.cache {
            if let Some(member) = cache.get(request_token).await {
                tracing::debug!("request token cache hit");
                return Ok(member);
            }
        }

        let request = self
            .http
            .get(self.config.api_url(VERIFY_PATH))
            .query(&[("token", request_token)]);
        let member: Member = self
            .send(request, VERIFY_PATH)
            .await?
            .ok_or_else(|| Error::malformed_response(VERIFY_PATH, "missing member data"))?;

        if let Some(cache) = &self.cache {
            if member.is_cacheable_at(self.clock.now()) {
                if let Err(e) = cache.set(request_token, member.clone()).await {
                    tracing::warn!(error = %e, "failed to cache verified request token");
                }
            } else {
                tracing::debug!("verified request token not cached");
            }
        }

        Ok(member)
    }

    /// [`Client::verify_request_token`] bounded by `timeout`.
    ///
    /// When the bound elapses the outcome is unknown: the result is
    /// [`Error::Timeout`] and nothing is cached.
    pub async fn verify_request_token_with_timeout(
        &self,
        request_token: &str,
        timeout: Duration,
    ) -> Result<Member> {
        tokio::time::timeout(timeout, self.verify_request_token(request_token))
            .await
            .map_err(|_| Error::timeout("verify request token", timeout))?
    }

    /// Push a message to a channel, returning the id the platform assigned
    pub async fn create_message(&self, mut request: CreateMessageRequest) -> Result<i64> {
        request.content.normalize()?;

        let http_request = self
            .http
            .post(self.config.api_url(MESSAGES_PATH))
            .json(&request);
        let created: CreateMessageResponse = self
            .send(http_request, MESSAGES_PATH)
            .await?
            .ok_or_else(|| Error::malformed_response(MESSAGES_PATH, "missing message id"))?;

        tracing::debug!(message_id = created.id, "message created");
        Ok(created.id)
    }

    /// Replace template, title and data of an existing message
    pub async fn update_message(&self, mut request: UpdateMessageRequest) -> Result<()> {
        if request.id <= 0 {
            return Err(Error::validation("id", "message id is required"));
        }
        request.content.normalize()?;

        let http_request = self
            .http
            .put(self.config.api_url(MESSAGES_PATH))
            .json(&request);
        self.send::<IgnoredAny>(http_request, MESSAGES_PATH).await?;

        tracing::debug!(message_id = request.id, "message updated");
        Ok(())
    }

    pub async fn delete_message(&self, message_id: i64) -> Result<()> {
        if message_id <= 0 {
            return Err(Error::validation("id", "message id is required"));
        }

        let http_request = self
            .http
            .delete(self.config.api_url(MESSAGES_PATH))
            .query(&[("id", message_id)]);
        self.send::<IgnoredAny>(http_request, MESSAGES_PATH).await?;

        tracing::debug!(message_id, "message deleted");
        Ok(())
    }

    /// React to the channel subscription hook. A member who unsubscribes
    /// loses their cached request token.
    pub async fn handle_subscription(&self, event: &SubscriptionEvent) {
        match event {
            SubscriptionEvent::Subscribe => {
                tracing::info!("member subscribed to channel");
            }
            SubscriptionEvent::Unsubscribe { request_token } => {
                tracing::info!("member unsubscribed from channel");
                if let Some(cache) = &self.cache {
                    cache.delete(request_token).await;
                }
            }
        }
    }

    /// Send a request and unwrap the platform envelope.
    ///
    /// `endpoint` is the API path used in errors and logs; the full URL
    /// carries tokens and is never logged.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Option<T>> {
        if self.config.access_token.is_empty() {
            return Err(Error::validation("accessToken", "access token is required"));
        }

        let response = request
            .query(&[("accessToken", self.config.access_token.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(endpoint, self.config.timeout)
                } else {
                    Error::transport(endpoint, e)
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&body)
            .map_err(|e| Error::malformed_response(endpoint, e.to_string()))?;

        if envelope.code != 0 {
            tracing::debug!(endpoint, code = envelope.code, "platform rejected request");
            return Err(ApiError::new(envelope.code, envelope.message).into());
        }

        Ok(envelope.data)
    }
}
