//! Client configuration

use once_cell::sync::Lazy;
use std::fmt;
use std::time::Duration;
use supermsg_core::{API_PATH_PREFIX, DEFAULT_API_HOST, SM_API_VAR};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("supermsg-rust/", env!("CARGO_PKG_VERSION"));

// Read once; later changes to the environment are not observed
static API_HOST: Lazy<String> = Lazy::new(|| api_host_from(std::env::var(SM_API_VAR).ok()));

/// API host for this process: `SM_API` when set and non-blank, otherwise the
/// public platform host
pub fn default_api_host() -> &'static str {
    API_HOST.as_str()
}

fn api_host_from(value: Option<String>) -> String {
    value
        .map(|host| host.trim().trim_end_matches('/').to_string())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
}

/// Settings for talking to the platform API
#[derive(Clone)]
pub struct ClientConfig {
    /// Base host, e.g. `https://api.super-message.com`
    pub api_host: String,
    /// Path prefix of the API version
    pub path_prefix: String,
    /// Channel access token from the developer console
    pub access_token: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            api_host: default_api_host().to_string(),
            path_prefix: API_PATH_PREFIX.to_string(),
            access_token: access_token.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host_from(Some(api_host.into()));
        self
    }

    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.api_host, self.path_prefix, path)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_host", &self.api_host)
            .field("path_prefix", &self.path_prefix)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
