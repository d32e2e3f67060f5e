/// Constants used throughout the supermsg codebase
// Platform API
pub const DEFAULT_API_HOST: &str = "https://api.super-message.com";
pub const API_PATH_PREFIX: &str = "/v1";

// Environment variable names
pub const SM_API_VAR: &str = "SM_API";

// Inbound query parameter names
pub const PARAM_REQUEST_TOKEN: &str = "rt";
pub const PARAM_TOKEN_EXPIRED_AT: &str = "rte";
pub const PARAM_CHANNEL_ID: &str = "cid";
pub const PARAM_MESSAGE_ID: &str = "id";
pub const PARAM_MESSAGE_LOCAL_ID: &str = "lid";
pub const PARAM_TEMPLATE_ID: &str = "tid";
pub const PARAM_TEMPLATE_VERSION: &str = "tv";

// Subscription hook parameter names
pub const PARAM_HOOK_ACTION: &str = "_a";
pub const PARAM_HOOK_REQUEST_TOKEN: &str = "_rt";

// Business error codes reported for an invalid or expired request token
pub const INVALID_REQUEST_TOKEN_CODES: &[i32] = &[10000, 10001];

// Identities expiring within this many seconds are not cached
pub const CACHE_EXPIRY_MARGIN_SECS: i64 = 10;

// Transient tip defaults
pub const DEFAULT_DISMISS_DURATION_MS: u32 = 1500;

// Version field written into every response envelope
pub const RESPONSE_PROTOCOL_VERSION: i32 = 0;
