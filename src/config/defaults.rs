//! Default configuration values

/// Default base address requests are issued against
pub fn default_base_url() -> String {
    "https://api.coincap.io/v2".to_string()
}

/// Default whole-request timeout in seconds
pub const fn default_timeout() -> u64 {
    30
}

/// Default connect timeout in seconds
pub const fn default_connect_timeout() -> u64 {
    10
}

/// Default `User-Agent` header
pub fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

/// TCP keepalive interval in seconds
pub const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 60;

/// Idle pooled connections are closed after this many seconds
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;
