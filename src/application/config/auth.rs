use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime of issued bearer tokens in hours; `None` means tokens never expire.
    pub token_ttl_hours: Option<i64>,
    /// First admin account created on startup when both values are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let token_ttl_hours = env::var("EDUPLAY_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(168);

        Self {
            token_ttl_hours: (token_ttl_hours > 0).then_some(token_ttl_hours),
            admin_email: env::var("EDUPLAY_ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("EDUPLAY_ADMIN_PASSWORD")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}
