// Authentication configuration loaded from environment variables
// Decision: Load once at startup and inject into constructors; nothing reads
// the environment after boot.

use std::time::Duration;

/// Authentication configuration. Immutable after startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing session tokens.
    pub token_secret: String,
    /// Session token lifetime, fixed at mint time (default: 7 days).
    pub token_lifetime: Duration,
    /// Whether the session cookie carries the `Secure` attribute.
    /// Off for local development over plain HTTP.
    pub cookie_secure: bool,
    /// True when the secret was generated at boot instead of configured.
    /// Generated secrets invalidate all sessions on restart.
    pub generated_secret: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: generate_secret(),
            token_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
            cookie_secure: false,
            generated_secret: true,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let (token_secret, generated_secret) = match std::env::var("AUTH_TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => (secret, false),
            _ => (generate_secret(), true),
        };

        let token_lifetime = std::env::var("AUTH_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(7 * 24 * 60 * 60));

        let cookie_secure = std::env::var("AUTH_COOKIE_SECURE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Self {
            token_secret,
            token_lifetime,
            cookie_secure,
            generated_secret,
        }
    }

    /// True when the process is running on a per-boot generated secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.generated_secret
    }
}

/// Generate a random signing secret for dev mode (64 hex characters).
fn generate_secret() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
