// Session token codec
// Decision: Use HS256 for simplicity (symmetric key)
// Decision: Tokens are self-contained; possession of a validly signed,
// unexpired token is the session. No server-side session table, no
// revocation: a token stays valid for its full lifetime even if the
// account's password changes afterwards.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signed claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (account ID)
    sub: String,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
}

/// Issues and verifies signed, expiring session tokens.
///
/// The signing secret is injected at construction so the codec can be tested
/// in isolation; callers must not reach for ambient configuration.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, lifetime: std::time::Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::from_std(lifetime).unwrap_or_else(|_| Duration::days(7)),
        }
    }

    /// Issue a token for an account, expiring `lifetime` from now.
    pub fn issue(&self, account_id: Uuid) -> Result<String> {
        self.issue_at(account_id, Utc::now())
    }

    fn issue_at(&self, account_id: Uuid, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode session token")
    }

    /// Resolve a token to the account it was issued for.
    ///
    /// Malformed structure, signature mismatch and past expiry all collapse
    /// into the same `None`; callers never learn why a credential failed.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key", StdDuration::from_secs(7 * 24 * 60 * 60))
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let account_id = Uuid::now_v7();

        let token = codec.issue(account_id).unwrap();
        assert_eq!(codec.verify(&token), Some(account_id));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let codec = codec();
        let account_id = Uuid::now_v7();

        // Issued 8 days ago with a 7 day lifetime: correctly signed, expired.
        let issued = Utc::now() - Duration::days(8);
        let token = codec.issue_at(account_id, issued).unwrap();
        assert_eq!(codec.verify(&token), None);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let codec = codec();
        let token = codec.issue(Uuid::now_v7()).unwrap();

        // Corrupt one character in the middle of the token.
        let mid = token.len() / 2;
        let original = token.as_bytes()[mid];
        let replacement = if original == b'A' { b'B' } else { b'A' };
        let mut bytes = token.into_bytes();
        bytes[mid] = replacement;
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(codec.verify(&tampered), None);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let codec = codec();
        let other = TokenCodec::new("another-secret", StdDuration::from_secs(60));

        let token = codec.issue(Uuid::now_v7()).unwrap();
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let codec = codec();
        assert_eq!(codec.verify("not-a-token"), None);
        assert_eq!(codec.verify(""), None);
    }
}
