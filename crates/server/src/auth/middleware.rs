// Request authentication extractor
// Decision: Support both cookie-based (pages) and header-based (API) auth
//
// Resolution order: `Authorization: Bearer` header, then the session cookie
// set at login/signup. A missing credential and an invalid one are the same
// 401 to the caller. The extractor never touches storage; it only verifies
// the token signature and expiry.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

use super::{config::AuthConfig, token::TokenCodec, SESSION_COOKIE};
use crate::api::error::ApiError;

/// Auth state shared across routes: read-only after startup.
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub tokens: Arc<TokenCodec>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        let tokens = Arc::new(TokenCodec::new(
            &config.token_secret,
            config.token_lifetime,
        ));
        Self { config, tokens }
    }
}

/// The authenticated account for this request.
///
/// Required parameter of every protected handler; rejecting with 401 happens
/// before the handler body runs, so no repository call can execute without a
/// resolved identity.
#[derive(Debug, Clone, Copy)]
pub struct CurrentAccount {
    pub id: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);

        let id = candidate_token(parts)
            .and_then(|token| auth.tokens.verify(&token))
            .ok_or_else(|| {
                tracing::debug!(path = %parts.uri.path(), "rejected unauthenticated request");
                ApiError::Unauthenticated("authentication required")
            })?;

        Ok(CurrentAccount { id })
    }
}

/// Extract the candidate token: Bearer header first, cookie as fallback.
fn candidate_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        if let Some(token) = value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
            return Some(token.to_string());
        }
    }

    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}
