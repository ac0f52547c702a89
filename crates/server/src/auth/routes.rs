// Authentication HTTP routes
// Decision: Use /v1/auth/* prefix for auth endpoints (consistent with the
// resource API routes)
// Decision: Login failures share one message; the response never reveals
// whether the email exists or the password was wrong.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tokio::task;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    middleware::{AuthState, CurrentAccount},
    SESSION_COOKIE,
};
use crate::api::error::ApiError;
use crate::storage::{password, AccountRow, CreateAccountRow};
use crate::AppState;

/// Login request. Absent fields are reported as invalid input, not as a
/// deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to the part of the email before the `@`.
    pub name: Option<String>,
}

/// Public account info
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&AccountRow> for AccountInfo {
    fn from(row: &AccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email.clone(),
            name: row.name.clone(),
        }
    }
}

/// Successful login/signup response
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: AccountInfo,
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/me", get(me))
}

/// POST /v1/auth/signup - Register a new account
#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session opened", body = SessionResponse),
        (status = 400, description = "Missing fields or email already registered")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), ApiError> {
    let (email, password) = required_credentials(req.email, req.password)?;

    // Argon2 is deliberately slow; keep it off the async worker threads.
    let password_hash = task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let name = match req.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => email.split('@').next().unwrap_or(&email).to_string(),
    };

    // The insert itself is the duplicate check; there is no separate lookup
    // window for a concurrent signup to slip through.
    let account = state
        .db
        .create_account(CreateAccountRow {
            email,
            name,
            password_hash,
        })
        .await?
        .ok_or(ApiError::Conflict("email is already registered"))?;

    let (jar, body) = open_session(&state.auth, jar, &account)?;
    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// POST /v1/auth/login - Login with email and password
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    const BAD_CREDENTIALS: ApiError = ApiError::Unauthenticated("invalid email or password");

    let (email, password) = required_credentials(req.email, req.password)?;

    let account = state
        .db
        .get_account_by_email(&email)
        .await?
        .ok_or(BAD_CREDENTIALS)?;

    let hash = account.password_hash.clone();
    let valid = task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(anyhow::Error::from)??;

    if !valid {
        return Err(BAD_CREDENTIALS);
    }

    let (jar, body) = open_session(&state.auth, jar, &account)?;
    Ok((jar, Json(body)))
}

/// POST /v1/auth/logout - Clear the session cookie
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "auth"
)]
pub async fn logout(jar: CookieJar) -> CookieJar {
    // Always emit the removal cookie, even when the request carried none.
    let mut removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    removal.make_removal();
    jar.add(removal)
}

/// GET /v1/auth/me - Current account info
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = AccountInfo),
        (status = 401, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<AccountInfo>, ApiError> {
    let row = state
        .db
        .get_account(account.id)
        .await?
        .ok_or(ApiError::Unauthenticated("authentication required"))?;

    Ok(Json(AccountInfo::from(&row)))
}

/// Emails are matched case-insensitively; store them folded.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Absent and empty credentials are the same 400.
fn required_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    let email = normalize_email(email.as_deref().unwrap_or(""));
    let password = password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput("email and password are required"));
    }
    Ok((email, password))
}

/// Issue a token and set the session cookie alongside the JSON body.
fn open_session(
    auth: &AuthState,
    jar: CookieJar,
    account: &AccountRow,
) -> Result<(CookieJar, SessionResponse), ApiError> {
    let token = auth.tokens.issue(account.id)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(auth.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            auth.config.token_lifetime.as_secs() as i64,
        ))
        .build();

    Ok((
        jar.add(cookie),
        SessionResponse {
            token,
            user: AccountInfo::from(account),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_required_credentials() {
        let ok = required_credentials(Some("A@x.com".into()), Some("pw".into())).unwrap();
        assert_eq!(ok, ("a@x.com".to_string(), "pw".to_string()));

        assert!(required_credentials(None, Some("pw".into())).is_err());
        assert!(required_credentials(Some("a@x.com".into()), None).is_err());
        assert!(required_credentials(Some("  ".into()), Some("".into())).is_err());
    }
}
