// Edge route guard
// Decision: Navigation redirects key off cookie *presence* only, skipping
// signature and expiry checks to keep every page load free of crypto work.
//
// This is a routing optimization, not authorization. A forged or stale
// cookie only changes where the browser is sent; every data access still
// goes through the request authenticator and the ownership-scoped
// repository, which reject it.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use super::SESSION_COOKIE;

/// Login page path.
const LOGIN_PATH: &str = "/auth";
/// Landing page for signed-in navigation.
const HOME_PATH: &str = "/dashboard";

/// Pre-dispatch gate for page navigation.
///
/// - Protected page without a session cookie: redirect to the login page.
/// - Login page with a session cookie: redirect to the landing page.
/// - Root: redirect either way based on cookie presence.
/// - Everything else (including all /v1 API routes) passes through.
pub async fn page_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let has_session = jar.get(SESSION_COOKIE).is_some();
    let path = request.uri().path();

    if path == HOME_PATH || path.starts_with("/dashboard/") {
        if !has_session {
            return Redirect::temporary(LOGIN_PATH).into_response();
        }
    } else if path == LOGIN_PATH {
        if has_session {
            return Redirect::temporary(HOME_PATH).into_response();
        }
    } else if path == "/" {
        let target = if has_session { HOME_PATH } else { LOGIN_PATH };
        return Redirect::temporary(target).into_response();
    }

    next.run(request).await
}
