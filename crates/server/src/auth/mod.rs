// Authentication core: credential verification, session tokens, request
// authentication, and the navigation guard.
//
// Two distinct layers share the session cookie: the page guard in `guard`
// redirects on cookie presence alone, while the extractor in `middleware`
// verifies the token and is the only source of identity for data access.

pub mod config;
pub mod guard;
pub mod middleware;
pub mod routes;
pub mod token;

pub use config::AuthConfig;
pub use middleware::{AuthState, CurrentAccount};
pub use token::TokenCodec;

/// Name of the session cookie set at login/signup.
pub const SESSION_COOKIE: &str = "token";
