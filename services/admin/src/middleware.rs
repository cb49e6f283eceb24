//! Session gate middleware
//!
//! Runs before all other handling on every inbound request. Gates the
//! dashboard subtree and the login/register pages, and slides the session
//! expiry forward on qualifying requests. API routes are never gated here;
//! mutating product handlers re-check the session themselves.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use tracing::warn;

use crate::{AppState, session::SESSION_COOKIE};

/// Path prefix requiring a session to access
const PROTECTED_PREFIX: &str = "/dashboard";
/// Login page path
const LOGIN_PATH: &str = "/login";
/// Register page path
const REGISTER_PATH: &str = "/register";

/// Gate decision for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Protected path without a session cookie
    RedirectToLogin,
    /// Auth page with a session cookie present (validity deliberately not
    /// checked; matches the upstream behavior this service preserves)
    RedirectToDashboard,
    /// Matched path; decode the cookie if present and slide its expiry
    Refresh,
    /// Path outside the matcher; continue untouched
    PassThrough,
}

/// Decide what the gate does for a path, from cookie presence alone
pub fn gate_action(path: &str, has_cookie: bool) -> GateAction {
    let protected =
        path == PROTECTED_PREFIX || path.starts_with(&format!("{}/", PROTECTED_PREFIX));
    let auth_page = path == LOGIN_PATH || path == REGISTER_PATH;

    if protected && !has_cookie {
        GateAction::RedirectToLogin
    } else if auth_page && has_cookie {
        GateAction::RedirectToDashboard
    } else if protected || auth_page {
        GateAction::Refresh
    } else {
        GateAction::PassThrough
    }
}

/// Session gate middleware
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let cookie_value = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

    match gate_action(&path, cookie_value.is_some()) {
        GateAction::RedirectToLogin => Redirect::temporary(LOGIN_PATH).into_response(),
        GateAction::RedirectToDashboard => Redirect::temporary(PROTECTED_PREFIX).into_response(),
        GateAction::PassThrough => next.run(req).await,
        GateAction::Refresh => {
            // Decode failures are treated as "no session", never surfaced
            let refreshed = cookie_value
                .and_then(|value| state.session_service.verify(&value).ok())
                .and_then(|claims| state.session_service.refresh(&claims).ok());

            let mut response = next.run(req).await;

            if let Some(token) = refreshed {
                let cookie = session_cookie(token, state.session_service.ttl_seconds());
                match header::HeaderValue::from_str(&cookie.to_string()) {
                    Ok(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                    Err(e) => warn!("Failed to attach refreshed session cookie: {}", e),
                }
            }

            response
        }
    }
}

/// Build the HTTP-only session cookie with an expiry of now + ttl
pub fn session_cookie(token: String, ttl_seconds: u64) -> Cookie<'static> {
    let expires = time::OffsetDateTime::now_utc() + time::Duration::seconds(ttl_seconds as i64);

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .expires(expires)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_paths_without_cookie_redirect_to_login() {
        assert_eq!(gate_action("/dashboard", false), GateAction::RedirectToLogin);
        assert_eq!(
            gate_action("/dashboard/products/new", false),
            GateAction::RedirectToLogin
        );
    }

    #[test]
    fn test_auth_pages_with_cookie_redirect_to_dashboard() {
        // Cookie presence alone bounces, even if the cookie is garbage
        assert_eq!(gate_action("/login", true), GateAction::RedirectToDashboard);
        assert_eq!(
            gate_action("/register", true),
            GateAction::RedirectToDashboard
        );
    }

    #[test]
    fn test_matched_paths_otherwise_refresh() {
        assert_eq!(gate_action("/dashboard", true), GateAction::Refresh);
        assert_eq!(gate_action("/login", false), GateAction::Refresh);
        assert_eq!(gate_action("/register", false), GateAction::Refresh);
    }

    #[test]
    fn test_unmatched_paths_pass_through() {
        assert_eq!(gate_action("/", false), GateAction::PassThrough);
        assert_eq!(gate_action("/shop", true), GateAction::PassThrough);
        assert_eq!(gate_action("/api/products", false), GateAction::PassThrough);
        assert_eq!(gate_action("/api/products", true), GateAction::PassThrough);
        // Prefix match is on the path segment, not the string
        assert_eq!(gate_action("/dashboards", false), GateAction::PassThrough);
    }

    #[test]
    fn test_session_cookie_shape() {
        let cookie = session_cookie("token-value".to_string(), 86400);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.expires().is_some());
    }
}
