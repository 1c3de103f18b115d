//! Session resolution from the auth cookies.
//!
//! The access token is checked first; when it is missing or no longer accepted,
//! the refresh token is exchanged for a new pair and the cookies are rotated on
//! the outgoing response. Nothing here returns an error: an unreachable backend
//! is logged and treated as "no session".

use tower_cookies::{
    cookie::{time::Duration as CookieDuration, SameSite},
    Cookie, Cookies,
};

use crate::{
    backend::AuthBackend,
    models::{Identity, SessionTokens},
};

pub const ACCESS_COOKIE:  &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Cookie attributes shared by both session cookies.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure:       bool,
    pub session_days: i64,
}

pub async fn resolve_session(
    auth: &dyn AuthBackend,
    cookies: &Cookies,
    policy: CookiePolicy,
) -> Option<Identity> {
    let access = cookies.get(ACCESS_COOKIE).map(|c| c.value().to_owned());
    let refresh = cookies.get(REFRESH_COOKIE).map(|c| c.value().to_owned());

    let mut stale_access = false;
    if let Some(token) = access.filter(|t| !t.is_empty()) {
        match auth.get_user(&token).await {
            Ok(Some(identity)) => return Some(identity),
            Ok(None) => stale_access = true,
            Err(err) => {
                tracing::warn!(error = %err, "Session lookup failed; treating request as signed out");
                return None;
            }
        }
    }

    let Some(refresh) = refresh.filter(|t| !t.is_empty()) else {
        // Nothing to refresh with; drop the rejected token so it is not re-checked.
        if stale_access {
            clear_session_cookies(cookies);
        }
        return None;
    };
    match auth.refresh_session(&refresh).await {
        Ok(Some(tokens)) => {
            set_session_cookies(cookies, &tokens, policy);
            tracing::debug!(user_id = %tokens.user.id, "Session refreshed");
            Some(tokens.user)
        }
        Ok(None) => {
            clear_session_cookies(cookies);
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "Session refresh failed; treating request as signed out");
            None
        }
    }
}

pub fn set_session_cookies(cookies: &Cookies, tokens: &SessionTokens, policy: CookiePolicy) {
    cookies.add(session_cookie(
        ACCESS_COOKIE,
        tokens.access_token.clone(),
        CookieDuration::seconds(tokens.expires_in.max(0)),
        policy.secure,
    ));
    cookies.add(session_cookie(
        REFRESH_COOKIE,
        tokens.refresh_token.clone(),
        CookieDuration::days(policy.session_days),
        policy.secure,
    ));
}

pub fn clear_session_cookies(cookies: &Cookies) {
    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        cookies.add(session_cookie(name, String::new(), CookieDuration::ZERO, false));
    }
}

fn session_cookie(name: &'static str, value: String, max_age: CookieDuration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        // Lax so the session survives top-level navigations back from the auth provider.
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(max_age)
        .build()
}
