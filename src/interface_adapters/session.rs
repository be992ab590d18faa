use axum::http::{HeaderMap, header};

use crate::domain::errors::CheckinError;
use crate::domain::token;

pub const SESSION_COOKIE: &str = "gl_session";
// 24 hours; the browser drops the cookie afterwards, the token itself never expires.
pub const SESSION_MAX_AGE_SECONDS: u64 = 60 * 60 * 24;

// Finds a cookie by name in a `Cookie` header and percent-decodes its value.
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    let raw = cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))?;

    urlencoding::decode(raw.trim())
        .ok()
        .map(|value| value.into_owned())
}

// True when the header carries a session cookie signed with `secret`.
pub fn authenticate(cookie_header: Option<&str>, secret: &str) -> bool {
    cookie_header
        .and_then(|header| cookie_value(header, SESSION_COOKIE))
        .is_some_and(|value| token::verify(&value, secret))
}

// Joins every `Cookie` header line so split headers (HTTP/2) are still seen.
pub fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let lines: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("; "))
    }
}

// Gate for protected endpoints: a missing secret wins over a missing session.
pub fn require_session(headers: &HeaderMap, secret: Option<&str>) -> Result<(), CheckinError> {
    let secret = secret.ok_or(CheckinError::MissingConfig("Missing AUTH_SECRET"))?;

    if authenticate(cookie_header(headers).as_deref(), secret) {
        Ok(())
    } else {
        Err(CheckinError::Unauthorized)
    }
}

pub fn issue_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECONDS}"
    )
}

pub fn cleared_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0")
}
