use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::domain::{Role, User, UserId};
use tracing::warn;

pub(crate) const SESSION_COOKIE: &str = "hotel_session";
const FALLBACK_CALLBACK: &str = "/dashboard";

/// The signed-in user as carried by the session cookie.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Session {
    pub(crate) user_id: UserId,
    pub(crate) name: String,
    pub(crate) role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    role: Role,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub(crate) struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl SessionKeys {
    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    pub(crate) fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.0.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Expired, tampered and malformed tokens all read as "no session".
    pub(crate) fn verify(&self, token: &str) -> Option<Session> {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(Session {
                user_id: UserId(data.claims.sub),
                name: data.claims.name,
                role: data.claims.role,
            }),
            Err(err) => {
                warn!(error = %err, "rejected session cookie");
                None
            }
        }
    }

    pub(crate) fn set_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl_seconds.max(0)
        )
    }
}

pub(crate) fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub(crate) fn session_from_headers(headers: &HeaderMap, keys: &SessionKeys) -> Option<Session> {
    let token = cookie_value(headers, SESSION_COOKIE)?;
    if token.is_empty() {
        return None;
    }
    keys.verify(token)
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

pub(crate) fn login_redirect(login_route: &str, path_and_query: &str) -> String {
    let callback: String = url::form_urlencoded::byte_serialize(path_and_query.as_bytes()).collect();
    format!("{login_route}?callbackUrl={callback}")
}

/// Only local paths are honoured as post-login destinations. Paths holding
/// whitespace or control characters are refused; browsers strip them from
/// `Location`, so `/\t/host` would land on `//host`.
pub(crate) fn safe_callback(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => FALLBACK_CALLBACK.to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path
            .chars()
            .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
