//! Session binding between a client and an authenticated user.
//!
//! The binding lives in a signed, HTTP-only cookie and is resolved on every
//! request by the [`CurrentUser`] and [`MaybeUser`] extractors. Nothing is
//! kept in process memory, so any worker can serve any request.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    auth::repo_types::User,
    config::{SessionConfig, MAX_SESSION_TTL_MINUTES},
    error::AppError,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session";

/// Payload of the session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // user ID
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(cfg.ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES) as u64 * 60),
            cookie_secure: cfg.cookie_secure,
        }
    }

    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .ok_or_else(|| anyhow::anyhow!("session expiry out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "session token signed");
        Ok(token)
    }

    /// Verifies signature, expiry, issuer and audience and returns the user id.
    pub fn verify(&self, token: &str) -> anyhow::Result<i64> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let user_id = data.claims.sub.parse::<i64>()?;
        Ok(user_id)
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::new(&state.config.session)
    }
}

/// Binds the client to `user` by adding a fresh session cookie to `jar`.
pub fn login(keys: &SessionKeys, jar: CookieJar, user: &User) -> Result<CookieJar, AppError> {
    let token = keys.sign(user.id)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(keys.cookie_secure)
        .max_age(TimeDuration::seconds(keys.ttl.as_secs() as i64));
    Ok(jar.add(cookie))
}

/// Expires the session cookie, returning the client to the anonymous state.
/// Emits a removal cookie even when the request carried no session.
pub fn clear(jar: CookieJar) -> CookieJar {
    let mut removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    removal.make_removal();
    jar.add(removal)
}

/// Resolves the session cookie to a user. A missing, invalid or expired token
/// and a token naming a user that no longer exists all resolve to `None`.
pub async fn current(state: &AppState, jar: &CookieJar) -> Result<Option<User>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let keys = SessionKeys::from_ref(state);
    let user_id = match keys.verify(cookie.value()) {
        Ok(id) => id,
        Err(e) => {
            debug!(error = %e, "rejecting session token");
            return Ok(None);
        }
    };
    match state.users.find_by_id(user_id).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::NotFound) => {
            warn!(user_id, "session refers to a missing user");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Guard for routes that need a signed-in user. Rejects with
/// [`AppError::Unauthenticated`], which redirects to the login page.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        current(state, &jar)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// The signed-in user, if there is one.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeUser(current(state, &jar).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(secret: &str) -> SessionConfig {
        SessionConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
            cookie_secure: false,
        }
    }

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("u{id}@x.com"),
            password_hash: "$argon2id$unused".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = SessionKeys::new(&cfg("dev-secret"));
        let token = keys.sign(42).expect("sign");
        assert_eq!(keys.verify(&token).expect("verify"), 42);
    }

    #[test]
    fn oversized_ttl_is_clamped_to_a_year() {
        let mut huge = cfg("dev-secret");
        huge.ttl_minutes = 10_000_000_000_000;
        let keys = SessionKeys::new(&huge);
        let token = keys.sign(1).expect("sign");
        assert_eq!(keys.verify(&token).expect("verify"), 1);

        let mut validation = Validation::default();
        validation.set_audience(&["test-aud"]);
        let claims = decode::<Claims>(&token, &keys.decoding, &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, (MAX_SESSION_TTL_MINUTES * 60) as usize);
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = SessionKeys::new(&cfg("one")).sign(7).unwrap();
        assert!(SessionKeys::new(&cfg("two")).verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_other_audience() {
        let keys = SessionKeys::new(&cfg("same"));
        let mut other = cfg("same");
        other.audience = "someone-else".into();
        let token = SessionKeys::new(&other).sign(7).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = SessionKeys::new(&cfg("dev-secret"));
        let past = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let claims = Claims {
            sub: "1".into(),
            iat: past.unix_timestamp() as usize,
            exp: (past + TimeDuration::minutes(5)).unix_timestamp() as usize,
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn login_sets_http_only_cookie_and_clear_removes_it() {
        let keys = SessionKeys::new(&cfg("dev-secret"));
        let jar = login(&keys, CookieJar::new(), &user(3)).expect("login");
        let cookie = jar.get(SESSION_COOKIE).expect("cookie set");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(keys.verify(cookie.value()).unwrap(), 3);

        let jar = clear(jar);
        let cookie = jar.get(SESSION_COOKIE).expect("removal cookie");
        assert_eq!(cookie.value(), "");
        assert!(keys.verify(cookie.value()).is_err());
    }
}
