//! Cookie-backed login session.
//!
//! The bearer token lives in an HttpOnly cookie. Every authenticated handler
//! takes a [`Session`] argument; building one decodes the token, rejects it
//! when expired, and fetches the caller's profile from the backend.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;
use tracing::{debug, info, warn};

use regcollect_client::ApiClient;
use regcollect_common::records::User;
use regcollect_common::{has_role, RegcollectError, Role, TokenClaims};

use crate::config::SessionConfig;
use crate::state::{AppState, SharedState};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session cookie")]
    Missing,

    #[error("unreadable access token: {0}")]
    Invalid(String),

    #[error("access token expired")]
    Expired,

    #[error("profile lookup failed: {0}")]
    Profile(#[from] RegcollectError),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    api: ApiClient,
}

impl Session {
    pub async fn resolve(jar: &CookieJar, state: &AppState) -> Result<Self, SessionError> {
        let token = jar
            .get(state.cookie_name())
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::Missing)?;

        let claims = TokenClaims::decode(&token).map_err(|e| SessionError::Invalid(e.to_string()))?;
        if claims.is_expired() {
            return Err(SessionError::Expired);
        }

        let api = state.api.with_token(token);
        let user = api.profile().await?;
        debug!(
            username = %user.username,
            role = %user.role,
            expires_at = ?claims.expires_at(),
            "Session resolved"
        );

        Ok(Self { user, api })
    }

    /// Client that sends this session's bearer token.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn has_role(&self, required: Role) -> bool {
        has_role(Some(self.user.role.as_str()), required.as_str())
    }

    /// Gate a page on a minimum role; callers without it are sent to the dashboard.
    pub fn require(&self, required: Role) -> Result<(), Response> {
        if self.has_role(required) {
            Ok(())
        } else {
            warn!(
                username = %self.user.username,
                role = %self.user.role,
                required = %required,
                "Insufficient role, redirecting to dashboard"
            );
            Err(Redirect::to("/").into_response())
        }
    }
}

impl FromRequestParts<SharedState> for Session {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match Session::resolve(&jar, state).await {
            Ok(session) => Ok(session),
            Err(SessionError::Missing) => Err(Redirect::to("/login").into_response()),
            Err(SessionError::Profile(e)) if e.is_unauthorized() => {
                info!("Backend rejected the session token: {}", e);
                let jar = clear_session(jar, &state.config.session);
                Err((jar, Redirect::to("/login")).into_response())
            }
            Err(e) => {
                warn!("Ending session: {}", e);
                let jar = clear_session(jar, &state.config.session);
                Err((jar, Redirect::to("/login")).into_response())
            }
        }
    }
}

pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .build()
}

pub fn clear_session(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.remove(Cookie::build((config.cookie_name.clone(), "")).path("/"))
}
