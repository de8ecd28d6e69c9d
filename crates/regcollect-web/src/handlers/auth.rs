//! Login and logout.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use regcollect_common::RegcollectError;

use crate::session::{clear_session, session_cookie, Session};
use crate::state::SharedState;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginPage<'a> {
    username: &'a str,
    error: Option<String>,
}

/// A cookie that no longer resolves to a session is dropped before the form is shown.
pub async fn login_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let page = LoginPage { username: "", error: None };
    if jar.get(state.cookie_name()).is_none() {
        return state.views.page("login.html", None, page);
    }
    match Session::resolve(&jar, &state).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            debug!("Discarding stale session cookie: {}", e);
            let jar = clear_session(jar, &state.config.session);
            (jar, state.views.page("login.html", None, page)).into_response()
        }
    }
}

pub async fn login_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return state.views.page("login.html", None, LoginPage { username, error: None });
    }

    let failure = match state.api.login(username, &form.password).await {
        Ok(token) => match state.api.with_token(token.access_token.as_str()).profile().await {
            Ok(user) => {
                info!(username = %user.username, role = %user.role, "User logged in");
                let jar = jar.add(session_cookie(&state.config.session, token.access_token));
                return (jar, Redirect::to("/")).into_response();
            }
            Err(e) => e,
        },
        Err(e) => e,
    };

    error!("Login error: {}", failure);
    let message = match &failure {
        RegcollectError::Api { detail, .. } if !detail.is_empty() => detail.clone(),
        _ => LOGIN_FAILED.to_string(),
    };
    state.views.page("login.html", None, LoginPage { username, error: Some(message) })
}

pub async fn logout(State(state): State<SharedState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(state.cookie_name()) {
        state.api.with_token(cookie.value()).logout().await;
    }
    info!("User logged out");
    (clear_session(jar, &state.config.session), Redirect::to("/login")).into_response()
}
