//! User administration (admin only).

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use regcollect_common::records::{User, UserInput};
use regcollect_common::Role;

use crate::handlers::{parse_id, FormPage, ListPage};
use crate::session::Session;
use crate::state::SharedState;
use crate::view::Banner;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub role: String,
    pub institution_id: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            role: Role::External.as_str().to_string(),
            institution_id: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

impl UserForm {
    fn from_record(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            institution_id: user.institution_id.map(|id| id.to_string()).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Checked before any request goes out. On edit an empty password keeps
    /// the current one; on create a password is required.
    pub fn to_input(&self, editing: bool) -> Result<UserInput, String> {
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        if !editing && self.password.is_empty() {
            return Err("A password is required for new users".to_string());
        }
        if Role::parse(&self.role).is_none() {
            return Err(format!("Unknown role: {}", self.role));
        }
        let institution_id = match self.institution_id.trim() {
            "" => None,
            raw => Some(parse_id(raw).ok_or_else(|| format!("Invalid institution id: {}", raw))?),
        };
        Ok(UserInput {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role.clone(),
            institution_id,
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        })
    }
}

fn list_with_banner(session: &Session, state: &SharedState, banner: Banner) -> Response {
    state.views.page("users.html", Some(&session.user), ListPage::<Vec<User>>::with_banner(banner))
}

pub async fn users_page(session: Session, State(state): State<SharedState>) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    Ok(state.views.page("users.html", Some(&session.user), ListPage::<Vec<User>>::loading()))
}

pub async fn users_table(session: Session, State(state): State<SharedState>) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    let result = session.api().list_users().await;
    Ok(state.views.page("fragments/users.html", Some(&session.user), ListPage::fetched(result, "users")))
}

pub async fn new_user(session: Session, State(state): State<SharedState>) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    let page = FormPage::create("/users/new", UserForm::default());
    Ok(state.views.page("user_form.html", Some(&session.user), page))
}

pub async fn create_user(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<UserForm>,
) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    let outcome = match form.to_input(false) {
        Ok(input) => session.api().create_user(&input).await.map_err(|e| {
            error!("Error saving user: {}", e);
            e.user_message()
        }),
        Err(msg) => Err(msg),
    };
    Ok(match outcome {
        Ok(created) => {
            info!(id = created.id, username = %created.username, role = %created.role, "User created");
            Redirect::to("/users").into_response()
        }
        Err(msg) => {
            let page = FormPage::create("/users/new", form).failed(msg);
            state.views.page("user_form.html", Some(&session.user), page)
        }
    })
}

pub async fn edit_user(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    Ok(match session.api().find_user(id).await {
        Ok(Some(user)) => {
            let page = FormPage::edit(format!("/users/{}/edit", id), UserForm::from_record(&user));
            state.views.page("user_form.html", Some(&session.user), page)
        }
        Ok(None) => list_with_banner(&session, &state, Banner::error(format!("User {} not found.", id))),
        Err(e) => {
            error!("Error fetching user {}: {}", id, e);
            list_with_banner(&session, &state, Banner::error("Failed to load users. Please try again later."))
        }
    })
}

pub async fn update_user(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    let outcome = match form.to_input(true) {
        Ok(input) => session.api().update_user(id, &input).await.map_err(|e| {
            error!("Error saving user {}: {}", id, e);
            e.user_message()
        }),
        Err(msg) => Err(msg),
    };
    Ok(match outcome {
        Ok(_) => {
            info!(id, "User updated");
            Redirect::to("/users").into_response()
        }
        Err(msg) => {
            let page = FormPage::edit(format!("/users/{}/edit", id), form).failed(msg);
            state.views.page("user_form.html", Some(&session.user), page)
        }
    })
}

pub async fn delete_user(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    session.require(Role::Admin)?;
    if id == session.user.id {
        return Ok(list_with_banner(&session, &state, Banner::error("You cannot delete your own account.")));
    }
    Ok(match session.api().delete_user(id).await {
        Ok(()) => {
            info!(id, "User deleted");
            Redirect::to("/users").into_response()
        }
        Err(e) => {
            error!("Error deleting user {}: {}", id, e);
            list_with_banner(&session, &state, Banner::error(e.user_message()))
        }
    })
}
