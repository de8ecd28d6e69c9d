//! The signed-in user's own profile: email and password change.

use axum::extract::State;
use axum::response::Response;
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use regcollect_common::records::{ProfileUpdate, User};

use crate::session::Session;
use crate::state::SharedState;
use crate::view::Banner;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn to_update(&self) -> Result<ProfileUpdate, String> {
        if self.new_password.is_empty() {
            return Ok(ProfileUpdate { email: self.email.trim().to_string(), ..Default::default() });
        }
        if self.current_password.is_empty() {
            return Err("Current password is required to set a new password".to_string());
        }
        if self.new_password != self.confirm_password {
            return Err("New passwords do not match".to_string());
        }
        Ok(ProfileUpdate {
            email: self.email.trim().to_string(),
            current_password: Some(self.current_password.clone()),
            new_password: Some(self.new_password.clone()),
        })
    }
}

#[derive(Serialize)]
struct ProfilePage<'a> {
    profile: &'a User,
    email: &'a str,
    banner: Option<Banner>,
}

pub async fn profile_page(session: Session, State(state): State<SharedState>) -> Response {
    let page = ProfilePage { profile: &session.user, email: &session.user.email, banner: None };
    state.views.page("profile.html", Some(&session.user), page)
}

pub async fn update_profile(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let outcome = match form.to_update() {
        Ok(update) => session.api().update_me(&update).await.map_err(|e| {
            error!("Error updating profile: {}", e);
            e.user_message()
        }),
        Err(msg) => Err(msg),
    };

    match outcome {
        Ok(updated) => {
            info!(username = %updated.username, "Profile updated");
            let page = ProfilePage {
                profile: &updated,
                email: &updated.email,
                banner: Some(Banner::success("Profile updated successfully")),
            };
            state.views.page("profile.html", Some(&updated), page)
        }
        Err(msg) => {
            let page = ProfilePage { profile: &session.user, email: &form.email, banner: Some(Banner::error(msg)) };
            state.views.page("profile.html", Some(&session.user), page)
        }
    }
}
