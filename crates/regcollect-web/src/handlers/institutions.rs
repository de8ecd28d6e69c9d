//! Institutions: list, detail, and the create/edit/delete dialogs.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use regcollect_common::records::{Institution, InstitutionInput, Submission, SubmissionFilter};

use crate::handlers::{non_blank, FormPage, ListPage};
use crate::session::Session;
use crate::state::SharedState;
use crate::view::{Banner, Loadable};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionForm {
    pub rssd_id: String,
    pub name: String,
    pub institution_type: String,
    pub contact_info: String,
    pub status: String,
}

impl Default for InstitutionForm {
    fn default() -> Self {
        Self {
            rssd_id: String::new(),
            name: String::new(),
            institution_type: String::new(),
            contact_info: String::new(),
            status: "active".to_string(),
        }
    }
}

impl InstitutionForm {
    fn from_record(inst: &Institution) -> Self {
        Self {
            rssd_id: inst.rssd_id.clone(),
            name: inst.name.clone(),
            institution_type: inst.institution_type.clone(),
            contact_info: inst.contact_info.clone().unwrap_or_default(),
            status: inst.status.clone(),
        }
    }

    pub fn to_input(&self) -> InstitutionInput {
        InstitutionInput {
            rssd_id: self.rssd_id.trim().to_string(),
            name: self.name.trim().to_string(),
            institution_type: self.institution_type.trim().to_string(),
            contact_info: non_blank(&self.contact_info),
            status: self.status.clone(),
        }
    }
}

pub async fn institutions_page(session: Session, State(state): State<SharedState>) -> Response {
    state.views.page("institutions.html", Some(&session.user), ListPage::<Vec<Institution>>::loading())
}

pub async fn institutions_table(session: Session, State(state): State<SharedState>) -> Response {
    let result = session.api().list_institutions().await;
    state.views.page("fragments/institutions.html", Some(&session.user), ListPage::fetched(result, "institutions"))
}

#[derive(Serialize)]
struct DetailPage {
    institution: Loadable<Institution>,
    submissions: Vec<Submission>,
}

pub async fn institution_detail(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    let api = session.api();
    let filter = SubmissionFilter::for_institution(id);
    let (institution, submissions) = tokio::join!(api.get_institution(id), api.list_submissions(&filter));

    // The institution record is what the page is about; its submissions are optional.
    let submissions = submissions.unwrap_or_else(|e| {
        error!("Error fetching submissions for institution {}: {}", id, e);
        Vec::new()
    });
    let page = DetailPage {
        institution: Loadable::from_result(institution, "institution details"),
        submissions,
    };
    state.views.page("institution_detail.html", Some(&session.user), page)
}

pub async fn new_institution(session: Session, State(state): State<SharedState>) -> Response {
    let page = FormPage::create("/institutions/new", InstitutionForm::default());
    state.views.page("institution_form.html", Some(&session.user), page)
}

pub async fn create_institution(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<InstitutionForm>,
) -> Response {
    match session.api().create_institution(&form.to_input()).await {
        Ok(created) => {
            info!(id = created.id, rssd_id = %created.rssd_id, "Institution created");
            Redirect::to("/institutions").into_response()
        }
        Err(e) => {
            error!("Error saving institution: {}", e);
            let page = FormPage::create("/institutions/new", form).failed(e.user_message());
            state.views.page("institution_form.html", Some(&session.user), page)
        }
    }
}

pub async fn edit_institution(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    match session.api().get_institution(id).await {
        Ok(inst) => {
            let page = FormPage::edit(format!("/institutions/{}/edit", id), InstitutionForm::from_record(&inst));
            state.views.page("institution_form.html", Some(&session.user), page)
        }
        Err(e) => {
            error!("Error fetching institution {}: {}", id, e);
            let banner = Banner::error("Failed to load institution details. Please try again later.");
            state.views.page("institutions.html", Some(&session.user), ListPage::<Vec<Institution>>::with_banner(banner))
        }
    }
}

pub async fn update_institution(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Form(form): Form<InstitutionForm>,
) -> Response {
    match session.api().update_institution(id, &form.to_input()).await {
        Ok(_) => {
            info!(id, "Institution updated");
            Redirect::to("/institutions").into_response()
        }
        Err(e) => {
            error!("Error saving institution {}: {}", id, e);
            let page = FormPage::edit(format!("/institutions/{}/edit", id), form).failed(e.user_message());
            state.views.page("institution_form.html", Some(&session.user), page)
        }
    }
}

pub async fn delete_institution(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    match session.api().delete_institution(id).await {
        Ok(()) => {
            info!(id, "Institution deleted");
            Redirect::to("/institutions").into_response()
        }
        Err(e) => {
            error!("Error deleting institution {}: {}", id, e);
            let banner = Banner::error(e.user_message());
            state.views.page("institutions.html", Some(&session.user), ListPage::<Vec<Institution>>::with_banner(banner))
        }
    }
}
