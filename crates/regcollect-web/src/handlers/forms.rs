//! Blank report forms: the list and the PDF download proxy.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use regcollect_common::records::{FormDocument, FormEntry};

use crate::handlers::ListPage;
use crate::session::Session;
use crate::state::SharedState;
use crate::view::Banner;

pub async fn forms_page(session: Session, State(state): State<SharedState>) -> Response {
    state.views.page("forms.html", Some(&session.user), ListPage::<Vec<FormEntry>>::loading())
}

pub async fn forms_table(session: Session, State(state): State<SharedState>) -> Response {
    let result = session.api().list_forms().await;
    state.views.page("fragments/forms.html", Some(&session.user), ListPage::fetched(result, "forms"))
}

/// Stream a form or its instructions back to the browser with the session's token.
pub async fn download_form(
    session: Session,
    State(state): State<SharedState>,
    Path((id, document)): Path<(i64, String)>,
) -> Response {
    let Some(document) = FormDocument::parse(&document) else {
        return (StatusCode::NOT_FOUND, "Unknown document").into_response();
    };

    match session.api().download_form(id, document).await {
        Ok(download) => {
            let disposition = format!("attachment; filename=\"{}\"", download.file_name.replace('"', ""));
            (
                [(CONTENT_TYPE, download.content_type), (CONTENT_DISPOSITION, disposition)],
                download.bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!("Error downloading {} for series {}: {}", document.as_str(), id, e);
            let banner = Banner::error(format!("Failed to download {}. Please try again later.", document.as_str()));
            state.views.page("forms.html", Some(&session.user), ListPage::<Vec<FormEntry>>::with_banner(banner))
        }
    }
}
