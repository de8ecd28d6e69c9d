//! Submissions: filtered list, upload, detail with validation results,
//! and the analyst actions on a single submission.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use regcollect_client::ApiClient;
use regcollect_common::records::{
    Institution, ReportSeries, Submission, SubmissionFilter, SubmissionUpload, ValidationResult,
};
use regcollect_common::roles::SUBMISSION_STATUSES;
use regcollect_common::Role;

use crate::handlers::{non_blank, parse_id, ListPage};
use crate::session::Session;
use crate::state::SharedState;
use crate::view::{Banner, Loadable};

/// Raw query string; empty selects arrive as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub institution_id: String,
    pub report_series_id: String,
    pub status: String,
}

impl FilterParams {
    pub fn to_filter(&self) -> SubmissionFilter {
        SubmissionFilter {
            institution_id: parse_id(&self.institution_id),
            report_series_id: parse_id(&self.report_series_id),
            status: non_blank(&self.status).filter(|s| SUBMISSION_STATUSES.contains(&s.as_str())),
        }
    }
}

#[derive(Serialize)]
struct SubmissionsShell {
    #[serde(flatten)]
    list: ListPage<Vec<Submission>>,
    filter: SubmissionFilter,
    filtered: bool,
    institutions: Vec<Institution>,
    series: Vec<ReportSeries>,
}

/// Institutions and series for the filter and upload dropdowns. Failures only cost the options.
async fn choices(api: &ApiClient) -> (Vec<Institution>, Vec<ReportSeries>) {
    let (institutions, series) = tokio::join!(api.list_institutions(), api.list_report_series());
    let institutions = institutions.unwrap_or_else(|e| {
        error!("Error fetching institutions: {}", e);
        Vec::new()
    });
    let series = series.unwrap_or_else(|e| {
        error!("Error fetching report series: {}", e);
        Vec::new()
    });
    (institutions, series)
}

pub async fn submissions_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<FilterParams>,
) -> Response {
    let filter = params.to_filter();
    let (institutions, series) = choices(session.api()).await;
    let page = SubmissionsShell {
        list: ListPage::loading(),
        filtered: !filter.is_empty(),
        filter,
        institutions,
        series,
    };
    state.views.page("submissions.html", Some(&session.user), page)
}

pub async fn submissions_table(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<FilterParams>,
) -> Response {
    let result = session.api().list_submissions(&params.to_filter()).await;
    state.views.page("fragments/submissions.html", Some(&session.user), ListPage::fetched(result, "submissions"))
}

// === Upload ===

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadForm {
    pub institution_id: String,
    pub report_series_id: String,
    pub reporting_date: String,
}

#[derive(Serialize)]
struct UploadPage {
    form: UploadForm,
    institutions: Vec<Institution>,
    series: Vec<ReportSeries>,
    banner: Option<Banner>,
}

async fn render_upload(session: &Session, state: &SharedState, form: UploadForm, banner: Option<Banner>) -> Response {
    let (institutions, series) = choices(session.api()).await;
    let page = UploadPage { form, institutions, series, banner };
    state.views.page("submission_upload.html", Some(&session.user), page)
}

pub async fn upload_page(session: Session, State(state): State<SharedState>) -> Response {
    render_upload(&session, &state, UploadForm::default(), None).await
}

pub async fn upload_submit(session: Session, State(state): State<SharedState>, mut multipart: Multipart) -> Response {
    let mut form = UploadForm::default();
    let mut file: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("Error reading upload: {}", e);
                let banner = Banner::error(format!("Upload could not be read: {}", e.body_text()));
                return render_upload(&session, &state, form, Some(banner)).await;
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            match field.bytes().await {
                Ok(bytes) if !file_name.is_empty() => file = Some((file_name, bytes.to_vec())),
                Ok(_) => {}
                Err(e) => {
                    error!("Error reading upload: {}", e);
                    let banner = Banner::error(format!("Upload could not be read: {}", e.body_text()));
                    return render_upload(&session, &state, form, Some(banner)).await;
                }
            }
            continue;
        }
        let value = match field.text().await {
            Ok(value) => value,
            Err(e) => {
                error!("Error reading upload field {}: {}", name, e);
                let banner = Banner::error(format!("Upload could not be read: {}", e.body_text()));
                return render_upload(&session, &state, form, Some(banner)).await;
            }
        };
        match name.as_str() {
            "institution_id" => form.institution_id = value,
            "report_series_id" => form.report_series_id = value,
            "reporting_date" => form.reporting_date = value,
            _ => {}
        }
    }

    let (institution_id, report_series_id) = match (parse_id(&form.institution_id), parse_id(&form.report_series_id)) {
        (Some(i), Some(s)) => (i, s),
        _ => {
            let banner = Banner::error("Please choose an institution and a report series.");
            return render_upload(&session, &state, form, Some(banner)).await;
        }
    };
    let Some(reporting_date) = non_blank(&form.reporting_date) else {
        let banner = Banner::error("Please enter the reporting date.");
        return render_upload(&session, &state, form, Some(banner)).await;
    };
    let Some((file_name, bytes)) = file else {
        let banner = Banner::error("Please select a file to upload.");
        return render_upload(&session, &state, form, Some(banner)).await;
    };

    let upload = SubmissionUpload { institution_id, report_series_id, reporting_date, file_name, bytes };
    match session.api().upload_submission(upload).await {
        Ok(created) => {
            info!(id = created.id, institution_id, report_series_id, "Submission uploaded");
            Redirect::to(&format!("/submissions/{}", created.id)).into_response()
        }
        Err(e) => {
            error!("Error uploading submission: {}", e);
            let banner = Banner::error(e.user_message());
            render_upload(&session, &state, form, Some(banner)).await
        }
    }
}

// === Detail and actions ===

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub notice: Option<String>,
}

#[derive(Serialize)]
struct DetailPage {
    submission: Loadable<Submission>,
    results: Loadable<Vec<ValidationResult>>,
    banner: Option<Banner>,
}

async fn render_detail(session: &Session, state: &SharedState, id: i64, banner: Option<Banner>) -> Response {
    let api = session.api();
    let (submission, results) = tokio::join!(api.get_submission(id), api.validation_results(id));
    let page = DetailPage {
        submission: Loadable::from_result(submission, "submission details"),
        results: Loadable::from_result(results, "validation results"),
        banner,
    };
    state.views.page("submission_detail.html", Some(&session.user), page)
}

fn notice_banner(notice: Option<&str>) -> Option<Banner> {
    match notice? {
        "validation" => Some(Banner::success("Validation started. Refresh to see the results.")),
        "status" => Some(Banner::success("Status updated successfully")),
        _ => None,
    }
}

pub async fn submission_detail(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<DetailParams>,
) -> Response {
    let banner = notice_banner(params.notice.as_deref());
    render_detail(&session, &state, id, banner).await
}

pub async fn validate_submission(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    match session.api().validate_submission(id).await {
        Ok(ack) => {
            info!(id, detail = %ack.detail, "Validation triggered");
            Ok(Redirect::to(&format!("/submissions/{}?notice=validation", id)).into_response())
        }
        Err(e) => {
            error!("Error triggering validation for submission {}: {}", id, e);
            Ok(render_detail(&session, &state, id, Some(Banner::error(e.user_message()))).await)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

pub async fn update_status(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    if !SUBMISSION_STATUSES.contains(&form.status.as_str()) {
        let banner = Banner::error(format!("Unknown submission status: {}", form.status));
        return Ok(render_detail(&session, &state, id, Some(banner)).await);
    }
    match session.api().update_submission_status(id, &form.status).await {
        Ok(_) => {
            info!(id, status = %form.status, "Submission status updated");
            Ok(Redirect::to(&format!("/submissions/{}?notice=status", id)).into_response())
        }
        Err(e) => {
            error!("Error updating status of submission {}: {}", id, e);
            Ok(render_detail(&session, &state, id, Some(Banner::error(e.user_message()))).await)
        }
    }
}
