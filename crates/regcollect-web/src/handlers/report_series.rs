//! Report series: list, detail, and the create/edit/delete dialogs.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use regcollect_common::records::{ReportSeries, ReportSeriesInput};

use crate::handlers::{non_blank, FormPage, ListPage};
use crate::session::Session;
use crate::state::SharedState;
use crate::view::{Banner, Loadable};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSeriesForm {
    pub series_code: String,
    pub series_name: String,
    pub description: String,
    pub filing_frequency: String,
    pub form_pdf_path: String,
    pub instructions_pdf_path: String,
    pub status: String,
}

impl Default for ReportSeriesForm {
    fn default() -> Self {
        Self {
            series_code: String::new(),
            series_name: String::new(),
            description: String::new(),
            filing_frequency: String::new(),
            form_pdf_path: String::new(),
            instructions_pdf_path: String::new(),
            status: "active".to_string(),
        }
    }
}

impl ReportSeriesForm {
    fn from_record(series: &ReportSeries) -> Self {
        Self {
            series_code: series.series_code.clone(),
            series_name: series.series_name.clone(),
            description: series.description.clone().unwrap_or_default(),
            filing_frequency: series.filing_frequency.clone(),
            form_pdf_path: series.form_pdf_path.clone().unwrap_or_default(),
            instructions_pdf_path: series.instructions_pdf_path.clone().unwrap_or_default(),
            status: series.status.clone(),
        }
    }

    pub fn to_input(&self) -> ReportSeriesInput {
        ReportSeriesInput {
            series_code: self.series_code.trim().to_string(),
            series_name: self.series_name.trim().to_string(),
            description: non_blank(&self.description),
            filing_frequency: self.filing_frequency.trim().to_string(),
            form_pdf_path: non_blank(&self.form_pdf_path),
            instructions_pdf_path: non_blank(&self.instructions_pdf_path),
            status: self.status.clone(),
        }
    }
}

pub async fn report_series_page(session: Session, State(state): State<SharedState>) -> Response {
    state.views.page("report_series.html", Some(&session.user), ListPage::<Vec<ReportSeries>>::loading())
}

pub async fn report_series_table(session: Session, State(state): State<SharedState>) -> Response {
    let result = session.api().list_report_series().await;
    state.views.page("fragments/report_series.html", Some(&session.user), ListPage::fetched(result, "report series"))
}

#[derive(Serialize)]
struct DetailPage {
    series: Loadable<ReportSeries>,
}

pub async fn report_series_detail(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    let series = Loadable::from_result(session.api().get_report_series(id).await, "report series details");
    state.views.page("report_series_detail.html", Some(&session.user), DetailPage { series })
}

pub async fn new_report_series(session: Session, State(state): State<SharedState>) -> Response {
    let page = FormPage::create("/report-series/new", ReportSeriesForm::default());
    state.views.page("report_series_form.html", Some(&session.user), page)
}

pub async fn create_report_series(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<ReportSeriesForm>,
) -> Response {
    match session.api().create_report_series(&form.to_input()).await {
        Ok(created) => {
            info!(id = created.id, code = %created.series_code, "Report series created");
            Redirect::to("/report-series").into_response()
        }
        Err(e) => {
            error!("Error saving report series: {}", e);
            let page = FormPage::create("/report-series/new", form).failed(e.user_message());
            state.views.page("report_series_form.html", Some(&session.user), page)
        }
    }
}

pub async fn edit_report_series(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    match session.api().get_report_series(id).await {
        Ok(series) => {
            let page = FormPage::edit(format!("/report-series/{}/edit", id), ReportSeriesForm::from_record(&series));
            state.views.page("report_series_form.html", Some(&session.user), page)
        }
        Err(e) => {
            error!("Error fetching report series {}: {}", id, e);
            let banner = Banner::error("Failed to load report series details. Please try again later.");
            state.views.page("report_series.html", Some(&session.user), ListPage::<Vec<ReportSeries>>::with_banner(banner))
        }
    }
}

pub async fn update_report_series(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Form(form): Form<ReportSeriesForm>,
) -> Response {
    match session.api().update_report_series(id, &form.to_input()).await {
        Ok(_) => {
            info!(id, "Report series updated");
            Redirect::to("/report-series").into_response()
        }
        Err(e) => {
            error!("Error saving report series {}: {}", id, e);
            let page = FormPage::edit(format!("/report-series/{}/edit", id), form).failed(e.user_message());
            state.views.page("report_series_form.html", Some(&session.user), page)
        }
    }
}

pub async fn delete_report_series(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    match session.api().delete_report_series(id).await {
        Ok(()) => {
            info!(id, "Report series deleted");
            Redirect::to("/report-series").into_response()
        }
        Err(e) => {
            error!("Error deleting report series {}: {}", id, e);
            let banner = Banner::error(e.user_message());
            state.views.page("report_series.html", Some(&session.user), ListPage::<Vec<ReportSeries>>::with_banner(banner))
        }
    }
}
