//! Dashboard: headline counts and quick actions.

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use tracing::error;

use regcollect_common::records::{Submission, SubmissionFilter};
use regcollect_common::Result;

use crate::session::Session;
use crate::state::SharedState;
use crate::view::Banner;

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Default, Serialize)]
pub struct DashboardStats {
    pub institutions: usize,
    pub report_series: usize,
    pub submissions: usize,
    pub pending_validations: usize,
}

#[derive(Serialize)]
struct DashboardPage {
    stats: DashboardStats,
    recent: Vec<Submission>,
    banner: Option<Banner>,
}

pub async fn dashboard(session: Session, State(state): State<SharedState>) -> Response {
    let api = session.api();
    let all = SubmissionFilter::default();
    let (institutions, series, submissions) = tokio::join!(
        api.list_institutions(),
        api.list_report_series(),
        api.list_submissions(&all),
    );

    let mut failed = false;
    let institutions = count_or_log(&institutions, "institutions", &mut failed);
    let report_series = count_or_log(&series, "report series", &mut failed);
    let submissions = submissions.unwrap_or_else(|e| {
        error!("Error fetching submissions: {}", e);
        failed = true;
        Vec::new()
    });

    let stats = DashboardStats {
        institutions,
        report_series,
        submissions: submissions.len(),
        pending_validations: pending_validations(&submissions),
    };
    let banner = failed.then(|| Banner::error("Failed to load dashboard data. Please try again later."));

    let page = DashboardPage { stats, recent: most_recent(submissions, RECENT_LIMIT), banner };
    state.views.page("dashboard.html", Some(&session.user), page)
}

fn count_or_log<T>(result: &Result<Vec<T>>, what: &str, failed: &mut bool) -> usize {
    match result {
        Ok(items) => items.len(),
        Err(e) => {
            error!("Error fetching {}: {}", what, e);
            *failed = true;
            0
        }
    }
}

pub fn pending_validations(submissions: &[Submission]) -> usize {
    submissions.iter().filter(|s| s.validation_status == "pending").count()
}

/// Newest first by submission date; undated submissions sort last.
pub fn most_recent(mut submissions: Vec<Submission>, limit: usize) -> Vec<Submission> {
    submissions.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));
    submissions.truncate(limit);
    submissions
}
