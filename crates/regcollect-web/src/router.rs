//! Axum router — maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Router,
};
use tower_http::{
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    auth::{login_page, login_submit, logout},
    dashboard::dashboard,
    institutions::{
        institutions_page, institutions_table, institution_detail,
        new_institution, create_institution, edit_institution, update_institution, delete_institution,
    },
    report_series::{
        report_series_page, report_series_table, report_series_detail,
        new_report_series, create_report_series, edit_report_series, update_report_series, delete_report_series,
    },
    submissions::{
        submissions_page, submissions_table, submission_detail,
        upload_page, upload_submit, validate_submission, update_status,
    },
    forms::{forms_page, forms_table, download_form},
    validation_rules::{rules_page, rules_table, new_rule, create_rule, edit_rule, update_rule},
    mdrm::{mdrm_page, mdrm_table},
    users::{users_page, users_table, new_user, create_user, edit_user, update_user, delete_user},
    profile::{profile_page, update_profile},
};

/// Submission files can be far larger than axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const MAIN_CSS: &str = include_str!("../static/css/main.css");

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Session
        .route("/login",  get(login_page).post(login_submit))
        .route("/logout", post(logout))

        // Pages
        .route("/", get(dashboard))

        .route("/institutions",             get(institutions_page))
        .route("/institutions/table",       get(institutions_table))
        .route("/institutions/new",         get(new_institution).post(create_institution))
        .route("/institutions/{id}",        get(institution_detail))
        .route("/institutions/{id}/edit",   get(edit_institution).post(update_institution))
        .route("/institutions/{id}/delete", post(delete_institution))

        .route("/report-series",             get(report_series_page))
        .route("/report-series/table",       get(report_series_table))
        .route("/report-series/new",         get(new_report_series).post(create_report_series))
        .route("/report-series/{id}",        get(report_series_detail))
        .route("/report-series/{id}/edit",   get(edit_report_series).post(update_report_series))
        .route("/report-series/{id}/delete", post(delete_report_series))

        .route("/submissions",               get(submissions_page))
        .route("/submissions/table",         get(submissions_table))
        .route("/submissions/upload",        get(upload_page).post(upload_submit))
        .route("/submissions/{id}",          get(submission_detail))
        .route("/submissions/{id}/validate", post(validate_submission))
        .route("/submissions/{id}/status",   post(update_status))

        .route("/forms",                 get(forms_page))
        .route("/forms/table",           get(forms_table))
        .route("/forms/{id}/{document}", get(download_form))

        .route("/validation/rules",           get(rules_page))
        .route("/validation/rules/table",     get(rules_table))
        .route("/validation/rules/new",       get(new_rule).post(create_rule))
        .route("/validation/rules/{id}/edit", get(edit_rule).post(update_rule))

        .route("/mdrm/dictionary",       get(mdrm_page))
        .route("/mdrm/dictionary/table", get(mdrm_table))

        .route("/users",             get(users_page))
        .route("/users/table",       get(users_table))
        .route("/users/new",         get(new_user).post(create_user))
        .route("/users/{id}/edit",   get(edit_user).post(update_user))
        .route("/users/{id}/delete", post(delete_user))

        .route("/profile", get(profile_page).post(update_profile))

        // Static files
        .route("/static/css/main.css", get(stylesheet))

        .fallback(|| async { Redirect::to("/") })

        // Middleware
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], MAIN_CSS)
}
