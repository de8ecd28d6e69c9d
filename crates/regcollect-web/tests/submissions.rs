//! Upload, submission detail, analyst actions, and the form download proxy.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;

use common::{body_text, location, token_for, TestApp, BOUNDARY};

const CSV: &str = "BHCK2170,1000";

#[tokio::test]
async fn test_upload_redirects_to_new_submission() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    let resp = app
        .post_multipart(
            "/submissions/upload",
            Some(&token),
            &[
                ("institution_id", None, "1"),
                ("report_series_id", None, "1"),
                ("reporting_date", None, "2024-03-31"),
                ("file", Some("fry9c_q1.csv"), CSV),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/submissions/77"));
}

#[tokio::test]
async fn test_upload_requires_every_field() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    let cases: [(&[(&str, Option<&str>, &str)], &str); 3] = [
        (
            &[("report_series_id", None, "1"), ("reporting_date", None, "2024-03-31"), ("file", Some("q1.csv"), CSV)],
            "Please choose an institution and a report series.",
        ),
        (
            &[("institution_id", None, "1"), ("report_series_id", None, "1"), ("file", Some("q1.csv"), CSV)],
            "Please enter the reporting date.",
        ),
        (
            &[("institution_id", None, "1"), ("report_series_id", None, "1"), ("reporting_date", None, "2024-03-31")],
            "Please select a file to upload.",
        ),
    ];
    for (parts, message) in cases {
        let resp = app.post_multipart("/submissions/upload", Some(&token), parts).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", message);
        let body = body_text(resp).await;
        assert!(body.contains(&format!(r#"role="alert">{}</div>"#, message)), "{}", body);
    }
}

#[tokio::test]
async fn test_upload_rejected_by_backend_keeps_form() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    let resp = app
        .post_multipart(
            "/submissions/upload",
            Some(&token),
            &[
                ("institution_id", None, "2"),
                ("report_series_id", None, "1"),
                ("reporting_date", None, "2024-03-31"),
                ("file", Some("q1.csv"), CSV),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(r#"role="alert">Upload rejected</div>"#));
    assert!(body.contains(r#"value="2024-03-31""#));
}

#[tokio::test]
async fn test_truncated_upload_reports_read_error() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    // The field never reaches a closing boundary.
    let body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"institution_id\"\r\n\r\n1",
        BOUNDARY
    );
    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
    let resp = app.post_body("/submissions/upload", Some(&token), &content_type, body).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Upload could not be read"), "{}", body);
    assert!(!body.contains("Please choose an institution"));
}

#[tokio::test]
async fn test_detail_shows_record_results_and_notice() {
    let app = TestApp::start().await;
    let token = token_for("analyst", 3600);

    let body = body_text(app.get("/submissions/10?notice=status", Some(&token)).await).await;
    assert!(body.contains("Submission #10"));
    assert!(body.contains("Total assets must be non-negative"));
    assert!(body.contains(r#"role="alert">Status updated successfully</div>"#));
    assert!(body.contains(r#"action="/submissions/10/validate""#));
    assert!(body.contains(r#"action="/submissions/10/status""#));

    let body = body_text(app.get("/submissions/10?notice=validation", Some(&token)).await).await;
    assert!(body.contains("Validation started. Refresh to see the results."));

    let body = body_text(app.get("/submissions/10?notice=bogus", Some(&token)).await).await;
    assert!(!body.contains(r#"role="alert""#));
}

#[tokio::test]
async fn test_external_user_sees_no_actions() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    let body = body_text(app.get("/submissions/10", Some(&token)).await).await;
    assert!(body.contains("Submission #10"));
    assert!(!body.contains(r#"action="/submissions/10/validate""#));
    assert!(!body.contains(r#"action="/submissions/10/status""#));
}

#[tokio::test]
async fn test_actions_require_analyst() {
    let app = TestApp::start().await;
    let external = token_for("banker", 3600);

    let resp = app.post_form("/submissions/10/validate", Some(&external), "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = app.post_form("/submissions/10/status", Some(&external), "status=accepted").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_analyst_actions_redirect_with_notice() {
    let app = TestApp::start().await;
    let token = token_for("analyst", 3600);

    let resp = app.post_form("/submissions/10/validate", Some(&token), "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/submissions/10?notice=validation"));

    let resp = app.post_form("/submissions/10/status", Some(&token), "status=accepted").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/submissions/10?notice=status"));
}

#[tokio::test]
async fn test_unknown_status_is_not_sent() {
    let app = TestApp::start().await;
    let token = token_for("analyst", 3600);

    let resp = app.post_form("/submissions/10/status", Some(&token), "status=archived").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(r#"role="alert">Unknown submission status: archived</div>"#));
}

#[tokio::test]
async fn test_filter_clear_link_only_when_filtered() {
    let app = TestApp::start().await;
    let token = token_for("analyst", 3600);

    let body = body_text(app.get("/submissions", Some(&token)).await).await;
    assert!(!body.contains("Clear Filters"));

    let body = body_text(app.get("/submissions?status=submitted", Some(&token)).await).await;
    assert!(body.contains("Clear Filters"));
    assert!(body.contains(r#"<option value="submitted" selected>"#));
}

#[tokio::test]
async fn test_form_download_is_proxied() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    let resp = app.get("/forms/1/form", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(resp.headers()[CONTENT_DISPOSITION], r#"attachment; filename="FR_Y-9C.pdf""#);
    assert_eq!(body_text(resp).await, "%PDF-1.4 stub");

    let resp = app.get("/forms/1/instructions", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_DISPOSITION], r#"attachment; filename="FR_Y-9C_instructions.pdf""#);
}

#[tokio::test]
async fn test_unknown_form_document_is_not_found() {
    let app = TestApp::start().await;
    let token = token_for("banker", 3600);

    let resp = app.get("/forms/1/appendix", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
