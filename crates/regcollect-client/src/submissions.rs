//! Data submissions: listing with filters, upload, and status transitions.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{info, instrument};

use regcollect_common::records::{Submission, SubmissionFilter, SubmissionUpload, ValidationTriggered};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    /// External users only ever see their own institution's submissions;
    /// the backend applies that restriction.
    #[instrument(skip(self))]
    pub async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        self.get_json_with_query("/submissions/", filter).await
    }

    #[instrument(skip(self))]
    pub async fn get_submission(&self, id: i64) -> Result<Submission> {
        self.get_json(&format!("/submissions/{}", id)).await
    }

    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload_submission(&self, upload: SubmissionUpload) -> Result<Submission> {
        let form = Form::new()
            .text("institution_id", upload.institution_id.to_string())
            .text("report_series_id", upload.report_series_id.to_string())
            .text("reporting_date", upload.reporting_date)
            .part("file", Part::bytes(upload.bytes).file_name(upload.file_name));

        let builder = self.request(Method::POST, "/submissions/upload").multipart(form);
        let submission: Submission = self.send(builder).await?.json().await?;
        info!(id = submission.id, "submission uploaded");
        Ok(submission)
    }

    #[instrument(skip(self))]
    pub async fn validate_submission(&self, id: i64) -> Result<ValidationTriggered> {
        let builder = self.request(Method::POST, &format!("/submissions/{}/validate", id));
        Ok(self.send(builder).await?.json().await?)
    }

    /// The status endpoint takes a form field, not JSON.
    #[instrument(skip(self))]
    pub async fn update_submission_status(&self, id: i64, status: &str) -> Result<Submission> {
        let builder = self
            .request(Method::PUT, &format!("/submissions/{}/status", id))
            .form(&[("status", status)]);
        Ok(self.send(builder).await?.json().await?)
    }
}
