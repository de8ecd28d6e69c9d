use reqwest::Method;
use tracing::instrument;

use regcollect_common::records::{ReportSeries, ReportSeriesInput};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_report_series(&self) -> Result<Vec<ReportSeries>> {
        self.get_json("/report-series/").await
    }

    #[instrument(skip(self))]
    pub async fn get_report_series(&self, id: i64) -> Result<ReportSeries> {
        self.get_json(&format!("/report-series/{}", id)).await
    }

    #[instrument(skip(self, input), fields(code = %input.series_code))]
    pub async fn create_report_series(&self, input: &ReportSeriesInput) -> Result<ReportSeries> {
        self.send_json(Method::POST, "/report-series/", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_report_series(&self, id: i64, input: &ReportSeriesInput) -> Result<ReportSeries> {
        self.send_json(Method::PUT, &format!("/report-series/{}", id), input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_report_series(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/report-series/{}", id)).await
    }
}
