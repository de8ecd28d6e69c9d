//! Blank report forms and their instruction PDFs.

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, instrument};

use regcollect_common::records::{FormDocument, FormDownload, FormEntry};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_forms(&self) -> Result<Vec<FormEntry>> {
        self.get_json("/forms/").await
    }

    #[instrument(skip(self))]
    pub async fn download_form(&self, series_id: i64, document: FormDocument) -> Result<FormDownload> {
        let path = match document {
            FormDocument::Form => format!("/forms/{}", series_id),
            FormDocument::Instructions => format!("/forms/instructions/{}", series_id),
        };
        let resp = self.send(self.request(Method::GET, &path)).await?;

        let headers = resp.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/pdf")
            .to_string();
        let file_name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| format!("series_{}_{}.pdf", series_id, document.as_str()));

        let bytes = resp.bytes().await?.to_vec();
        debug!(%file_name, size = bytes.len(), "form downloaded");
        Ok(FormDownload { file_name, content_type, bytes })
    }
}

/// `attachment; filename="FR_Y-9C.pdf"` -> `FR_Y-9C.pdf`
fn disposition_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
