use reqwest::Method;
use tracing::instrument;

use regcollect_common::records::{Institution, InstitutionInput};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_institutions(&self) -> Result<Vec<Institution>> {
        self.get_json("/institutions/").await
    }

    #[instrument(skip(self))]
    pub async fn get_institution(&self, id: i64) -> Result<Institution> {
        self.get_json(&format!("/institutions/{}", id)).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_institution(&self, input: &InstitutionInput) -> Result<Institution> {
        self.send_json(Method::POST, "/institutions/", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_institution(&self, id: i64, input: &InstitutionInput) -> Result<Institution> {
        self.send_json(Method::PUT, &format!("/institutions/{}", id), input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_institution(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/institutions/{}", id)).await
    }
}
