use reqwest::Method;
use tracing::instrument;

use regcollect_common::records::{ValidationResult, ValidationRule, ValidationRuleInput};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_rules(&self) -> Result<Vec<ValidationRule>> {
        self.get_json("/validation/rules").await
    }

    /// The backend has no single-rule endpoint, so this searches the list.
    pub async fn find_rule(&self, id: i64) -> Result<Option<ValidationRule>> {
        Ok(self.list_rules().await?.into_iter().find(|rule| rule.id == id))
    }

    #[instrument(skip(self, input), fields(rule = %input.rule_name))]
    pub async fn create_rule(&self, input: &ValidationRuleInput) -> Result<ValidationRule> {
        self.send_json(Method::POST, "/validation/rules", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_rule(&self, id: i64, input: &ValidationRuleInput) -> Result<ValidationRule> {
        self.send_json(Method::PUT, &format!("/validation/rules/{}", id), input).await
    }

    #[instrument(skip(self))]
    pub async fn validation_results(&self, submission_id: i64) -> Result<Vec<ValidationResult>> {
        self.get_json(&format!("/validation/results/{}", submission_id)).await
    }
}
