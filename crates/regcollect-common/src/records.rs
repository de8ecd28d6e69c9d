//! Records exchanged with the collection backend.
//! Display projections only: every field the backend may omit defaults, and
//! dates stay as the backend's ISO strings until a view formats them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Institution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub id: i64,
    pub rssd_id: String,
    pub name: String,
    pub institution_type: String, // e.g. bank_holding_company
    pub contact_info: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionInput {
    pub rssd_id: String,
    pub name: String,
    pub institution_type: String,
    pub contact_info: Option<String>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Report series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSeries {
    pub id: i64,
    pub series_code: String,  // e.g. FR Y-9C
    pub series_name: String,
    pub description: Option<String>,
    pub filing_frequency: String,
    pub form_pdf_path: Option<String>,
    pub instructions_pdf_path: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSeriesInput {
    pub series_code: String,
    pub series_name: String,
    pub description: Option<String>,
    pub filing_frequency: String,
    pub form_pdf_path: Option<String>,
    pub instructions_pdf_path: Option<String>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub id: i64,
    pub institution_id: i64,
    pub report_series_id: i64,
    pub institution_name: Option<String>,
    pub report_series_name: Option<String>,
    pub reporting_date: String,
    pub submission_date: Option<String>,
    pub file_path: Option<String>,
    pub status: String,            // draft | submitted | validated | accepted | rejected
    pub validation_status: String, // pending | in_progress | passed | failed
}

/// Query filters for the submissions list. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_series_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SubmissionFilter {
    pub fn for_institution(institution_id: i64) -> Self {
        Self { institution_id: Some(institution_id), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.institution_id.is_none() && self.report_series_id.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionUpload {
    pub institution_id: i64,
    pub report_series_id: i64,
    pub reporting_date: String,
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Acknowledgement returned when a validation run is triggered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationTriggered {
    pub detail: String,
    pub status: Option<String>,
    pub validation_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormEntry {
    pub id: i64,
    pub series_code: String,
    pub series_name: String,
    pub has_form: bool,
    pub has_instructions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormDocument {
    Form,
    Instructions,
}

impl FormDocument {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "form" => Some(FormDocument::Form),
            "instructions" => Some(FormDocument::Instructions),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormDocument::Form => "form",
            FormDocument::Instructions => "instructions",
        }
    }
}

/// A downloaded PDF, ready to hand back to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDownload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRule {
    pub id: i64,
    pub rule_name: String,
    pub rule_description: Option<String>,
    pub rule_type: String,
    pub rule_definition: Option<String>,
    pub severity: String, // error | warning
    pub effective_date: String,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRuleInput {
    pub rule_name: String,
    pub rule_description: Option<String>,
    pub rule_type: String,
    pub rule_definition: String,
    pub severity: String,
    pub effective_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationResult {
    pub id: i64,
    pub submission_id: i64,
    pub rule_id: i64,
    pub field_identifier: String,
    pub error_message: String,
    pub severity: String,
    pub status: String, // open | resolved
    pub resolved_at: Option<String>,
}

// ---------------------------------------------------------------------------
// MDRM dictionary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdrmItem {
    pub id: i64,
    pub mdrm_identifier: String, // e.g. BHCK2170
    pub item_name: String,
    pub item_definition: Option<String>,
    pub data_type: String,
    pub valid_values: Option<String>,
    pub series_mnemonic: Option<String>,
    pub effective_date: String,
    pub end_date: Option<String>,
}

impl MdrmItem {
    /// Case-insensitive substring match over identifier, name and series mnemonic.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.mdrm_identifier.to_lowercase().contains(needle_lower)
            || self.item_name.to_lowercase().contains(needle_lower)
            || self
                .series_mnemonic
                .as_deref()
                .map(|m| m.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

/// Filter dictionary items by a search term; a blank term keeps everything.
pub fn filter_mdrm_items<'a>(items: &'a [MdrmItem], term: &str) -> Vec<&'a MdrmItem> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

// ---------------------------------------------------------------------------
// Users & auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub institution_id: Option<i64>,
    pub status: String,
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub role: String,
    pub institution_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String { "bearer".to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(id: i64, ident: &str, name: &str, mnemonic: Option<&str>) -> MdrmItem {
        MdrmItem {
            id,
            mdrm_identifier: ident.into(),
            item_name: name.into(),
            series_mnemonic: mnemonic.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_mdrm_filter_is_case_insensitive_over_three_fields() {
        let items = vec![
            item(1, "BHCK2170", "Total Assets", Some("BHCK")),
            item(2, "RCON2200", "Total Deposits", Some("RCON")),
            item(3, "XYZ0001", "Memo item", None),
        ];
        let ids = |term: &str| filter_mdrm_items(&items, term).iter().map(|i| i.id).collect::<Vec<_>>();

        assert_eq!(ids("bhck"), vec![1]);
        assert_eq!(ids("total"), vec![1, 2]);
        assert_eq!(ids("rcon"), vec![2]);
        assert_eq!(ids("  "), vec![1, 2, 3]);
        assert_eq!(ids("nothing"), Vec::<i64>::new());
    }

    #[test]
    fn test_partial_records_deserialize() {
        let sub: Submission = serde_json::from_str(r#"{"id": 7, "status": "submitted", "extra": 1}"#).unwrap();
        assert_eq!(sub.id, 7);
        assert_eq!(sub.status, "submitted");
        assert!(sub.institution_name.is_none());
    }

    #[test]
    fn test_user_update_omits_empty_password() {
        let input = UserInput {
            username: "bank1".into(),
            email: "ops@bank1.example".into(),
            role: "external".into(),
            institution_id: None,
            password: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("institution_id").unwrap().is_null());
    }

    #[test]
    fn test_submission_filter_serializes_only_set_fields() {
        let filter = SubmissionFilter::for_institution(3);
        assert_eq!(serde_json::to_value(&filter).unwrap(), serde_json::json!({"institution_id": 3}));
        assert!(SubmissionFilter::default().is_empty());
    }
}
