//! Validation rules (analyst and above): list plus the add/edit dialogs.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use regcollect_common::records::{ValidationRule, ValidationRuleInput};
use regcollect_common::roles::{RULE_TYPES, SEVERITIES};
use regcollect_common::Role;

use crate::handlers::{non_blank, FormPage, ListPage};
use crate::session::Session;
use crate::state::SharedState;
use crate::view::Banner;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleForm {
    pub rule_name: String,
    pub rule_description: String,
    pub rule_type: String,
    pub rule_definition: String,
    pub severity: String,
    pub effective_date: String,
    pub end_date: String,
}

impl Default for RuleForm {
    fn default() -> Self {
        Self {
            rule_name: String::new(),
            rule_description: String::new(),
            rule_type: RULE_TYPES[0].to_string(),
            rule_definition: String::new(),
            severity: SEVERITIES[0].to_string(),
            effective_date: String::new(),
            end_date: String::new(),
        }
    }
}

impl RuleForm {
    fn from_record(rule: &ValidationRule) -> Self {
        Self {
            rule_name: rule.rule_name.clone(),
            rule_description: rule.rule_description.clone().unwrap_or_default(),
            rule_type: rule.rule_type.clone(),
            rule_definition: rule.rule_definition.clone().unwrap_or_default(),
            severity: rule.severity.clone(),
            // Date inputs want plain YYYY-MM-DD.
            effective_date: rule.effective_date.chars().take(10).collect(),
            end_date: rule.end_date.as_deref().unwrap_or_default().chars().take(10).collect(),
        }
    }

    /// Rule type and severity must come from the fixed lists.
    pub fn to_input(&self) -> Result<ValidationRuleInput, String> {
        if !RULE_TYPES.contains(&self.rule_type.as_str()) {
            return Err(format!("Unknown rule type: {}", self.rule_type));
        }
        if !SEVERITIES.contains(&self.severity.as_str()) {
            return Err(format!("Unknown severity: {}", self.severity));
        }
        Ok(ValidationRuleInput {
            rule_name: self.rule_name.trim().to_string(),
            rule_description: non_blank(&self.rule_description),
            rule_type: self.rule_type.clone(),
            rule_definition: self.rule_definition.clone(),
            severity: self.severity.clone(),
            effective_date: self.effective_date.trim().to_string(),
            end_date: non_blank(&self.end_date),
        })
    }
}

fn list_with_banner(session: &Session, state: &SharedState, banner: Banner) -> Response {
    state.views.page("validation_rules.html", Some(&session.user), ListPage::<Vec<ValidationRule>>::with_banner(banner))
}

pub async fn rules_page(session: Session, State(state): State<SharedState>) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    Ok(state.views.page("validation_rules.html", Some(&session.user), ListPage::<Vec<ValidationRule>>::loading()))
}

pub async fn rules_table(session: Session, State(state): State<SharedState>) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    let result = session.api().list_rules().await;
    Ok(state.views.page("fragments/validation_rules.html", Some(&session.user), ListPage::fetched(result, "validation rules")))
}

pub async fn new_rule(session: Session, State(state): State<SharedState>) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    let page = FormPage::create("/validation/rules/new", RuleForm::default());
    Ok(state.views.page("validation_rule_form.html", Some(&session.user), page))
}

pub async fn create_rule(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<RuleForm>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    let outcome = match form.to_input() {
        Ok(input) => session.api().create_rule(&input).await.map_err(|e| {
            error!("Error saving validation rule: {}", e);
            e.user_message()
        }),
        Err(msg) => Err(msg),
    };
    Ok(match outcome {
        Ok(created) => {
            info!(id = created.id, rule = %created.rule_name, "Validation rule created");
            Redirect::to("/validation/rules").into_response()
        }
        Err(msg) => {
            let page = FormPage::create("/validation/rules/new", form).failed(msg);
            state.views.page("validation_rule_form.html", Some(&session.user), page)
        }
    })
}

pub async fn edit_rule(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    Ok(match session.api().find_rule(id).await {
        Ok(Some(rule)) => {
            let page = FormPage::edit(format!("/validation/rules/{}/edit", id), RuleForm::from_record(&rule));
            state.views.page("validation_rule_form.html", Some(&session.user), page)
        }
        Ok(None) => list_with_banner(&session, &state, Banner::error(format!("Validation rule {} not found.", id))),
        Err(e) => {
            error!("Error fetching validation rule {}: {}", id, e);
            list_with_banner(&session, &state, Banner::error("Failed to load validation rules. Please try again later."))
        }
    })
}

pub async fn update_rule(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Form(form): Form<RuleForm>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    let outcome = match form.to_input() {
        Ok(input) => session.api().update_rule(id, &input).await.map_err(|e| {
            error!("Error saving validation rule {}: {}", id, e);
            e.user_message()
        }),
        Err(msg) => Err(msg),
    };
    Ok(match outcome {
        Ok(_) => {
            info!(id, "Validation rule updated");
            Redirect::to("/validation/rules").into_response()
        }
        Err(msg) => {
            let page = FormPage::edit(format!("/validation/rules/{}/edit", id), form).failed(msg);
            state.views.page("validation_rule_form.html", Some(&session.user), page)
        }
    })
}
