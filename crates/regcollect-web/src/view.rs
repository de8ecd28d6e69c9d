//! Template environment and the view-state types every page renders through.
//!
//! Templates are embedded at compile time and auto-escaped as HTML. Each list
//! page renders a [`Loadable`] twice: as `Loading` inside the page shell, and
//! as `Loaded`/`Failed` from its `/table` fragment route once the backend
//! answers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, NaiveDate};
use minijinja::{Environment, Value};
use serde::Serialize;
use tracing::error;

use regcollect_common::records::User;
use regcollect_common::roles::{RECORD_STATUSES, RULE_TYPES, SEVERITIES, SUBMISSION_STATUSES};
use regcollect_common::{has_role, Role};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html",               include_str!("../templates/layout.html")),
    ("nav.html",                  include_str!("../templates/nav.html")),
    ("loading.html",              include_str!("../templates/loading.html")),
    ("banner.html",               include_str!("../templates/banner.html")),
    ("login.html",                include_str!("../templates/login.html")),
    ("dashboard.html",            include_str!("../templates/dashboard.html")),
    ("institutions.html",         include_str!("../templates/institutions.html")),
    ("institution_detail.html",   include_str!("../templates/institution_detail.html")),
    ("institution_form.html",     include_str!("../templates/institution_form.html")),
    ("report_series.html",        include_str!("../templates/report_series.html")),
    ("report_series_detail.html", include_str!("../templates/report_series_detail.html")),
    ("report_series_form.html",   include_str!("../templates/report_series_form.html")),
    ("submissions.html",          include_str!("../templates/submissions.html")),
    ("submission_detail.html",    include_str!("../templates/submission_detail.html")),
    ("submission_upload.html",    include_str!("../templates/submission_upload.html")),
    ("forms.html",                include_str!("../templates/forms.html")),
    ("validation_rules.html",     include_str!("../templates/validation_rules.html")),
    ("validation_rule_form.html", include_str!("../templates/validation_rule_form.html")),
    ("mdrm.html",                 include_str!("../templates/mdrm.html")),
    ("users.html",                include_str!("../templates/users.html")),
    ("user_form.html",            include_str!("../templates/user_form.html")),
    ("profile.html",              include_str!("../templates/profile.html")),
    ("fragments/institutions.html",     include_str!("../templates/fragments/institutions.html")),
    ("fragments/report_series.html",    include_str!("../templates/fragments/report_series.html")),
    ("fragments/submissions.html",      include_str!("../templates/fragments/submissions.html")),
    ("fragments/forms.html",            include_str!("../templates/fragments/forms.html")),
    ("fragments/validation_rules.html", include_str!("../templates/fragments/validation_rules.html")),
    ("fragments/mdrm.html",             include_str!("../templates/fragments/mdrm.html")),
    ("fragments/users.html",            include_str!("../templates/fragments/users.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_filter("short_date", short_date);
        env.add_filter("status_badge", status_badge);
        env.add_filter("humanize", humanize);
        env.add_global("record_statuses", Value::from_serialize(RECORD_STATUSES));
        env.add_global("submission_statuses", Value::from_serialize(SUBMISSION_STATUSES));
        env.add_global("rule_types", Value::from_serialize(RULE_TYPES));
        env.add_global("severities", Value::from_serialize(SEVERITIES));
        env.add_global("roles", Value::from_serialize(Role::ALL.map(|r| r.as_str())));
        Ok(Self { env })
    }

    pub fn render_str<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Response {
        match self.render_str(name, ctx) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!(template = name, "Template rendering failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Page could not be rendered").into_response()
            }
        }
    }

    /// Render a template with the navigation context for `user` merged in.
    pub fn page<T: Serialize>(&self, name: &str, user: Option<&User>, body: T) -> Response {
        self.render(name, PageFrame::new(user, body))
    }
}

/// Navigation context shared by every page, with the page's own fields flattened in.
#[derive(Serialize)]
pub struct PageFrame<'a, T: Serialize> {
    pub current_user: Option<&'a User>,
    pub is_analyst: bool,
    pub is_admin: bool,
    #[serde(flatten)]
    pub page: T,
}

impl<'a, T: Serialize> PageFrame<'a, T> {
    pub fn new(user: Option<&'a User>, page: T) -> Self {
        let role = user.map(|u| u.role.as_str());
        Self {
            current_user: user,
            is_analyst: has_role(role, Role::Analyst.as_str()),
            is_admin: has_role(role, Role::Admin.as_str()),
            page,
        }
    }
}

/// Loading / error / data state of one fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Loadable<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> Loadable<T> {
    /// Log a failed fetch and replace it with the generic banner text.
    pub fn from_result(result: regcollect_common::Result<T>, what: &str) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(e) => {
                error!("Error fetching {}: {}", what, e);
                Loadable::Failed(format!("Failed to load {}. Please try again later.", what))
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Failed(msg) => Loadable::Failed(msg),
            Loadable::Loaded(value) => Loadable::Loaded(f(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: &'static str,
    pub text: String,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: "success", text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: "danger", text: text.into() }
    }
}

// === Filters ===

/// Formatted dates are marked safe so their slashes survive auto-escaping.
/// Unparseable backend text is returned as a plain value and still escaped.
pub fn short_date(value: Value) -> Value {
    if value.is_undefined() || value.is_none() {
        return Value::from_safe_string(MISSING_DATE.to_string());
    }
    let Some(raw) = value.as_str() else {
        return Value::from(value.to_string());
    };
    match parse_date(raw) {
        Some(formatted) => Value::from_safe_string(formatted),
        None if raw.trim().is_empty() => Value::from_safe_string(MISSING_DATE.to_string()),
        None => Value::from(raw.trim()),
    }
}

const MISSING_DATE: &str = "—";

fn parse_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let day_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .ok()
        .map(|d| format!("{}/{}/{}", d.month(), d.day(), d.year()))
}

/// `2024-03-31` or `2024-03-31T10:00:00` -> `3/31/2024`; anything else verbatim.
pub fn format_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return MISSING_DATE.to_string();
    }
    parse_date(raw).unwrap_or_else(|| raw.trim().to_string())
}

pub fn status_badge(value: Value) -> String {
    let class = match value.as_str().unwrap_or_default() {
        "active" | "passed" | "approved" | "accepted" | "validated" | "resolved" => "success",
        "submitted" => "primary",
        "rejected" | "failed" | "inactive" | "error" => "danger",
        "pending" | "in_progress" | "draft" | "warning" | "open" => "warning",
        _ => "secondary",
    };
    class.to_string()
}

/// `cross_field` -> `Cross field`
pub fn humanize(value: String) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
