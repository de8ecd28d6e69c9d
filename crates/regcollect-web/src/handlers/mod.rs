//! HTTP handlers for all web routes.

pub mod auth;
pub mod dashboard;
pub mod institutions;
pub mod report_series;
pub mod submissions;
pub mod forms;
pub mod validation_rules;
pub mod mdrm;
pub mod users;
pub mod profile;

use serde::Serialize;

use crate::view::{Banner, Loadable};

/// Context for a list page shell and its `/table` fragment.
#[derive(Serialize)]
pub(crate) struct ListPage<T: Serialize> {
    pub table: Loadable<T>,
    pub banner: Option<Banner>,
}

impl<T: Serialize> ListPage<T> {
    pub fn loading() -> Self {
        Self { table: Loadable::Loading, banner: None }
    }

    /// Shell with a banner above the table, used after a failed write.
    pub fn with_banner(banner: Banner) -> Self {
        Self { table: Loadable::Loading, banner: Some(banner) }
    }

    pub fn fetched(result: regcollect_common::Result<T>, what: &str) -> Self {
        Self { table: Loadable::from_result(result, what), banner: None }
    }
}

/// Context for a create/edit dialog.
#[derive(Serialize)]
pub(crate) struct FormPage<F: Serialize> {
    pub editing: bool,
    pub action: String,
    pub form: F,
    pub banner: Option<Banner>,
}

impl<F: Serialize> FormPage<F> {
    pub fn create(action: &str, form: F) -> Self {
        Self { editing: false, action: action.to_string(), form, banner: None }
    }

    pub fn edit(action: String, form: F) -> Self {
        Self { editing: true, action, form, banner: None }
    }

    pub fn failed(mut self, message: String) -> Self {
        self.banner = Some(Banner::error(message));
        self
    }
}

/// Form inputs arrive as strings; an all-whitespace field means "not set".
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional numeric id from a form or query field.
pub(crate) fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" FR Y-9C "), Some("FR Y-9C".to_string()));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("abc"), None);
    }
}
