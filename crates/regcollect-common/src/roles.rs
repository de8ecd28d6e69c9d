//! Role hierarchy used to gate pages: external < analyst < admin.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    External,
    Analyst,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::External, Role::Analyst, Role::Admin];

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "external" => Some(Role::External),
            "analyst" => Some(Role::Analyst),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::External => "external",
            Role::Analyst => "analyst",
            Role::Admin => "admin",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Role::External => 1,
            Role::Analyst => 2,
            Role::Admin => 3,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank of a role name. Unknown names rank 0, below every known role.
pub fn rank(role: &str) -> u8 {
    Role::parse(role).map(|r| r.rank()).unwrap_or(0)
}

/// True when `current` is at or above `required` in the hierarchy.
///
/// No current user never qualifies, and an unknown required role cannot be
/// satisfied by anyone.
pub fn has_role(current: Option<&str>, required: &str) -> bool {
    let Some(current) = current else {
        return false;
    };
    match Role::parse(required) {
        Some(required) => rank(current) >= required.rank(),
        None => false,
    }
}

/// Statuses accepted by the submission status endpoint.
pub const SUBMISSION_STATUSES: [&str; 5] = ["draft", "submitted", "validated", "accepted", "rejected"];

pub const RULE_TYPES: [&str; 6] = ["data_type", "range", "format", "cross_field", "historical", "mathematical"];

pub const SEVERITIES: [&str; 2] = ["error", "warning"];

pub const RECORD_STATUSES: [&str; 2] = ["active", "inactive"];
