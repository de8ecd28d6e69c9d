use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegcollectError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid access token: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RegcollectError>;

impl RegcollectError {
    /// Build an `Api` error from a non-success response body.
    /// Falls back to the reason phrase when the body carries no `detail`.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let detail = extract_detail(body).unwrap_or_else(|| match reason {
            Some(r) => r.to_string(),
            None => format!("HTTP {}", status),
        });
        RegcollectError::Api { status, detail }
    }

    /// Text suitable for showing to the user in a banner.
    pub fn user_message(&self) -> String {
        match self {
            RegcollectError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RegcollectError::Api { status, .. } => Some(*status),
            RegcollectError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Pull the human-readable `detail` out of a FastAPI-style error body.
///
/// A string detail is returned verbatim; a list of validation errors is
/// flattened to their `msg` fields joined with `"; "`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
