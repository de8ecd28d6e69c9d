//! Unverified access-token claims.
//!
//! The backend signs and verifies tokens; the UI only reads the payload to
//! learn when the session ends.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegcollectError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Seconds since the epoch.
    #[serde(default)]
    pub exp: Option<f64>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT without checking its signature.
    pub fn decode(token: &str) -> Result<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next()) {
            (Some(_), Some(payload)) if !payload.is_empty() => payload,
            _ => return Err(RegcollectError::Token("missing payload segment".to_string())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| RegcollectError::Token(format!("payload is not base64url: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| RegcollectError::Token(format!("payload is not JSON claims: {}", e)))
    }

    /// Tokens without `exp` never expire on the client side.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        matches!(self.exp, Some(exp) if exp < now_secs as f64)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp as i64, 0))
    }
}
