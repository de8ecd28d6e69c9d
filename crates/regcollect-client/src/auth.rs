//! Authentication endpoints (`/auth/*`).

use reqwest::Method;
use tracing::{info, instrument, warn};

use regcollect_common::records::{AccessToken, User};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    /// OAuth2 password flow: credentials go form-encoded, not as JSON.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .form(&[("username", username), ("password", password)]);
        let token: AccessToken = self.send(builder).await?.json().await?;
        info!(username, "login accepted by backend");
        Ok(token)
    }

    /// Tokens are stateless on the backend, so a failure here is only logged.
    pub async fn logout(&self) {
        if let Err(e) = self.send_empty(Method::POST, "/auth/logout").await {
            warn!("backend logout failed: {}", e);
        }
    }

    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        self.get_json("/auth/profile").await
    }
}
