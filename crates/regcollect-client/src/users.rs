use reqwest::Method;
use tracing::instrument;

use regcollect_common::records::{ProfileUpdate, User, UserInput};
use regcollect_common::Result;

use crate::client::ApiClient;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users/").await
    }

    pub async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.list_users().await?.into_iter().find(|user| user.id == id))
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: &UserInput) -> Result<User> {
        self.send_json(Method::POST, "/users/", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: i64, input: &UserInput) -> Result<User> {
        self.send_json(Method::PUT, &format!("/users/{}", id), input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/users/{}", id)).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User> {
        self.send_json(Method::PUT, "/users/me", update).await
    }
}
