use std::sync::Arc;
use chrono::Utc;
use tracing::{info, instrument};

use super::models::{User, DEFAULT_RATING, ROLE_ANONYMOUS};
use super::repository::UserRepository;
use crate::identity::{default_display_name, IdentityProvider};
use crate::shared::AppError;

/// Service for account lookup and the anonymous sign-in flow.
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    identity: Arc<IdentityProvider>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        identity: Arc<IdentityProvider>,
    ) -> Self {
        Self {
            repository,
            identity,
        }
    }

    /// Fetches the anonymous user for this device, creating it on first
    /// use. The row is created with the device UUID as its primary key,
    /// which is why the flow is get-then-create rather than create with a
    /// generated key.
    #[instrument(skip(self))]
    pub async fn get_or_create_anonymous(&self) -> Result<User, AppError> {
        let uuid = self.identity.get_or_create_uuid().await?;

        if let Some(user) = self.repository.get_user(&uuid).await? {
            return Ok(user);
        }

        let display_name = default_display_name(&uuid);
        let now = Utc::now();
        let user = User {
            id: uuid,
            email: format!("{display_name}@anonymous.local"),
            first_name: Some(display_name.clone()),
            last_name: None,
            display_name: Some(display_name),
            role: ROLE_ANONYMOUS,
            rating: DEFAULT_RATING,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let created = self.repository.create_user(&user).await?;
        info!(user_id = %created.id, "Anonymous user created");

        Ok(created)
    }

    /// Renames the user. displayName and firstName move together.
    #[instrument(skip(self))]
    pub async fn update_display_name(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<User, AppError> {
        self.repository
            .update_display_name(user_id, display_name)
            .await
    }
}
