use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use super::models::User;
use crate::shared::AppError;
use crate::store::client::{decode_field, decode_items};
use crate::store::GraphQlClient;

/// Trait for User collection operations.
#[async_trait]
pub trait UserRepository {
    /// Point read by primary key. Anonymous lookups pass the device UUID.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Creates a row with a caller-supplied primary key and returns the
    /// stored row.
    async fn create_user(&self, user: &User) -> Result<User, AppError>;

    /// Sets displayName and firstName together, the way the rename flow
    /// writes them.
    async fn update_display_name(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<User, AppError>;

    async fn list_users_by_role(&self, role: i32) -> Result<Vec<User>, AppError>;
}

/// In-memory implementation of UserRepository for development and testing.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        let user = users.get(user_id).cloned();

        debug!(user_id = %user_id, found = user.is_some(), "Fetched user from memory");
        Ok(user)
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.id) {
            warn!(user_id = %user.id, "User already exists in memory");
            return Err(AppError::Backend("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        info!(user_id = %user.id, role = user.role, "User created in memory");
        Ok(user.clone())
    }

    #[instrument(skip(self))]
    async fn update_display_name(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.display_name = Some(display_name.to_string());
        user.first_name = Some(display_name.to_string());
        user.updated_at = Some(Utc::now());

        info!(user_id = %user_id, display_name = %display_name, "Display name updated");
        Ok(user.clone())
    }

    #[instrument(skip(self))]
    async fn list_users_by_role(&self, role: i32) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().unwrap();
        let matches: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();

        debug!(role = role, count = matches.len(), "Listed users by role");
        Ok(matches)
    }
}

const USER_FIELDS: &str =
    "id email firstName lastName displayName role rating createdAt updatedAt";

/// GraphQL-backed implementation of UserRepository.
pub struct GraphQlUserRepository {
    client: Arc<GraphQlClient>,
}

impl GraphQlUserRepository {
    pub fn new(client: Arc<GraphQlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for GraphQlUserRepository {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let query = format!("query GetUser($id: ID!) {{ getUser(id: $id) {{ {USER_FIELDS} }} }}");
        let data = self
            .client
            .execute(&query, json!({ "id": user_id }))
            .await?;

        decode_field(&data, "getUser")
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let query = format!(
            "mutation CreateUser($input: CreateUserInput!) {{ createUser(input: $input) {{ {USER_FIELDS} }} }}"
        );
        let input = serde_json::to_value(user)
            .map_err(|e| AppError::Backend(format!("failed to encode user: {e}")))?;
        let data = self.client.execute(&query, json!({ "input": input })).await?;

        decode_field(&data, "createUser")?
            .ok_or_else(|| AppError::Backend("Failed to create user".to_string()))
    }

    #[instrument(skip(self))]
    async fn update_display_name(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<User, AppError> {
        let query = format!(
            "mutation UpdateUser($input: UpdateUserInput!) {{ updateUser(input: $input) {{ {USER_FIELDS} }} }}"
        );
        let variables = json!({
            "input": {
                "id": user_id,
                "displayName": display_name,
                "firstName": display_name,
            }
        });
        let data = self.client.execute(&query, variables).await?;

        decode_field(&data, "updateUser")?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self))]
    async fn list_users_by_role(&self, role: i32) -> Result<Vec<User>, AppError> {
        let query = format!(
            "query ListUsers($filter: ModelUserFilterInput) {{ listUsers(filter: $filter) {{ items {{ {USER_FIELDS} }} }} }}"
        );
        let variables = json!({ "filter": { "role": { "eq": role } } });
        let data = self.client.execute(&query, variables).await?;

        decode_items(&data, "listUsers")
    }
}
