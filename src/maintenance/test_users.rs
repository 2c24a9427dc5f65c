use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

use super::seed::random_name_for_letter;
use crate::shared::AppError;
use crate::user::models::{User, DEFAULT_RATING, ROLE_NORMAL};
use crate::user::repository::UserRepository;

/// Requested shape of a provisioned test account. Names left out are
/// picked from the name pool by the email's first letter.
#[derive(Debug, Clone)]
pub struct TestUserSpec {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// One entry of the local dev-only account mapping file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DevUserEntry {
    pub email: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DevUserFile {
    users: Vec<DevUserEntry>,
}

/// Creates a normal-role User row for manual testing. The matching
/// identity-provider account lives outside this client and is not created
/// here.
#[instrument(skip(users, rng))]
pub async fn provision_test_user<R: Rng + ?Sized>(
    users: &dyn UserRepository,
    spec: TestUserSpec,
    rng: &mut R,
) -> Result<User, AppError> {
    let letter = spec.email.chars().next().unwrap_or('t');
    let first_name = spec
        .first_name
        .unwrap_or_else(|| random_name_for_letter(letter, rng));
    let last_name = spec
        .last_name
        .unwrap_or_else(|| random_name_for_letter(letter, rng));

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: spec.email,
        display_name: Some(first_name.clone()),
        first_name: Some(first_name),
        last_name: Some(last_name),
        role: ROLE_NORMAL,
        rating: DEFAULT_RATING,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let created = users.create_user(&user).await?;
    info!(user_id = %created.id, email = %created.email, "Test user provisioned");

    Ok(created)
}

/// Appends (or updates) the user's entry in the dev-only mapping file.
/// The file is created on first use.
#[instrument(skip(user))]
pub async fn record_dev_user(path: &Path, user: &User) -> Result<(), AppError> {
    let mut file: DevUserFile = match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| AppError::Storage(format!("malformed dev-user file: {e}")))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DevUserFile::default(),
        Err(e) => return Err(AppError::Storage(e.to_string())),
    };

    match file.users.iter_mut().find(|u| u.email == user.email) {
        Some(existing) => existing.user_id = user.id.clone(),
        None => file.users.push(DevUserEntry {
            email: user.email.clone(),
            user_id: user.id.clone(),
        }),
    }

    let mut content = serde_json::to_string_pretty(&file)
        .map_err(|e| AppError::Storage(e.to_string()))?;
    content.push('\n');
    tokio::fs::write(path, content)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    info!(path = %path.display(), email = %user.email, "Dev user recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::InMemoryUserRepository;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn test_provision_with_explicit_names() {
        let repo = InMemoryUserRepository::new();
        let mut rng = StdRng::seed_from_u64(7);

        let user = provision_test_user(
            &repo,
            TestUserSpec {
                email: "dev@example.com".to_string(),
                first_name: Some("Dana".to_string()),
                last_name: Some("Dev".to_string()),
            },
            &mut rng,
        )
        .await
        .unwrap();

        assert_eq!(user.role, ROLE_NORMAL);
        assert_eq!(user.first_name.as_deref(), Some("Dana"));
        assert_eq!(user.last_name.as_deref(), Some("Dev"));
        assert_eq!(user.display_name.as_deref(), Some("Dana"));
    }

    #[tokio::test]
    async fn test_provision_picks_names_from_email_letter() {
        let repo = InMemoryUserRepository::new();
        let mut rng = StdRng::seed_from_u64(7);

        let user = provision_test_user(
            &repo,
            TestUserSpec {
                email: "quartz@example.com".to_string(),
                first_name: None,
                last_name: None,
            },
            &mut rng,
        )
        .await
        .unwrap();

        assert!(user
            .first_name
            .as_deref()
            .unwrap()
            .to_ascii_lowercase()
            .starts_with('q'));
    }

    #[tokio::test]
    async fn test_record_dev_user_creates_and_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev-users.json");
        let repo = InMemoryUserRepository::new();
        let mut rng = StdRng::seed_from_u64(7);

        let first = provision_test_user(
            &repo,
            TestUserSpec {
                email: "dev@example.com".to_string(),
                first_name: None,
                last_name: None,
            },
            &mut rng,
        )
        .await
        .unwrap();
        record_dev_user(&path, &first).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let file: DevUserFile = serde_json::from_str(&content).unwrap();
        assert_eq!(file.users.len(), 1);
        assert_eq!(file.users[0].user_id, first.id);

        // Re-provisioning the same email replaces the recorded id.
        let second = provision_test_user(
            &repo,
            TestUserSpec {
                email: "dev@example.com".to_string(),
                first_name: None,
                last_name: None,
            },
            &mut rng,
        )
        .await
        .unwrap();
        record_dev_user(&path, &second).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let file: DevUserFile = serde_json::from_str(&content).unwrap();
        assert_eq!(file.users.len(), 1);
        assert_eq!(file.users[0].user_id, second.id);
    }
}
