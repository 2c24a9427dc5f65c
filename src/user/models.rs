use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account created through the external identity provider.
pub const ROLE_NORMAL: i32 = 0;
/// Device-local account whose primary key is the device UUID.
pub const ROLE_ANONYMOUS: i32 = 9;
/// Non-human player usable to fill a game slot.
pub const ROLE_NPC: i32 = 13;

pub const DEFAULT_RATING: i32 = 1200;

/// Remote User row, camelCase on the wire.
///
/// Anonymous users are created with `id` equal to the device UUID so the
/// identity survives without a backend-issued subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: i32,
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_rating() -> i32 {
    DEFAULT_RATING
}

impl User {
    pub fn is_npc(&self) -> bool {
        self.role == ROLE_NPC
    }

    /// Name shown in lobby and game lists: displayName, then firstName.
    /// Empty strings count as absent.
    pub fn preferred_name(&self) -> Option<&str> {
        non_empty(&self.display_name).or_else(|| non_empty(&self.first_name))
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
