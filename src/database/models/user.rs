use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Role;

/// Stored identity. Deliberately not `Serialize`: the hash never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub user_id: String,
    pub password_hash: String,
    pub role: Role,
    /// Admin that created this identity; `None` for the admin itself
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_id: String, password_hash: String, role: Role, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            password_hash,
            role,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            user_id: self.user_id.clone(),
            role: self.role,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// Client-facing view of an identity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub user_id: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
