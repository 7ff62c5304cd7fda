use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{PolicyRecord, User};
use super::{DatabaseError, Store};
use crate::auth::Role;
use crate::filter::PolicyQuery;
use crate::policy::PolicyType;

/// Process-local store used when no DATABASE_URL is configured and in tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    policies: RwLock<HashMap<Uuid, PolicyRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned(record: &PolicyRecord, policy_type: PolicyType, owner: Uuid) -> bool {
    record.policy_type == policy_type && record.created_by == owner
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, DatabaseError> {
        // uniqueness check and insert under one write lock
        let mut users = self.users.write().await;
        if users.values().any(|u| u.user_id == user.user_id) {
            return Err(DatabaseError::Conflict(format!("userId '{}' already exists", user.user_id)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError> {
        let users = self.users.read().await;
        let mut out: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.user_id.cmp(&a.user_id)));
        Ok(out)
    }

    async fn count_users_by_role(&self, role: Role) -> Result<u64, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.role == role).count() as u64)
    }

    async fn find_policies(&self, query: &PolicyQuery) -> Result<Vec<PolicyRecord>, DatabaseError> {
        let policies = self.policies.read().await;
        let mut out: Vec<PolicyRecord> = policies.values().filter(|p| query.matches(p)).cloned().collect();
        query.sort(&mut out);
        Ok(out)
    }

    async fn find_policy(
        &self,
        policy_type: PolicyType,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<PolicyRecord>, DatabaseError> {
        let policies = self.policies.read().await;
        Ok(policies.get(&id).filter(|p| owned(p, policy_type, owner)).cloned())
    }

    async fn insert_policy(&self, record: PolicyRecord) -> Result<PolicyRecord, DatabaseError> {
        self.policies.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn replace_policy(&self, record: &PolicyRecord) -> Result<bool, DatabaseError> {
        let mut policies = self.policies.write().await;
        match policies.get_mut(&record.id) {
            Some(existing) if owned(existing, record.policy_type, record.created_by) => {
                existing.fields = record.fields.clone();
                existing.updated_at = record.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_policy(&self, policy_type: PolicyType, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let mut policies = self.policies.write().await;
        if policies.get(&id).is_some_and(|p| owned(p, policy_type, owner)) {
            policies.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {}
}
