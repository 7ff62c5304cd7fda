pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Role;
use crate::filter::PolicyQuery;
use crate::policy::PolicyType;
use models::{PolicyRecord, User};

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    /// Uniqueness violation, e.g. a taken userId
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence seam shared by the Postgres and in-memory backends.
///
/// Every policy read or write takes the owner so that no call site can
/// reach another sales manager's records.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and `/health`
    fn backend(&self) -> &'static str;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the userId is taken
    async fn insert_user(&self, user: User) -> Result<User, DatabaseError>;

    /// Returns false when no such user exists
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError>;

    /// Newest first
    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError>;

    async fn count_users_by_role(&self, role: Role) -> Result<u64, DatabaseError>;

    /// Owner-scoped listing in designated-date order
    async fn find_policies(&self, query: &PolicyQuery) -> Result<Vec<PolicyRecord>, DatabaseError>;

    async fn find_policy(
        &self,
        policy_type: PolicyType,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<PolicyRecord>, DatabaseError>;

    async fn insert_policy(&self, record: PolicyRecord) -> Result<PolicyRecord, DatabaseError>;

    /// Overwrite fields of an existing record held by `record.created_by`
    async fn replace_policy(&self, record: &PolicyRecord) -> Result<bool, DatabaseError>;

    async fn delete_policy(&self, policy_type: PolicyType, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}
