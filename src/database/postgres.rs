use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::models::{PolicyRecord, User};
use super::query_builder::QueryBuilder;
use super::{DatabaseError, Store};
use crate::auth::Role;
use crate::config::DatabaseConfig;
use crate::filter::{PolicyQuery, POLICY_COLUMNS};
use crate::policy::{Document, PolicyType};

const USER_COLUMNS: &str = "id, user_id, password_hash, role, created_by, created_at, updated_at";

const MIGRATIONS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_by UUID NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS policies (
        id UUID PRIMARY KEY,
        policy_type TEXT NOT NULL,
        created_by UUID NOT NULL REFERENCES users(id),
        holder_name TEXT NOT NULL,
        designated_date DATE NOT NULL,
        document JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE INDEX IF NOT EXISTS policies_owner_date_idx
        ON policies (policy_type, created_by, designated_date)"#,
];

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    user_id: String,
    password_hash: String,
    role: String,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            user_id: row.user_id,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(DatabaseError::QueryError)?,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PolicyRow {
    id: Uuid,
    policy_type: String,
    created_by: Uuid,
    document: Json<Document>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PolicyRow> for PolicyRecord {
    type Error = DatabaseError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        Ok(PolicyRecord {
            id: row.id,
            policy_type: row.policy_type.parse().map_err(DatabaseError::QueryError)?,
            created_by: row.created_by,
            fields: row.document.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create tables and indexes if missing
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    async fn fetch_users(&self, sql: &str, role: Role) -> Result<Vec<User>, DatabaseError> {
        let rows = sqlx::query_as::<_, UserRow>(sql)
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(User::try_from).collect()
    }
}

fn conflict_or(err: sqlx::Error, message: impl FnOnce() -> String) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => DatabaseError::Conflict(message()),
        _ => DatabaseError::Sqlx(err),
    }
}

fn index_columns(record: &PolicyRecord) -> Result<(String, NaiveDate), DatabaseError> {
    let date = record.designated_date().ok_or_else(|| {
        DatabaseError::QueryError(format!(
            "{} record is missing {}",
            record.policy_type,
            record.policy_type.schema().date_field
        ))
    })?;
    Ok((record.holder_name().to_string(), date))
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: User) -> Result<User, DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, user_id, password_hash, role, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.user_id)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_by)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or(e, || format!("userId '{}' already exists", user.user_id)))?;
        Ok(user)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = $1 ORDER BY created_at DESC, user_id DESC",
            USER_COLUMNS
        );
        self.fetch_users(&sql, role).await
    }

    async fn count_users_by_role(&self, role: Role) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn find_policies(&self, query: &PolicyQuery) -> Result<Vec<PolicyRecord>, DatabaseError> {
        let sql = query.to_sql();
        let rows: Vec<PolicyRow> = QueryBuilder::new(&sql).select_all(&self.pool).await?;
        rows.into_iter().map(PolicyRecord::try_from).collect()
    }

    async fn find_policy(
        &self,
        policy_type: PolicyType,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<PolicyRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM policies WHERE id = $1 AND created_by = $2 AND policy_type = $3",
            POLICY_COLUMNS
        );
        let row = sqlx::query_as::<_, PolicyRow>(&sql)
            .bind(id)
            .bind(owner)
            .bind(policy_type.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(PolicyRecord::try_from).transpose()
    }

    async fn insert_policy(&self, record: PolicyRecord) -> Result<PolicyRecord, DatabaseError> {
        let (holder_name, designated_date) = index_columns(&record)?;
        sqlx::query(
            "INSERT INTO policies \
             (id, policy_type, created_by, holder_name, designated_date, document, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.id)
        .bind(record.policy_type.as_str())
        .bind(record.created_by)
        .bind(holder_name)
        .bind(designated_date)
        .bind(Json(&record.fields))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn replace_policy(&self, record: &PolicyRecord) -> Result<bool, DatabaseError> {
        let (holder_name, designated_date) = index_columns(record)?;
        let result = sqlx::query(
            "UPDATE policies SET holder_name = $1, designated_date = $2, document = $3, updated_at = $4 \
             WHERE id = $5 AND created_by = $6 AND policy_type = $7",
        )
        .bind(holder_name)
        .bind(designated_date)
        .bind(Json(&record.fields))
        .bind(record.updated_at)
        .bind(record.id)
        .bind(record.created_by)
        .bind(record.policy_type.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_policy(&self, policy_type: PolicyType, id: Uuid, owner: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM policies WHERE id = $1 AND created_by = $2 AND policy_type = $3")
            .bind(id)
            .bind(owner)
            .bind(policy_type.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
