use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{AuthUser, Claims, JwtError, PasswordError, PasswordHasher, Role, TokenIssuer, SESSION_TTL_HOURS};
use crate::config::SecurityConfig;
use crate::database::models::{User, UserSummary};
use crate::database::{DatabaseError, Store};

/// Prefix and width of generated sales-manager identifiers (`SM0007`)
pub const SALES_MANAGER_PREFIX: &str = "SM";
/// How many successive sequence numbers to try when an identifier is taken
pub const SALES_MANAGER_ID_ATTEMPTS: u64 = 5;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong identifier or wrong secret; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Sales Manager not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("Could not allocate a unique sales manager id after {0} attempts")]
    IdExhausted(u64),
    /// The configured admin id belongs to a non-admin identity
    #[error("Admin id '{0}' is held by a non-admin identity")]
    AdminIdTaken(String),
    #[error("Token error: {0}")]
    Token(#[from] JwtError),
    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Background task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Identity operations: login, token resolution and sales-manager administration
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: TokenIssuer,
    hasher: PasswordHasher,
    admin_id: String,
    admin_password: String,
    /// Verified against for unknown ids so both login failures cost one argon2 pass
    dummy_hash: String,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, security: &SecurityConfig) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(&security.argon2)?;
        let dummy_hash = hasher.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            store,
            tokens: TokenIssuer::new(&security.jwt_secret)?,
            hasher,
            admin_id: security.admin_id.clone(),
            admin_password: security.admin_password.clone(),
            dummy_hash,
        })
    }

    /// Issue a session for valid credentials. The configured admin is
    /// provisioned on its first successful login.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<Session, AuthError> {
        if user_id.is_empty() || password.is_empty() {
            return Err(AuthError::BadRequest("Please provide userId and password".to_string()));
        }

        let user = if user_id == self.admin_id {
            if password != self.admin_password {
                warn!("Failed admin login attempt");
                return Err(AuthError::InvalidCredentials);
            }
            self.ensure_admin().await?
        } else {
            let found = self
                .store
                .find_user_by_user_id(user_id)
                .await?
                .filter(|u| u.role == Role::SalesManager);

            let hash = found.as_ref().map_or(self.dummy_hash.as_str(), |u| u.password_hash.as_str());
            let verified = self.verify(password, hash).await?;

            match found {
                Some(user) if verified => user,
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        info!(user_id = %user.user_id, role = %user.role, "Login succeeded");
        self.issue(&user)
    }

    /// Resolve a bearer token to the identity currently in the store
    pub async fn authorize(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.tokens.verify(token).map_err(|e| match e {
            JwtError::Expired => AuthError::Unauthenticated("Not authorized, token expired".to_string()),
            _ => AuthError::Unauthenticated("Not authorized, token failed".to_string()),
        })?;

        let user = self
            .store
            .find_user(claims.sub)
            .await?
            .ok_or_else(|| AuthError::Unauthenticated("Not authorized, user not found".to_string()))?;

        if user.role != claims.role {
            return Err(AuthError::Unauthenticated("Not authorized, token failed".to_string()));
        }

        Ok(AuthUser {
            id: user.id,
            user_id: user.user_id,
            role: user.role,
        })
    }

    pub async fn change_own_password(
        &self,
        caller: &AuthUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if caller.role != Role::SalesManager {
            return Err(AuthError::Forbidden("Admin password is managed by configuration".to_string()));
        }
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AuthError::BadRequest("Please provide currentPassword and newPassword".to_string()));
        }

        let user = self
            .store
            .find_user(caller.id)
            .await?
            .ok_or_else(|| AuthError::Unauthenticated("Not authorized, user not found".to_string()))?;

        if !self.verify(current_password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let hash = self.hash(new_password).await?;
        self.store.update_password_hash(user.id, &hash).await?;
        info!(user_id = %user.user_id, "Password changed");
        Ok(())
    }

    /// Create a sales manager with the next free `SM####` identifier
    pub async fn create_sales_manager(&self, admin: &AuthUser, password: &str) -> Result<UserSummary, AuthError> {
        if password.is_empty() {
            return Err(AuthError::BadRequest("Please provide a password".to_string()));
        }

        let hash = self.hash(password).await?;
        let base = self.store.count_users_by_role(Role::SalesManager).await?;

        for attempt in 0..SALES_MANAGER_ID_ATTEMPTS {
            let user_id = sales_manager_id(base + 1 + attempt);
            let user = User::new(user_id, hash.clone(), Role::SalesManager, Some(admin.id));

            match self.store.insert_user(user).await {
                Ok(created) => {
                    info!(user_id = %created.user_id, created_by = %admin.user_id, "Sales manager created");
                    return Ok(created.summary());
                }
                Err(DatabaseError::Conflict(msg)) => {
                    warn!("{}; trying next sequence number", msg);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AuthError::IdExhausted(SALES_MANAGER_ID_ATTEMPTS))
    }

    /// Admin override of a sales manager's secret; no current-secret check
    pub async fn reset_sales_manager_password(&self, target: &str, new_password: &str) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::BadRequest("Please provide newPassword".to_string()));
        }

        let id = Uuid::parse_str(target).map_err(|_| AuthError::NotFound)?;
        let user = self
            .store
            .find_user(id)
            .await?
            .filter(|u| u.role == Role::SalesManager)
            .ok_or(AuthError::NotFound)?;

        let hash = self.hash(new_password).await?;
        if !self.store.update_password_hash(user.id, &hash).await? {
            return Err(AuthError::NotFound);
        }
        info!(user_id = %user.user_id, "Sales manager password reset");
        Ok(())
    }

    pub async fn list_sales_managers(&self) -> Result<Vec<UserSummary>, AuthError> {
        let users = self.store.list_users_by_role(Role::SalesManager).await?;
        Ok(users.iter().map(User::summary).collect())
    }

    /// Find or create the configured admin identity
    async fn ensure_admin(&self) -> Result<User, AuthError> {
        if let Some(user) = self.store.find_user_by_user_id(&self.admin_id).await? {
            if user.role != Role::Admin {
                error!(user_id = %user.user_id, role = %user.role, "Configured admin id belongs to another identity");
                return Err(AuthError::AdminIdTaken(user.user_id));
            }
            return Ok(user);
        }

        let hash = self.hash(&self.admin_password).await?;
        let admin = User::new(self.admin_id.clone(), hash, Role::Admin, None);
        match self.store.insert_user(admin).await {
            Ok(user) => {
                info!(user_id = %user.user_id, "Provisioned admin identity");
                Ok(user)
            }
            // a concurrent login won the race
            Err(DatabaseError::Conflict(_)) => match self.store.find_user_by_user_id(&self.admin_id).await? {
                Some(user) if user.role == Role::Admin => Ok(user),
                Some(user) => Err(AuthError::AdminIdTaken(user.user_id)),
                None => Err(AuthError::InvalidCredentials),
            },
            Err(e) => Err(e.into()),
        }
    }

    fn issue(&self, user: &User) -> Result<Session, AuthError> {
        let claims = Claims::new(user.id, user.user_id.clone(), user.role);
        let token = self.tokens.issue(&claims)?;
        Ok(Session {
            token,
            expires_in: SESSION_TTL_HOURS * 3600,
            user: AuthUser {
                id: user.id,
                user_id: user.user_id.clone(),
                role: user.role,
            },
        })
    }

    // argon2 is CPU-bound; keep it off the async workers
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let (password, hash) = (password.to_string(), hash.to_string());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))
    }
}

pub fn sales_manager_id(sequence: u64) -> String {
    format!("{}{:04}", SALES_MANAGER_PREFIX, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Argon2Config};
    use crate::database::MemoryStore;

    fn service() -> AccountService {
        let mut config = AppConfig::development();
        config.security.argon2 = Argon2Config { memory_kib: 64, iterations: 1, parallelism: 1 };
        AccountService::new(Arc::new(MemoryStore::new()), &config.security).unwrap()
    }

    #[test]
    fn formats_sales_manager_ids() {
        assert_eq!(sales_manager_id(7), "SM0007");
        assert_eq!(sales_manager_id(12345), "SM12345");
    }

    #[tokio::test]
    async fn admin_is_provisioned_once() {
        let svc = service();
        let first = svc.login("admin", "admin123").await.unwrap();
        let second = svc.login("admin", "admin123").await.unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_eq!(first.user.role, Role::Admin);
        assert_eq!(svc.store.count_users_by_role(Role::Admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failures_are_indistinguishable() {
        let svc = service();
        let admin = svc.login("admin", "admin123").await.unwrap().user;
        let sm = svc.create_sales_manager(&admin, "secret1").await.unwrap();

        let wrong_secret = svc.login(&sm.user_id, "nope").await.unwrap_err();
        let unknown_id = svc.login("SM9999", "secret1").await.unwrap_err();
        assert_eq!(wrong_secret.to_string(), unknown_id.to_string());
        assert!(matches!(wrong_secret, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_ids_verify_against_a_real_hash() {
        let svc = service();
        assert!(svc.dummy_hash.starts_with("$argon2id$v=19$m=64,t=1,p=1$"));

        let err = svc.login("SM0404", "anything").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn admin_id_held_by_a_sales_manager_is_refused() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_user(User::new("SM0003".into(), "x".into(), Role::SalesManager, None))
            .await
            .unwrap();

        let mut config = AppConfig::development();
        config.security.argon2 = Argon2Config { memory_kib: 64, iterations: 1, parallelism: 1 };
        config.security.admin_id = "SM0003".into();
        let svc = AccountService::new(store, &config.security).unwrap();

        let err = svc.login("SM0003", &config.security.admin_password).await.unwrap_err();
        assert!(matches!(err, AuthError::AdminIdTaken(_)));
        assert_eq!(svc.store.count_users_by_role(Role::Admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn skips_taken_identifiers() {
        let svc = service();
        let admin = svc.login("admin", "admin123").await.unwrap().user;

        // a manager whose id is ahead of the running count
        svc.store
            .insert_user(User::new("SM0002".into(), "x".into(), Role::SalesManager, Some(admin.id)))
            .await
            .unwrap();

        let created = svc.create_sales_manager(&admin, "pw").await.unwrap();
        assert_eq!(created.user_id, "SM0003");

        let next = svc.create_sales_manager(&admin, "pw").await.unwrap();
        assert_ne!(next.user_id, created.user_id);
    }

    #[tokio::test]
    async fn token_resolves_current_identity() {
        let svc = service();
        let admin = svc.login("admin", "admin123").await.unwrap().user;
        let sm = svc.create_sales_manager(&admin, "first").await.unwrap();

        let session = svc.login(&sm.user_id, "first").await.unwrap();
        let caller = svc.authorize(&session.token).await.unwrap();
        assert_eq!(caller.id, sm.id);
        assert_eq!(caller.role, Role::SalesManager);

        svc.reset_sales_manager_password(&sm.id.to_string(), "second").await.unwrap();
        assert!(svc.login(&sm.user_id, "first").await.is_err());
        assert!(svc.login(&sm.user_id, "second").await.is_ok());
    }

    #[tokio::test]
    async fn reset_rejects_non_sales_managers() {
        let svc = service();
        let admin = svc.login("admin", "admin123").await.unwrap().user;

        let err = svc.reset_sales_manager_password(&admin.id.to_string(), "x").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));

        let err = svc.reset_sales_manager_password("not-a-uuid", "x").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }
}
