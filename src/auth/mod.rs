pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub use password::{PasswordError, PasswordHasher};

/// Sessions are valid for a fixed window; there is no refresh.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Closed set of roles an identity can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "salesManager")]
    SalesManager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SalesManager => "salesManager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "salesManager" => Ok(Role::SalesManager),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Internal identity id, resolved against the store on every request
    pub sub: Uuid,
    pub user_id: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, user_id: String, role: Role) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(SESSION_TTL_HOURS)).timestamp();

        Self {
            sub,
            user_id,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Session expired")]
    Expired,
    #[error("Invalid JWT token: {0}")]
    Invalid(String),
}

/// Signs and verifies session tokens with the configured HMAC secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

/// Identity resolved for the current request, inserted into request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    /// True when the caller holds one of `roles`
    pub fn require(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("salesManager".parse::<Role>().unwrap(), Role::SalesManager);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::SalesManager).unwrap(), "\"salesManager\"");
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new("unit-test-secret").unwrap();
        let id = Uuid::new_v4();
        let token = issuer.issue(&Claims::new(id, "SM0001".into(), Role::SalesManager)).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::SalesManager);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_HOURS * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("unit-test-secret").unwrap();
        let mut claims = Claims::new(Uuid::new_v4(), "SM0001".into(), Role::SalesManager);
        claims.iat -= 2 * SESSION_TTL_HOURS * 3600;
        claims.exp = Utc::now().timestamp() - 10;

        let token = issuer.issue(&claims).unwrap();
        assert!(matches!(issuer.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let ours = TokenIssuer::new("ours").unwrap();
        let theirs = TokenIssuer::new("theirs").unwrap();
        let token = theirs.issue(&Claims::new(Uuid::new_v4(), "admin".into(), Role::Admin)).unwrap();

        assert!(matches!(ours.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(TokenIssuer::new(""), Err(JwtError::InvalidSecret)));
    }
}
