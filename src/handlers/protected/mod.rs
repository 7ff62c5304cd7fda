// handlers/protected/mod.rs - endpoints behind jwt_auth_middleware
pub mod auth;
pub mod policy;
