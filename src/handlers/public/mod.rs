// handlers/public/mod.rs - endpoints that need no token
pub mod auth;
pub mod system;
