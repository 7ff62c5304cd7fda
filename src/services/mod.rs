pub mod account_service;
pub mod policy_service;

pub use account_service::{AccountService, AuthError, Session};
pub use policy_service::{PolicyError, PolicyService};
