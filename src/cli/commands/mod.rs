pub mod auth;
pub mod health;
pub mod policies;
pub mod sales_managers;
