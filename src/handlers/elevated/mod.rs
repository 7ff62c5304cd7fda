// handlers/elevated/mod.rs - admin-only endpoints (require_admin route layer)
pub mod sales_managers;
