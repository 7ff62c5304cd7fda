// handlers/mod.rs - three security tiers
//
// public    (no auth)            /, /health, /auth/login
// protected (any valid session)  /auth/me, /auth/change-password, policy CRUD
// elevated  (admin session)      /users/sales-managers/*
//
// Role gates for protected routes are applied in `routes.rs`.
pub mod elevated;
pub mod protected;
pub mod public;
