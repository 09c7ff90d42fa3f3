//! PharmaDNA role admin HTTP API.
//!
//! Endpoints:
//! - GET    /health     Liveness probe
//! - GET    /api/admin  List wallet roles
//! - POST   /api/admin  Assign a role (users table + PharmaNFT contract)
//! - DELETE /api/admin  Remove a role (users table only)

pub mod routes;
pub mod state;
