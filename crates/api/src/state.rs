//! Shared application state for the Axum API server.

use std::sync::Arc;

use pharma_admin::service::AdminService;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub admin: Arc<AdminService>,
}

impl AppState {
    pub fn new(admin: AdminService) -> Self {
        Self {
            admin: Arc::new(admin),
        }
    }
}
