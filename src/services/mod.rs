// ============================================================================
// SERVICES MODULE - Comunicación con los backends
// ============================================================================

pub mod accounts_service;
pub mod auth_service;
pub mod claims_service;
pub mod http;
pub mod templates_service;
