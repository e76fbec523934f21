// ============================================================================
// VIEWMODELS MODULE - Lógica de negocio entre servicios y vistas
// ============================================================================

pub mod auth_viewmodel;
pub mod claims_viewmodel;
