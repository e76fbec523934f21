// ============================================================================
// VIEWS MODULE - Render de páginas (DOM puro, sin framework)
// ============================================================================

pub mod app;
pub mod consent;
pub mod create_user;
pub mod login;
pub mod navbar;
pub mod request_info;
pub mod requests;
pub mod templates;
pub mod users;

pub use app::render_app;
pub use consent::{render_consent, render_consent_error, render_consent_success, render_registration};
pub use create_user::render_create_user;
pub use login::render_login;
pub use navbar::render_navbar;
pub use request_info::render_request_info;
pub use requests::render_requests;
pub use templates::render_templates;
pub use users::render_users;
