// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod app_state;
pub mod claims_state;
pub mod query_state;
pub mod session_state;

pub use app_state::*;
pub use claims_state::*;
pub use query_state::*;
pub use session_state::*;
