// ============================================================================
// MODELS - Estructuras compartidas con los servicios backend
// ============================================================================

pub mod account;
pub mod claim;
pub mod template;

pub use account::*;
pub use claim::*;
pub use template::*;
