// ============================================================================
// SESSION STATE - Única fuente de verdad de la sesión de autenticación
// ============================================================================
// Invariante: authenticated == true implica role y user_id presentes.
// Una sesión que viola el invariante se considera inconsistente y fuerza
// logout. Sólo el bootstrap de auth y el logout explícito mutan este estado.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::Role;
use crate::services::auth_service;

pub const LOGIN_PATH: &str = "/login";

/// Estado de sesión. Contenedor pasivo: los campos sólo se tocan a través
/// de los setters, nunca directamente desde las vistas.
#[derive(Clone)]
pub struct SessionState {
    authenticated: Rc<RefCell<bool>>,
    role: Rc<RefCell<Option<Role>>>,
    user_id: Rc<RefCell<Option<u64>>>,
    email: Rc<RefCell<Option<String>>>,
    auth_checked: Rc<RefCell<bool>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            authenticated: Rc::new(RefCell::new(false)),
            role: Rc::new(RefCell::new(None)),
            user_id: Rc::new(RefCell::new(None)),
            email: Rc::new(RefCell::new(None)),
            auth_checked: Rc::new(RefCell::new(false)),
        }
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        *self.authenticated.borrow_mut() = authenticated;
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn set_role(&self, role: Option<Role>) {
        *self.role.borrow_mut() = role;
    }

    pub fn role(&self) -> Option<Role> {
        *self.role.borrow()
    }

    pub fn set_user_data(&self, id: Option<u64>, email: Option<String>) {
        *self.user_id.borrow_mut() = id;
        *self.email.borrow_mut() = email;
    }

    pub fn user_id(&self) -> Option<u64> {
        *self.user_id.borrow()
    }

    pub fn email(&self) -> Option<String> {
        self.email.borrow().clone()
    }

    pub fn set_auth_checked(&self, checked: bool) {
        *self.auth_checked.borrow_mut() = checked;
    }

    pub fn is_auth_checked(&self) -> bool {
        *self.auth_checked.borrow()
    }

    /// Poblar la sesión completa de una vez (bootstrap / login exitoso)
    pub fn apply_identity(&self, id: u64, email: String, role: Role) {
        self.set_user_data(Some(id), Some(email));
        self.set_role(Some(role));
        self.set_authenticated(true);
    }

    /// authenticated == true ⇒ role y user_id presentes
    pub fn is_consistent(&self) -> bool {
        !self.is_authenticated() || (self.role().is_some() && self.user_id().is_some())
    }

    /// Si el invariante está roto, la sesión no sirve: logout forzado.
    /// Devuelve true si la sesión era consistente.
    pub fn enforce_invariant(&self, redirect: Option<&dyn Fn(&str)>) -> bool {
        if self.is_consistent() {
            return true;
        }
        log::warn!("⚠️ [SESSION] Sesión inconsistente (authenticated sin identidad), forzando logout");
        self.logout(redirect);
        false
    }

    /// Logout: limpia todos los campos de sesión y el caché de identidad
    /// persistido. Idempotente: con la sesión ya limpia es un no-op (más
    /// allá de garantizar el estado limpio). El callback de redirect, si
    /// viene, se invoca con la ruta de login.
    pub fn logout(&self, redirect: Option<&dyn Fn(&str)>) {
        *self.authenticated.borrow_mut() = false;
        *self.role.borrow_mut() = None;
        *self.user_id.borrow_mut() = None;
        *self.email.borrow_mut() = None;
        // La verificación ya ocurrió: el visitante simplemente no está autenticado
        *self.auth_checked.borrow_mut() = true;

        auth_service::clear_cached_identity();

        if let Some(redirect) = redirect {
            redirect(LOGIN_PATH);
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn fresh_session_is_consistent_and_unchecked() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());
        assert!(!session.is_auth_checked());
        assert!(session.is_consistent());
    }

    #[test]
    fn authenticated_without_identity_is_inconsistent() {
        let session = SessionState::new();
        session.set_authenticated(true);
        assert!(!session.is_consistent());

        session.set_role(Some(Role::Manager));
        assert!(!session.is_consistent());

        session.set_user_data(Some(1), Some("a@b.com".to_string()));
        assert!(session.is_consistent());
    }

    #[test]
    fn enforce_invariant_forces_logout_on_violation() {
        let session = SessionState::new();
        session.set_authenticated(true);

        let redirected_to = RefCell::new(None::<String>);
        let redirect = |path: &str| {
            *redirected_to.borrow_mut() = Some(path.to_string());
        };

        assert!(!session.enforce_invariant(Some(&redirect)));
        assert!(!session.is_authenticated());
        assert!(session.is_auth_checked());
        assert_eq!(redirected_to.borrow().as_deref(), Some(LOGIN_PATH));
    }

    #[test]
    fn enforce_invariant_keeps_consistent_session() {
        let session = SessionState::new();
        session.apply_identity(3, "a@b.com".to_string(), Role::Admin);
        assert!(session.enforce_invariant(None));
        assert!(session.is_authenticated());
    }

    #[test]
    fn logout_clears_everything_and_redirects() {
        let session = SessionState::new();
        session.apply_identity(3, "a@b.com".to_string(), Role::Admin);
        session.set_auth_checked(true);

        let redirected_to = RefCell::new(None::<String>);
        let redirect = |path: &str| {
            *redirected_to.borrow_mut() = Some(path.to_string());
        };
        session.logout(Some(&redirect));

        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
        assert_eq!(session.user_id(), None);
        assert_eq!(session.email(), None);
        assert!(session.is_auth_checked());
        assert_eq!(redirected_to.borrow().as_deref(), Some(LOGIN_PATH));
    }

    #[test]
    fn logout_is_idempotent() {
        let session = SessionState::new();
        session.logout(None);
        session.logout(None);

        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
        assert!(session.is_consistent());
    }
}
