// ============================================================================
// ROUTE GUARD - Decisión pura de acceso por ruta
// ============================================================================
// Lógica sin DOM ni navegación: recibe el estado de sesión y el requisito
// de la ruta, devuelve qué hacer. Quien llama ejecuta el redirect.
// ============================================================================

use crate::models::Role;

/// Requisito de acceso de una ruta. Las rutas del flujo de consentimiento
/// no tienen requisito (None en Route::requirement) y ni siquiera pasan
/// por aquí.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Sólo visitantes sin sesión (login): con sesión se redirige a home
    PublicOnly,
    /// Cualquier usuario con sesión
    Authenticated,
    /// Sólo administradores
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// La verificación de sesión no terminó: mostrar pantalla de carga,
    /// nunca redirigir todavía
    Loading,
    Render,
    RedirectLogin,
    RedirectHome,
}

/// Decidir el destino de una navegación. Mientras auth_checked sea false
/// la única respuesta posible es Loading: decidir antes de tiempo produce
/// redirects falsos durante el bootstrap.
pub fn decide(
    auth_checked: bool,
    authenticated: bool,
    role: Option<Role>,
    requirement: RouteRequirement,
) -> RouteDecision {
    if !auth_checked {
        return RouteDecision::Loading;
    }

    match requirement {
        RouteRequirement::PublicOnly => {
            if authenticated {
                RouteDecision::RedirectHome
            } else {
                RouteDecision::Render
            }
        }
        RouteRequirement::Authenticated => {
            if authenticated {
                RouteDecision::Render
            } else {
                RouteDecision::RedirectLogin
            }
        }
        RouteRequirement::AdminOnly => {
            if !authenticated {
                RouteDecision::RedirectLogin
            } else if role != Some(Role::Admin) {
                RouteDecision::RedirectHome
            } else {
                RouteDecision::Render
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchecked_session_always_loads() {
        for requirement in [
            RouteRequirement::PublicOnly,
            RouteRequirement::Authenticated,
            RouteRequirement::AdminOnly,
        ] {
            assert_eq!(
                decide(false, false, None, requirement),
                RouteDecision::Loading
            );
            assert_eq!(
                decide(false, true, Some(Role::Admin), requirement),
                RouteDecision::Loading
            );
        }
    }

    #[test]
    fn public_only_redirects_authenticated_home() {
        assert_eq!(
            decide(true, true, Some(Role::Manager), RouteRequirement::PublicOnly),
            RouteDecision::RedirectHome
        );
        assert_eq!(
            decide(true, false, None, RouteRequirement::PublicOnly),
            RouteDecision::Render
        );
    }

    #[test]
    fn authenticated_routes_require_session() {
        assert_eq!(
            decide(true, false, None, RouteRequirement::Authenticated),
            RouteDecision::RedirectLogin
        );
        assert_eq!(
            decide(true, true, Some(Role::Manager), RouteRequirement::Authenticated),
            RouteDecision::Render
        );
    }

    #[test]
    fn admin_routes_reject_managers_to_home() {
        // Manager con sesión válida: fuera, pero a home, no a login
        assert_eq!(
            decide(true, true, Some(Role::Manager), RouteRequirement::AdminOnly),
            RouteDecision::RedirectHome
        );
        assert_eq!(
            decide(true, true, Some(Role::Admin), RouteRequirement::AdminOnly),
            RouteDecision::Render
        );
        assert_eq!(
            decide(true, false, None, RouteRequirement::AdminOnly),
            RouteDecision::RedirectLogin
        );
    }

    #[test]
    fn manager_deep_link_to_users_lands_home() {
        // Entrada directa a /users siendo manager: primero Loading,
        // después del bootstrap RedirectHome
        assert_eq!(
            decide(false, false, None, RouteRequirement::AdminOnly),
            RouteDecision::Loading
        );
        assert_eq!(
            decide(true, true, Some(Role::Manager), RouteRequirement::AdminOnly),
            RouteDecision::RedirectHome
        );
    }
}
