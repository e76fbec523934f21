// ============================================================================
// ROUTER - Rutas de la SPA + navegación por History API
// ============================================================================

pub mod guard;

pub use guard::{decide, RouteDecision, RouteRequirement};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use crate::state::AppState;

pub const HOME_PATH: &str = "/requests";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Requests,
    RequestInfo(u64),
    Users,
    CreateUser,
    Templates,
    Registration,
    Consent,
    ConsentSuccess,
    ConsentError,
    NotFound,
}

impl Route {
    /// Parsear un pathname. El query string no participa del routing.
    pub fn parse(path: &str) -> Route {
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };
        match path {
            "/" | "/login" => Route::Login,
            "/requests" => Route::Requests,
            "/users" => Route::Users,
            "/create-user" => Route::CreateUser,
            "/templates" => Route::Templates,
            "/registration" => Route::Registration,
            "/consent" => Route::Consent,
            "/consent-success" => Route::ConsentSuccess,
            "/consent-error" => Route::ConsentError,
            _ => {
                if let Some(rest) = path.strip_prefix("/request/") {
                    if let Ok(id) = rest.parse::<u64>() {
                        return Route::RequestInfo(id);
                    }
                }
                Route::NotFound
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Requests => "/requests".to_string(),
            Route::RequestInfo(id) => format!("/request/{}", id),
            Route::Users => "/users".to_string(),
            Route::CreateUser => "/create-user".to_string(),
            Route::Templates => "/templates".to_string(),
            Route::Registration => "/registration".to_string(),
            Route::Consent => "/consent".to_string(),
            Route::ConsentSuccess => "/consent-success".to_string(),
            Route::ConsentError => "/consent-error".to_string(),
            Route::NotFound => "/login".to_string(),
        }
    }

    /// Requisito de acceso. None = la ruta se sirve sin mirar la sesión
    /// (flujo de consentimiento del candidato, que jamás tiene cuenta).
    pub fn requirement(&self) -> Option<RouteRequirement> {
        match self {
            Route::Login => Some(RouteRequirement::PublicOnly),
            Route::Requests
            | Route::RequestInfo(_)
            | Route::CreateUser
            | Route::Templates => Some(RouteRequirement::Authenticated),
            Route::Users => Some(RouteRequirement::AdminOnly),
            Route::Registration
            | Route::Consent
            | Route::ConsentSuccess
            | Route::ConsentError
            | Route::NotFound => None,
        }
    }

    /// Rutas que arrancan sin verificación de sesión contra el servidor.
    /// El candidato abre el link de consentimiento desde su correo: pedirle
    /// /accounts/me sólo produce un 401 inútil.
    pub fn skips_auth_check(&self) -> bool {
        matches!(
            self,
            Route::Registration
                | Route::Consent
                | Route::ConsentSuccess
                | Route::ConsentError
        )
    }
}

/// Ruta actual según location.pathname
#[cfg(target_arch = "wasm32")]
pub fn current_route() -> Route {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    Route::parse(&path)
}

/// Navegar con push_state y re-render
#[cfg(target_arch = "wasm32")]
pub fn navigate(state: &AppState, route: Route) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let history = window.history()?;
    history.push_state_with_url(&JsValue::NULL, "", Some(&route.path()))?;
    state.set_route(route);
    state.notify_subscribers();
    Ok(())
}

/// Reemplazar la entrada actual del historial (redirects del guard: el
/// botón atrás no debe volver a la ruta prohibida)
#[cfg(target_arch = "wasm32")]
pub fn replace(state: &AppState, route: Route) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let history = window.history()?;
    history.replace_state_with_url(&JsValue::NULL, "", Some(&route.path()))?;
    state.set_route(route);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/"), Route::Login);
        assert_eq!(Route::parse("/requests"), Route::Requests);
        assert_eq!(Route::parse("/request/42"), Route::RequestInfo(42));
        assert_eq!(Route::parse("/users"), Route::Users);
        assert_eq!(Route::parse("/create-user"), Route::CreateUser);
        assert_eq!(Route::parse("/templates"), Route::Templates);
        assert_eq!(Route::parse("/consent"), Route::Consent);
        assert_eq!(Route::parse("/consent-success"), Route::ConsentSuccess);
        assert_eq!(Route::parse("/consent-error"), Route::ConsentError);
        assert_eq!(Route::parse("/registration"), Route::Registration);
    }

    #[test]
    fn unknown_paths_fall_to_not_found() {
        assert_eq!(Route::parse("/nope"), Route::NotFound);
        assert_eq!(Route::parse("/request/abc"), Route::NotFound);
        assert_eq!(Route::parse("/request"), Route::NotFound);
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(Route::parse("/requests/"), Route::Requests);
        assert_eq!(Route::parse("/request/7/"), Route::RequestInfo(7));
    }

    #[test]
    fn consent_flow_skips_auth_check_and_has_no_requirement() {
        for route in [
            Route::Registration,
            Route::Consent,
            Route::ConsentSuccess,
            Route::ConsentError,
        ] {
            assert!(route.skips_auth_check());
            assert_eq!(route.requirement(), None);
        }
        assert!(!Route::Requests.skips_auth_check());
        assert!(!Route::Login.skips_auth_check());
    }

    #[test]
    fn requirements_match_route_roles() {
        assert_eq!(Route::Login.requirement(), Some(RouteRequirement::PublicOnly));
        assert_eq!(
            Route::Requests.requirement(),
            Some(RouteRequirement::Authenticated)
        );
        assert_eq!(
            Route::RequestInfo(1).requirement(),
            Some(RouteRequirement::Authenticated)
        );
        assert_eq!(Route::Users.requirement(), Some(RouteRequirement::AdminOnly));
    }
}
