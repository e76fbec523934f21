// ============================================================================
// AUTH VIEWMODEL - Bootstrap de sesión, login y logout
// ============================================================================
// El plan de bootstrap es una decisión pura (plan_bootstrap); la ejecución
// con red y navegación vive aparte en los wrappers wasm. El orden importa:
// primero la lista de rutas sin verificación, después el caché, al final
// el servidor.
// ============================================================================

use crate::models::{CachedIdentity, Role};
use crate::router::{Route, RouteRequirement};

pub const MSG_BAD_CREDENTIALS: &str = "Неправильный e-mail или пароль";

/// Qué hacer al arrancar la app en una ruta dada
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapPlan {
    /// Ruta del flujo de consentimiento: no se verifica nada, la sesión
    /// queda marcada como verificada y no autenticada
    SkipCheck,
    /// Identidad cacheada vigente: se adopta sin red. Si la ruta es sólo
    /// para visitantes, además se redirige a home.
    TrustCache {
        identity: CachedIdentity,
        redirect: Option<Route>,
    },
    /// Sin caché utilizable: preguntar al servidor quién soy
    FetchIdentity,
}

/// Decidir el plan de arranque para la ruta actual
pub fn plan_bootstrap(route: &Route, cached: Option<CachedIdentity>) -> BootstrapPlan {
    if route.skips_auth_check() {
        return BootstrapPlan::SkipCheck;
    }

    if let Some(identity) = cached {
        let redirect = if route.requirement() == Some(RouteRequirement::PublicOnly) {
            Some(Route::Requests)
        } else {
            None
        };
        return BootstrapPlan::TrustCache { identity, redirect };
    }

    BootstrapPlan::FetchIdentity
}

/// Traducir el detail del login fallido a mensaje de usuario
pub fn login_error_message(detail: Option<&str>) -> String {
    match detail {
        Some(detail) if detail.starts_with("BAD_CREDENTIALS") => MSG_BAD_CREDENTIALS.to_string(),
        Some(detail) if !detail.is_empty() => detail.to_string(),
        _ => MSG_BAD_CREDENTIALS.to_string(),
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::*;
    use crate::services::auth_service;
    use crate::services::http::ApiResult;
    use crate::router;
    use crate::state::AppState;

    /// Verificación de sesión al arrancar o al entrar a una ruta protegida.
    /// Reentrada segura: con la verificación hecha o en vuelo no hace nada.
    pub fn init_auth(state: &AppState) {
        if state.session.is_auth_checked() || !state.begin_auth_check() {
            return;
        }

        let state = state.clone();
        wasm_bindgen_futures::spawn_local(async move {
            run_bootstrap(&state).await;
            state.finish_auth_check();
            state.notify_subscribers();
        });
    }

    async fn run_bootstrap(state: &AppState) {
        let route = state.current_route();
        match plan_bootstrap(&route, auth_service::load_cached_identity()) {
            BootstrapPlan::SkipCheck => {
                log::info!("🔐 [AUTH] Ruta pública de consentimiento, sin verificación");
                state.session.set_auth_checked(true);
            }
            BootstrapPlan::TrustCache { identity, redirect } => {
                log::info!("✅ [AUTH] Identidad desde caché: {}", identity.email);
                state
                    .session
                    .apply_identity(identity.id, identity.email, identity.role);
                state.session.set_auth_checked(true);
                if let Some(target) = redirect {
                    let _ = router::replace(state, target);
                }
            }
            BootstrapPlan::FetchIdentity => {
                resolve_identity(state).await;
            }
        }
    }

    /// Preguntar al servidor quién soy y resolver la sesión según la ruta
    async fn resolve_identity(state: &AppState) {
        let route = state.current_route();
        let result = auth_service::fetch_me().await;

        let account = result
            .data
            .as_ref()
            .filter(|response| response.ok)
            .and_then(|response| response.account.clone());

        match account.and_then(|account| {
            Role::parse(&account.role).map(|role| (account.id, account.email, role))
        }) {
            Some((id, email, role)) => {
                log::info!("✅ [AUTH] Sesión confirmada: {}", email);
                auth_service::cache_identity(id, &email, role);
                state.session.apply_identity(id, email, role);
                state.session.set_auth_checked(true);
                if route.requirement() == Some(RouteRequirement::PublicOnly) {
                    let _ = router::replace(state, Route::Requests);
                }
            }
            None => {
                log::info!("🔐 [AUTH] Sin sesión activa ({})", result.status);
                auth_service::clear_cached_identity();
                state.session.logout(None);
                let needs_auth = matches!(
                    route.requirement(),
                    Some(RouteRequirement::Authenticated) | Some(RouteRequirement::AdminOnly)
                );
                if needs_auth {
                    let _ = router::replace(state, Route::Login);
                }
            }
        }
    }

    /// Login con credenciales. Devuelve el mensaje de error o None si entró.
    pub async fn login(state: &AppState, email: &str, password: &str) -> Option<String> {
        let result = auth_service::login(email, password).await;

        let accepted = result.ok && result.data.as_ref().map(|r| r.ok).unwrap_or(false);
        if !accepted {
            let detail = result.data.as_ref().and_then(|r| r.detail.clone());
            return Some(login_error_message(detail.as_deref()));
        }

        // El login no trae el id de cuenta: se completa con /accounts/me
        // antes de marcar la sesión, así el invariante de sesión nunca se
        // rompe a mitad de camino.
        let me = auth_service::fetch_me().await;
        let account = me
            .data
            .as_ref()
            .filter(|response| response.ok)
            .and_then(|response| response.account.clone());

        match account.and_then(|account| {
            Role::parse(&account.role).map(|role| (account.id, account.email, role))
        }) {
            Some((id, email, role)) => {
                auth_service::cache_identity(id, &email, role);
                state.session.apply_identity(id, email, role);
                state.session.set_auth_checked(true);
                let _ = router::navigate(state, Route::Requests);
                None
            }
            None => Some(me.detail_or(crate::services::http::MSG_CONNECTION)),
        }
    }

    /// Logout completo: servidor (best-effort) + sesión local + redirect
    pub fn logout(state: &AppState) {
        let state = state.clone();
        wasm_bindgen_futures::spawn_local(async move {
            auth_service::server_logout().await;
            state.session.logout(None);
            let _ = router::replace(&state, Route::Login);
            state.notify_subscribers();
        });
    }

    /// Reacción uniforme a un 401 fuera del login: limpiar sesión y volver
    /// al login. Devuelve true si la sesión quedó invalidada.
    pub fn handle_reauth<T>(state: &AppState, result: &ApiResult<T>) -> bool {
        if !result.requires_reauth {
            return false;
        }
        log::warn!("⚠️ [AUTH] Sesión vencida detectada en una llamada al API");
        state.session.logout(None);
        let _ = router::replace(state, Route::Login);
        state.notify_subscribers();
        true
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{handle_reauth, init_auth, login, logout};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cached() -> CachedIdentity {
        CachedIdentity {
            id: 7,
            email: "m@corp.ru".to_string(),
            role: Role::Manager,
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn consent_routes_skip_the_check_entirely() {
        for route in [Route::Consent, Route::Registration, Route::ConsentSuccess] {
            assert_eq!(plan_bootstrap(&route, Some(cached())), BootstrapPlan::SkipCheck);
            assert_eq!(plan_bootstrap(&route, None), BootstrapPlan::SkipCheck);
        }
    }

    #[test]
    fn fresh_cache_is_trusted_without_network() {
        let identity = cached();
        let plan = plan_bootstrap(&Route::Requests, Some(identity.clone()));
        assert_eq!(
            plan,
            BootstrapPlan::TrustCache {
                identity,
                redirect: None
            }
        );
    }

    #[test]
    fn cached_identity_on_login_redirects_home() {
        let identity = cached();
        let plan = plan_bootstrap(&Route::Login, Some(identity.clone()));
        assert_eq!(
            plan,
            BootstrapPlan::TrustCache {
                identity,
                redirect: Some(Route::Requests)
            }
        );
    }

    #[test]
    fn no_cache_means_asking_the_server() {
        assert_eq!(plan_bootstrap(&Route::Requests, None), BootstrapPlan::FetchIdentity);
        assert_eq!(plan_bootstrap(&Route::Login, None), BootstrapPlan::FetchIdentity);
        assert_eq!(plan_bootstrap(&Route::Users, None), BootstrapPlan::FetchIdentity);
    }

    #[test]
    fn login_errors_map_bad_credentials() {
        assert_eq!(login_error_message(Some("BAD_CREDENTIALS")), MSG_BAD_CREDENTIALS);
        assert_eq!(
            login_error_message(Some("BAD_CREDENTIALS: attempt 3")),
            MSG_BAD_CREDENTIALS
        );
        assert_eq!(login_error_message(Some("Аккаунт отключён")), "Аккаунт отключён");
        assert_eq!(login_error_message(None), MSG_BAD_CREDENTIALS);
    }
}
