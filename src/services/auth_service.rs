// ============================================================================
// AUTH SERVICE - Login/logout + identidad con caché local
// ============================================================================
// La sesión vive en una cookie HttpOnly: aquí sólo se pide quién soy y se
// cachea la identidad en localStorage para arrancar rápido. El caché es una
// optimización, nunca autoridad: vencido o malformado se descarta y se
// vuelve a preguntar al servidor.
// ============================================================================

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::models::{CachedIdentity, Role};
use crate::services::http::ValidationError;
use crate::utils::storage;

const IDENTITY_CACHE_KEY: &str = "consent_console_identity";

// ----------------------------------------------------------------------------
// DTOs del auth-service
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub ok: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationError>>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub id: u64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserMeResponse {
    pub ok: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub account: Option<AccountInfo>,
}

// ----------------------------------------------------------------------------
// Caché de identidad (localStorage)
// ----------------------------------------------------------------------------

/// Guardar la identidad confirmada por el servidor. Fallo de storage no es
/// fatal: el próximo arranque simplemente vuelve a preguntar.
pub fn cache_identity(id: u64, email: &str, role: Role) {
    let identity = CachedIdentity::new(id, email.to_string(), role);
    if storage::save_to_storage(IDENTITY_CACHE_KEY, &identity).is_err() {
        log::warn!("⚠️ [AUTH] No se pudo guardar el caché de identidad");
    } else {
        log::info!("💾 [AUTH] Identidad cacheada: {}", email);
    }
}

/// Identidad cacheada, sólo si está bien formada y dentro de la ventana de
/// confianza. Cualquier otra cosa se limpia y se devuelve None.
pub fn load_cached_identity() -> Option<CachedIdentity> {
    let identity: CachedIdentity = storage::load_from_storage(IDENTITY_CACHE_KEY)?;
    if !identity.is_well_formed() {
        log::warn!("⚠️ [AUTH] Caché de identidad malformado, descartando");
        clear_cached_identity();
        return None;
    }
    if !identity.is_fresh(Utc::now(), CONFIG.identity_cache_trust_minutes) {
        log::info!("🔐 [AUTH] Caché de identidad vencido, se re-verifica con el servidor");
        clear_cached_identity();
        return None;
    }
    Some(identity)
}

pub fn clear_cached_identity() {
    let _ = storage::remove_from_storage(IDENTITY_CACHE_KEY);
}

// ----------------------------------------------------------------------------
// Llamadas al backend
// ----------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::*;
    use crate::services::http::{self, ApiBase, ApiResult};

    /// POST /auth/login. El servidor setea la cookie de sesión; el cuerpo
    /// trae email y role pero no el id (ese sale de /accounts/me).
    pub async fn login(email: &str, password: &str) -> ApiResult<AuthResponse> {
        log::info!("🔐 [AUTH] Login de {}", email);
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        http::post(ApiBase::Auth, "/auth/login", &body).await
    }

    /// GET /accounts/me: la verdad sobre la sesión actual
    pub async fn fetch_me() -> ApiResult<UserMeResponse> {
        http::get(ApiBase::Auth, "/accounts/me").await
    }

    /// GET /auth/logout. Best-effort: la sesión local se limpia igual
    /// aunque el servidor no conteste.
    pub async fn server_logout() {
        let result: ApiResult<AuthResponse> = http::get(ApiBase::Auth, "/auth/logout").await;
        if result.ok {
            log::info!("✅ [AUTH] Sesión cerrada en el servidor");
        } else {
            log::warn!("⚠️ [AUTH] Logout del servidor falló, sesión local limpia igual");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{fetch_me, login, server_logout};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_tolerates_missing_fields() {
        let parsed: AuthResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.detail, None);
        assert!(parsed.validation_errors.is_none());
        assert_eq!(parsed.role, None);
    }

    #[test]
    fn user_me_response_parses_account() {
        let raw = r#"{"ok":true,"account":{"id":7,"email":"m@x.ru","role":"ROLE_MANAGER"}}"#;
        let parsed: UserMeResponse = serde_json::from_str(raw).unwrap();
        let account = parsed.account.unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(Role::parse(&account.role), Some(Role::Manager));
    }

    #[test]
    fn login_failure_envelope_parses_validation_errors() {
        let raw = r#"{"ok":false,"detail":"BAD_CREDENTIALS","validation_errors":[{"field":"email","detail":"обязательное поле"}]}"#;
        let parsed: AuthResponse = serde_json::from_str(raw).unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.detail.as_deref(), Some("BAD_CREDENTIALS"));
        assert_eq!(parsed.validation_errors.unwrap().len(), 1);
    }

    // En host el storage es un stub (load → None): el caché simplemente
    // se reporta vacío, que es el comportamiento seguro.
    #[test]
    fn cache_roundtrip_is_safe_without_storage() {
        cache_identity(1, "a@b.ru", Role::Admin);
        assert!(load_cached_identity().is_none());
        clear_cached_identity();
    }
}
