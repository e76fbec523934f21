// ============================================================================
// HTTP CLIENT - Fetch autenticado con cookies + clasificación de fallos
// ============================================================================
// Todas las llamadas van con credentials: include (sesión por cookie).
// El resultado nunca navega por su cuenta: un 401 se reporta como
// requires_reauth = true y el viewmodel decide qué hacer con la sesión.
// ============================================================================

use crate::config::CONFIG;

pub const MSG_SESSION_EXPIRED: &str = "Сессия истекла. Пожалуйста, войдите заново.";
pub const MSG_BAD_REQUEST: &str = "Некорректный запрос. Проверьте параметры.";
pub const MSG_NOT_FOUND: &str = "Ресурс не найден. Проверьте настройки сервера.";
pub const MSG_CONNECTION: &str = "Ошибка соединения с сервером";

pub const LOGIN_ENDPOINT: &str = "/auth/login";

/// Contra qué backend va la llamada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    Auth,
    Cppd,
}

impl ApiBase {
    pub fn url(&self, path: &str) -> String {
        match self {
            ApiBase::Auth => format!("{}{}", CONFIG.auth_api_base, path),
            ApiBase::Cppd => format!("{}{}", CONFIG.cppd_api_base, path),
        }
    }
}

/// Error de validación por campo tal como lo manda el backend
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub detail: String,
}

/// Resultado de una llamada al API. Éxito o fallo, siempre se devuelve:
/// el fallo viene clasificado con mensaje para el usuario y la señal
/// requires_reauth que el viewmodel traduce en logout + redirect.
#[derive(Debug, Clone)]
pub struct ApiResult<T> {
    pub ok: bool,
    pub status: u16,
    pub detail: Option<String>,
    pub data: Option<T>,
    pub requires_reauth: bool,
}

impl<T> ApiResult<T> {
    pub fn success(status: u16, data: T) -> Self {
        Self {
            ok: true,
            status,
            detail: None,
            data: Some(data),
            requires_reauth: false,
        }
    }

    pub fn failure(status: u16, detail: String, requires_reauth: bool) -> Self {
        Self {
            ok: false,
            status,
            detail: Some(detail),
            data: None,
            requires_reauth,
        }
    }

    /// Mensaje de error para mostrar, con fallback
    pub fn detail_or(&self, fallback: &str) -> String {
        self.detail
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Clasificar un fallo HTTP en (mensaje para el usuario, requires_reauth).
/// El 401 del propio endpoint de login son credenciales malas, no una
/// sesión vencida: no dispara re-login.
pub fn classify_failure(status: u16, server_detail: Option<&str>, path: &str) -> (String, bool) {
    match status {
        401 => (MSG_SESSION_EXPIRED.to_string(), path != LOGIN_ENDPOINT),
        400 => (
            server_detail
                .map(str::to_string)
                .unwrap_or_else(|| MSG_BAD_REQUEST.to_string()),
            false,
        ),
        404 => (
            server_detail
                .map(str::to_string)
                .unwrap_or_else(|| MSG_NOT_FOUND.to_string()),
            false,
        ),
        _ => (
            server_detail
                .map(str::to_string)
                .unwrap_or_else(|| MSG_CONNECTION.to_string()),
            false,
        ),
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::*;

    /// Campos comunes del sobre de error del backend
    #[derive(Debug, serde::Deserialize)]
    struct ErrorEnvelope {
        #[serde(default)]
        detail: Option<String>,
    }

    use gloo_net::http::{Request, RequestBuilder, Response};
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use web_sys::RequestCredentials;

    async fn send<T: DeserializeOwned>(
        builder: RequestBuilder,
        body: Option<String>,
        path: &str,
    ) -> ApiResult<T> {
        let builder = builder.credentials(RequestCredentials::Include);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(json),
            None => builder.build(),
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                log::error!("❌ [HTTP] Error armando request {}: {:?}", path, e);
                return ApiResult::failure(0, MSG_CONNECTION.to_string(), false);
            }
        };

        match request.send().await {
            Ok(response) => read_response(response, path).await,
            Err(e) => {
                log::error!("❌ [HTTP] Error de red en {}: {:?}", path, e);
                ApiResult::failure(0, MSG_CONNECTION.to_string(), false)
            }
        }
    }

    async fn read_response<T: DeserializeOwned>(response: Response, path: &str) -> ApiResult<T> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if response.ok() {
            match serde_json::from_str::<T>(&text) {
                Ok(data) => ApiResult::success(status, data),
                Err(e) => {
                    log::error!("❌ [HTTP] Respuesta ilegible de {}: {}", path, e);
                    ApiResult::failure(status, MSG_CONNECTION.to_string(), false)
                }
            }
        } else {
            let server_detail = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.detail);
            let (detail, requires_reauth) =
                classify_failure(status, server_detail.as_deref(), path);
            log::warn!("⚠️ [HTTP] {} {} → {}", status, path, detail);
            // El cuerpo de error puede traer el sobre tipado completo
            // (validation_errors, etc.): se intenta conservar
            let data = serde_json::from_str::<T>(&text).ok();
            ApiResult {
                ok: false,
                status,
                detail: Some(detail),
                data,
                requires_reauth,
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(base: ApiBase, path: &str) -> ApiResult<T> {
        send(Request::get(&base.url(path)), None, path).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        base: ApiBase,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let mut url = base.url(path);
        let mut sep = '?';
        for (key, value) in query {
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(&js_sys::encode_uri_component(value).as_string().unwrap_or_default());
            sep = '&';
        }
        send(Request::get(&url), None, path).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        base: ApiBase,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let json = match serde_json::to_string(body) {
            Ok(json) => json,
            Err(e) => {
                log::error!("❌ [HTTP] Error serializando body de {}: {}", path, e);
                return ApiResult::failure(0, MSG_CONNECTION.to_string(), false);
            }
        };
        send(Request::post(&base.url(path)), Some(json), path).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        base: ApiBase,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let json = match serde_json::to_string(body) {
            Ok(json) => json,
            Err(e) => {
                log::error!("❌ [HTTP] Error serializando body de {}: {}", path, e);
                return ApiResult::failure(0, MSG_CONNECTION.to_string(), false);
            }
        };
        send(Request::put(&base.url(path)), Some(json), path).await
    }

    pub async fn delete<T: DeserializeOwned>(base: ApiBase, path: &str) -> ApiResult<T> {
        send(Request::delete(&base.url(path)), None, path).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{delete, get, get_with_query, post, put};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_outside_login_requires_reauth() {
        let (detail, reauth) = classify_failure(401, None, "/claims/my");
        assert_eq!(detail, MSG_SESSION_EXPIRED);
        assert!(reauth);
    }

    #[test]
    fn unauthorized_on_login_is_just_bad_credentials() {
        let (detail, reauth) = classify_failure(401, Some("BAD_CREDENTIALS"), LOGIN_ENDPOINT);
        assert_eq!(detail, MSG_SESSION_EXPIRED);
        assert!(!reauth);
    }

    #[test]
    fn bad_request_prefers_server_detail() {
        let (detail, reauth) = classify_failure(400, Some("email уже занят"), "/accounts");
        assert_eq!(detail, "email уже занят");
        assert!(!reauth);

        let (detail, _) = classify_failure(400, None, "/accounts");
        assert_eq!(detail, MSG_BAD_REQUEST);
    }

    #[test]
    fn not_found_and_server_errors_have_fallbacks() {
        let (detail, reauth) = classify_failure(404, None, "/claims/9");
        assert_eq!(detail, MSG_NOT_FOUND);
        assert!(!reauth);

        let (detail, reauth) = classify_failure(500, None, "/claims");
        assert_eq!(detail, MSG_CONNECTION);
        assert!(!reauth);

        let (detail, _) = classify_failure(0, None, "/claims");
        assert_eq!(detail, MSG_CONNECTION);
    }

    #[test]
    fn detail_or_falls_back_when_empty() {
        let result: ApiResult<()> = ApiResult::failure(500, MSG_CONNECTION.to_string(), false);
        assert_eq!(result.detail_or("fallback"), MSG_CONNECTION);

        let result = ApiResult::<()> {
            ok: false,
            status: 500,
            detail: None,
            data: None,
            requires_reauth: false,
        };
        assert_eq!(result.detail_or("fallback"), "fallback");
    }
}
