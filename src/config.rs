use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base del servicio de autenticación/cuentas
    pub auth_api_base: String,
    /// Base del servicio de claims/consentimientos (cppd)
    pub cppd_api_base: String,
    pub environment: String,
    pub enable_logging: bool,
    /// Cuánto tiempo se confía en la identidad cacheada sin revalidar contra
    /// /accounts/me. Valor explícito: el caché nunca vale "para siempre".
    pub identity_cache_trust_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_api_base: "/api/auth-service/v1".to_string(),
            cppd_api_base: "/api/cppd-service/v1".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            identity_cache_trust_minutes: 30,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            auth_api_base: option_env!("AUTH_API_BASE")
                .unwrap_or("/api/auth-service/v1").to_string(),
            cppd_api_base: option_env!("CPPD_API_BASE")
                .unwrap_or("/api/cppd-service/v1").to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            identity_cache_trust_minutes: option_env!("IDENTITY_CACHE_TRUST_MINUTES")
                .unwrap_or("30").parse().unwrap_or(30),
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
