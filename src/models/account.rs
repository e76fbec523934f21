use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rol de una cuenta. En el wire llega como "ROLE_MANAGER"/"ROLE_ADMIN";
/// algunas respuestas antiguas omiten el prefijo, parse() acepta ambas formas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manager,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().trim_start_matches("ROLE_") {
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Manager => "ROLE_MANAGER",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Manager => "Менеджер",
            Role::Admin => "Администратор",
        }
    }
}

/// Estado de habilitación de una cuenta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountState {
    #[serde(rename = "STATE_ENABLED")]
    Enabled,
    #[serde(rename = "STATE_DISABLED")]
    Disabled,
}

impl AccountState {
    pub fn as_wire(&self) -> &'static str {
        match self {
            AccountState::Enabled => "STATE_ENABLED",
            AccountState::Disabled => "STATE_DISABLED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountState::Enabled => "Активен",
            AccountState::Disabled => "Отключён",
        }
    }

    pub fn toggled(&self) -> AccountState {
        match self {
            AccountState::Enabled => AccountState::Disabled,
            AccountState::Disabled => AccountState::Enabled,
        }
    }
}

/// Cuenta tal como la devuelve el servicio de cuentas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub role: String,
    pub state: AccountState,
    #[serde(default)]
    pub created_date: Option<String>,
}

/// Identidad persistida en localStorage para evitar el fetch de identidad
/// en cada recarga. Un 401 posterior la invalida inmediatamente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedIdentity {
    pub id: u64,
    pub email: String,
    pub role: Role,
    pub cached_at: DateTime<Utc>,
}

impl CachedIdentity {
    pub fn new(id: u64, email: String, role: Role) -> Self {
        Self {
            id,
            email,
            role,
            cached_at: Utc::now(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.id > 0 && !self.email.is_empty()
    }

    /// El caché se confía sólo dentro de la ventana configurada
    pub fn is_fresh(&self, now: DateTime<Utc>, trust_minutes: i64) -> bool {
        let age = now.signed_duration_since(self.cached_at);
        age.num_minutes() < trust_minutes && age.num_seconds() >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn role_parse_accepts_both_wire_forms() {
        assert_eq!(Role::parse("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("ROLE_MANAGER"), Some(Role::Manager));
        assert_eq!(Role::parse("MANAGER"), Some(Role::Manager));
        assert_eq!(Role::parse("ROLE_SUPERUSER"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn cached_identity_expires_after_trust_window() {
        let mut identity = CachedIdentity::new(1, "a@b.com".to_string(), Role::Admin);
        let now = identity.cached_at + Duration::minutes(10);
        assert!(identity.is_fresh(now, 30));

        identity.cached_at = now - Duration::minutes(31);
        assert!(!identity.is_fresh(now, 30));

        // Timestamp del futuro: tampoco se confía
        identity.cached_at = now + Duration::minutes(5);
        assert!(!identity.is_fresh(now, 30));
    }

    #[test]
    fn cached_identity_well_formed_requires_id_and_email() {
        let identity = CachedIdentity::new(7, "a@b.com".to_string(), Role::Manager);
        assert!(identity.is_well_formed());

        let no_id = CachedIdentity::new(0, "a@b.com".to_string(), Role::Manager);
        assert!(!no_id.is_well_formed());

        let no_email = CachedIdentity::new(7, String::new(), Role::Manager);
        assert!(!no_email.is_well_formed());
    }
}
