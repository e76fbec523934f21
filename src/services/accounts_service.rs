// ============================================================================
// ACCOUNTS SERVICE - Cuentas de manager/admin (auth-service)
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::Account;
use crate::services::http::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsCollectionResponse {
    pub ok: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub page_id: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub ok: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationError>>,
    #[serde(default)]
    pub account: Option<Account>,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateAccountStateRequest {
    pub state: String,
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::*;
    use crate::services::http::{self, ApiBase, ApiResult};

    pub async fn fetch_accounts_page(page: u32, size: u32) -> ApiResult<AccountsCollectionResponse> {
        let page_id = page.saturating_sub(1);
        http::get_with_query(
            ApiBase::Auth,
            "/accounts",
            &[("page", page_id.to_string()), ("size", size.to_string())],
        )
        .await
    }

    pub async fn create_account(
        email: &str,
        password: &str,
        role: &str,
    ) -> ApiResult<AccountResponse> {
        let body = CreateAccountRequest {
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };
        http::post(ApiBase::Auth, "/accounts", &body).await
    }

    /// Habilitar/deshabilitar una cuenta
    pub async fn update_account_state(id: u64, state: &str) -> ApiResult<AccountResponse> {
        let body = UpdateAccountStateRequest {
            state: state.to_string(),
        };
        http::put(ApiBase::Auth, &format!("/accounts/{}/state", id), &body).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{create_account, fetch_accounts_page, update_account_state};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountState;

    #[test]
    fn accounts_collection_parses() {
        let raw = r#"{
            "ok": true,
            "page_id": 0,
            "page_size": 20,
            "total_elements": 1,
            "total_pages": 1,
            "accounts": [{
                "id": 3,
                "email": "admin@corp.ru",
                "role": "ROLE_ADMIN",
                "state": "STATE_ENABLED"
            }]
        }"#;
        let parsed: AccountsCollectionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.accounts.len(), 1);
        assert_eq!(parsed.accounts[0].state, AccountState::Enabled);
    }
}
