// ============================================================================
// CLAIMS SERVICE - Заявки del cppd-service
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::ClaimRecord;
use crate::services::http::ValidationError;

/// Orden que siempre se pide al servidor: lo más nuevo primero.
/// El orden visible se decide después, en memoria.
pub const SERVER_SORT: &str = "createdDate,desc";

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimsCollectionResponse {
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
    pub claims: Vec<ClaimRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimResponse {
    pub ok: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationError>>,
    #[serde(default)]
    pub claim: Option<ClaimRecord>,
}

#[derive(Debug, Serialize)]
pub struct IssueClaimsRequest {
    pub template_id: u64,
    pub candidate_emails: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClaimActRequest {
    pub claim_id: u64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::*;
    use crate::services::http::{self, ApiBase, ApiResult};

    /// Página de заявки. Admin ve todas (/claims), manager las suyas
    /// (/claims/my). page llega 1-based y se convierte al 0-based del
    /// servidor aquí, en el único punto de contacto.
    pub async fn fetch_claims_page(
        all_claims: bool,
        page: u32,
        size: u32,
    ) -> ApiResult<ClaimsCollectionResponse> {
        let path = if all_claims { "/claims" } else { "/claims/my" };
        let page_id = page.saturating_sub(1);
        http::get_with_query(
            ApiBase::Cppd,
            path,
            &[
                ("page", page_id.to_string()),
                ("size", size.to_string()),
                ("sort", SERVER_SORT.to_string()),
            ],
        )
        .await
    }

    /// Una заявка puntual, con los datos personales del candidato cuando
    /// el estado los habilita
    pub async fn fetch_claim(claim_id: u64) -> ApiResult<ClaimResponse> {
        http::get(ApiBase::Cppd, &format!("/claims/{}", claim_id)).await
    }

    /// Emitir заявки a una lista de candidatos con una plantilla
    pub async fn issue_claims(
        template_id: u64,
        candidate_emails: Vec<String>,
    ) -> ApiResult<ClaimResponse> {
        let body = IssueClaimsRequest {
            template_id,
            candidate_emails,
        };
        http::post(ApiBase::Cppd, "/claims/issue", &body).await
    }

    /// Actuar sobre una заявка (consentir/rechazar). El token viene del
    /// link de consentimiento del candidato; el manager no lo manda.
    pub async fn act_claim(
        claim_id: u64,
        status: &str,
        token: Option<String>,
    ) -> ApiResult<ClaimResponse> {
        let body = ClaimActRequest {
            claim_id,
            status: status.to_string(),
            token,
        };
        http::post(ApiBase::Cppd, "/claims/act", &body).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{act_claim, fetch_claim, fetch_claims_page, issue_claims};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClaimStatus;

    #[test]
    fn collection_response_parses_wire_shape() {
        let raw = r#"{
            "ok": true,
            "page_id": 0,
            "page_size": 20,
            "total_elements": 41,
            "total_pages": 3,
            "claims": [{
                "id": 1,
                "owner_id": 2,
                "owner_email": "m@corp.ru",
                "candidate_email": "c@x.ru",
                "template_id": 1,
                "status": "STATUS_WAITING",
                "responded_at": null,
                "expires_at": "2026-09-01T00:00:00Z",
                "created_at": "2026-08-01T10:00:00Z"
            }]
        }"#;
        let parsed: ClaimsCollectionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.total_pages, 3);
        assert_eq!(parsed.claims.len(), 1);
        assert_eq!(parsed.claims[0].status, ClaimStatus::Waiting);
    }

    #[test]
    fn claim_response_carries_candidate_fields_once_answered() {
        let raw = r#"{
            "ok": true,
            "claim": {
                "id": 9,
                "owner_id": 2,
                "owner_email": "m@corp.ru",
                "candidate_email": "c@x.ru",
                "candidate_last_name": "Иванов",
                "candidate_first_name": "Иван",
                "candidate_middle_name": "Иванович",
                "candidate_phone": "+79990000000",
                "candidate_birthdate": "1990-01-01",
                "template_id": 1,
                "status": "STATUS_CONSENT",
                "responded_at": "2026-08-10T09:00:00Z",
                "expires_at": "2026-09-01T00:00:00Z",
                "created_at": "2026-08-01T10:00:00Z"
            }
        }"#;
        let parsed: ClaimResponse = serde_json::from_str(raw).unwrap();
        let claim = parsed.claim.unwrap();
        assert_eq!(claim.status, ClaimStatus::Consent);
        assert!(claim.is_viewed());
        assert_eq!(
            claim.candidate_full_name().as_deref(),
            Some("Иванов Иван Иванович")
        );
        assert_eq!(claim.candidate_phone.as_deref(), Some("+79990000000"));
    }

    #[test]
    fn act_request_omits_token_when_absent() {
        let body = ClaimActRequest {
            claim_id: 5,
            status: "STATUS_REFUSED".to_string(),
            token: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("token"));

        let body = ClaimActRequest {
            claim_id: 5,
            status: "STATUS_CONSENT".to_string(),
            token: Some("abc".to_string()),
        };
        assert!(serde_json::to_string(&body).unwrap().contains("\"token\":\"abc\""));
    }
}
