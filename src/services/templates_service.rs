// ============================================================================
// TEMPLATES SERVICE - Plantillas de solicitud de consentimiento (cppd-service)
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::TemplateRecord;
use crate::services::http::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesCollectionResponse {
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
    pub templates: Vec<TemplateRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResponse {
    pub ok: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationError>>,
    #[serde(default)]
    pub template: Option<TemplateRecord>,
}

#[derive(Debug, Serialize)]
pub struct TemplatePayload {
    pub name: String,
    pub subject: String,
    pub content: String,
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::*;
    use crate::services::http::{self, ApiBase, ApiResult};

    /// Plantillas del manager actual
    pub async fn fetch_templates_page(page: u32, size: u32) -> ApiResult<TemplatesCollectionResponse> {
        let page_id = page.saturating_sub(1);
        http::get_with_query(
            ApiBase::Cppd,
            "/templates/my",
            &[("page", page_id.to_string()), ("size", size.to_string())],
        )
        .await
    }

    pub async fn create_template(
        name: &str,
        subject: &str,
        content: &str,
    ) -> ApiResult<TemplateResponse> {
        let body = TemplatePayload {
            name: name.to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
        };
        http::post(ApiBase::Cppd, "/templates", &body).await
    }

    pub async fn update_template(
        id: u64,
        name: &str,
        subject: &str,
        content: &str,
    ) -> ApiResult<TemplateResponse> {
        let body = TemplatePayload {
            name: name.to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
        };
        http::put(ApiBase::Cppd, &format!("/templates/{}", id), &body).await
    }

    pub async fn delete_template(id: u64) -> ApiResult<TemplateResponse> {
        http::delete(ApiBase::Cppd, &format!("/templates/{}", id)).await
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{create_template, delete_template, fetch_templates_page, update_template};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_collection_parses() {
        let raw = r#"{
            "ok": true,
            "page_id": 0,
            "page_size": 20,
            "total_elements": 1,
            "total_pages": 1,
            "templates": [{
                "id": 4,
                "owner_id": 2,
                "name": "Базовая",
                "subject": "Согласие на обработку ПД",
                "content": "Текст",
                "created_at": "2026-05-01T00:00:00Z"
            }]
        }"#;
        let parsed: TemplatesCollectionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.templates.len(), 1);
        assert_eq!(parsed.templates[0].name, "Базовая");
    }
}
