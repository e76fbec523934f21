use serde::{Deserialize, Serialize};

/// Plantilla de correo de consentimiento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: u64,
    pub owner_id: u64,
    pub name: String,
    pub subject: String,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}
