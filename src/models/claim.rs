use serde::{Deserialize, Serialize};

/// Estado de una claim. Valores de wire STATUS_*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "STATUS_QUEUED")]
    Queued,
    #[serde(rename = "STATUS_WAITING")]
    Waiting,
    #[serde(rename = "STATUS_CONSENT")]
    Consent,
    #[serde(rename = "STATUS_REFUSED")]
    Refused,
    #[serde(rename = "STATUS_TIMEOUT")]
    Timeout,
}

impl ClaimStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ClaimStatus::Queued => "STATUS_QUEUED",
            ClaimStatus::Waiting => "STATUS_WAITING",
            ClaimStatus::Consent => "STATUS_CONSENT",
            ClaimStatus::Refused => "STATUS_REFUSED",
            ClaimStatus::Timeout => "STATUS_TIMEOUT",
        }
    }

    /// Etiqueta visible. QUEUED y WAITING comparten la misma etiqueta:
    /// para el usuario ambas son "Ожидание".
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Queued | ClaimStatus::Waiting => "Ожидание",
            ClaimStatus::Consent => "Согласие",
            ClaimStatus::Refused => "Отказ",
            ClaimStatus::Timeout => "Таймаут",
        }
    }

    /// Clave de filtro: QUEUED se pliega en WAITING porque son una sola
    /// opción de filtro para el usuario. El acoplamiento queda garantizado
    /// por construcción: nunca se filtra por QUEUED a secas.
    pub fn filter_key(&self) -> ClaimStatus {
        match self {
            ClaimStatus::Queued => ClaimStatus::Waiting,
            other => *other,
        }
    }
}

/// Claim tal como la devuelve el servicio cppd. Los campos personales del
/// candidato sólo vienen poblados cuando status ∈ {CONSENT, REFUSED};
/// el cliente no asume su presencia en ningún otro caso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: u64,
    pub owner_id: u64,
    pub owner_email: String,
    pub candidate_email: String,
    pub candidate_last_name: Option<String>,
    pub candidate_first_name: Option<String>,
    pub candidate_middle_name: Option<String>,
    pub candidate_phone: Option<String>,
    #[serde(default)]
    pub candidate_birthdate: Option<String>,
    pub template_id: u64,
    pub status: ClaimStatus,
    pub responded_at: Option<String>,
    pub expires_at: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ClaimRecord {
    /// "Vista": el candidato ya respondió. No viene en el wire, se deriva
    /// de responded_at.
    pub fn is_viewed(&self) -> bool {
        self.responded_at.is_some()
    }

    pub fn candidate_full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.candidate_last_name.as_deref(),
            self.candidate_first_name.as_deref(),
            self.candidate_middle_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Fila de la tabla de заявки: proyección de ClaimRecord sobre lo que la
/// vista y el pipeline de filtrado necesitan.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRow {
    pub id: u64,
    pub date: String,
    pub email: String,
    pub status: ClaimStatus,
    pub is_viewed: bool,
}

impl From<&ClaimRecord> for ClaimRow {
    fn from(record: &ClaimRecord) -> Self {
        Self {
            id: record.id,
            date: record.created_at.clone(),
            email: record.candidate_email.clone(),
            status: record.status,
            is_viewed: record.is_viewed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_roundtrip() {
        let parsed: ClaimStatus = serde_json::from_str("\"STATUS_WAITING\"").unwrap();
        assert_eq!(parsed, ClaimStatus::Waiting);
        assert_eq!(serde_json::to_string(&ClaimStatus::Queued).unwrap(), "\"STATUS_QUEUED\"");
    }

    #[test]
    fn queued_folds_into_waiting_filter_key() {
        assert_eq!(ClaimStatus::Queued.filter_key(), ClaimStatus::Waiting);
        assert_eq!(ClaimStatus::Waiting.filter_key(), ClaimStatus::Waiting);
        assert_eq!(ClaimStatus::Refused.filter_key(), ClaimStatus::Refused);
    }

    #[test]
    fn claim_record_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": 5,
            "owner_id": 2,
            "owner_email": "m@corp.ru",
            "candidate_email": "c@mail.ru",
            "candidate_last_name": null,
            "candidate_first_name": null,
            "candidate_middle_name": null,
            "candidate_phone": null,
            "template_id": 1,
            "status": "STATUS_QUEUED",
            "responded_at": null,
            "expires_at": "2025-09-01T00:00:00Z",
            "created_at": "2025-08-01T10:00:00Z"
        }"#;
        let record: ClaimRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, ClaimStatus::Queued);
        assert!(!record.is_viewed());
        assert!(record.candidate_full_name().is_none());

        let row = ClaimRow::from(&record);
        assert_eq!(row.email, "c@mail.ru");
        assert_eq!(row.date, "2025-08-01T10:00:00Z");
        assert!(!row.is_viewed);
    }

    #[test]
    fn viewed_is_derived_from_responded_at() {
        // El wire no trae ningún flag de "vista": una заявка respondida
        // cuenta como vista, una pendiente no
        let json = r#"{
            "id": 6,
            "owner_id": 2,
            "owner_email": "m@corp.ru",
            "candidate_email": "c@mail.ru",
            "candidate_last_name": "Иванов",
            "candidate_first_name": "Иван",
            "candidate_middle_name": null,
            "candidate_phone": "+79990000000",
            "template_id": 1,
            "status": "STATUS_CONSENT",
            "responded_at": "2025-08-05T12:00:00Z",
            "expires_at": "2025-09-01T00:00:00Z",
            "created_at": "2025-08-01T10:00:00Z"
        }"#;
        let record: ClaimRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_viewed());
        assert!(ClaimRow::from(&record).is_viewed);

        let pending: ClaimRecord = serde_json::from_str(
            &json.replace("\"responded_at\": \"2025-08-05T12:00:00Z\"", "\"responded_at\": null")
                .replace("\"STATUS_CONSENT\"", "\"STATUS_WAITING\""),
        )
        .unwrap();
        assert!(!pending.is_viewed());
        assert!(!ClaimRow::from(&pending).is_viewed);
    }
}
