//! Case documents
//!
//! Only metadata lives here. File bytes are held by the object store and
//! referenced through `storage_path`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, DocumentId, ProfileId};
use crate::error::CaseError;

/// Document category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    MedicalCertificate,
    ClaimForm,
    RtwPlan,
    Correspondence,
    WageRecords,
    Other,
}

/// A document attached to a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub case_id: CaseId,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub category: DocumentCategory,
    /// Object store key for the uploaded bytes
    pub storage_path: String,
    pub uploaded_by: ProfileId,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Creates document metadata for an upload to `case_id`
    pub fn new(
        case_id: CaseId,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        category: DocumentCategory,
        uploaded_by: ProfileId,
    ) -> Result<Self, CaseError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(CaseError::validation("Document file name is required"));
        }
        let id = DocumentId::new_v7();
        let storage_path = format!("cases/{}/{}-{}", case_id.as_uuid(), id.as_uuid(), sanitize(&file_name));

        Ok(Self {
            id,
            case_id,
            file_name,
            content_type: content_type.into(),
            size_bytes,
            category,
            storage_path,
            uploaded_by,
            uploaded_at: Utc::now(),
        })
    }
}

fn sanitize(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path_is_scoped_to_case() {
        let case_id = CaseId::new();
        let doc = Document::new(
            case_id,
            "GP cert (March).pdf",
            "application/pdf",
            2048,
            DocumentCategory::MedicalCertificate,
            ProfileId::new(),
        )
        .unwrap();

        assert!(doc.storage_path.starts_with(&format!("cases/{}/", case_id.as_uuid())));
        assert!(doc.storage_path.ends_with("GP_cert__March_.pdf"));
    }

    #[test]
    fn test_blank_file_name_rejected() {
        let result = Document::new(CaseId::new(), "  ", "text/plain", 0, DocumentCategory::Other, ProfileId::new());
        assert!(result.is_err());
    }
}
