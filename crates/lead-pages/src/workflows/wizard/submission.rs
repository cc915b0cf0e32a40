use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{CreatorRole, FieldValue, PageType, PartnerRef, PartyProfile, ResourceRef};

/// Flattened draft sent to the publishing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub page_type: PageType,
    pub creator_role: CreatorRole,
    pub creator: PartyProfile,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub partner: Option<PartnerRef>,
    #[serde(default)]
    pub resource: Option<ResourceRef>,
}

/// Identifier and public address of a freshly created page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedLink {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Rejected(String),
    #[error("submission transport failed: {0}")]
    Transport(String),
}

/// Boundary the wizard hands its finished draft to.
pub trait PageSubmitter {
    fn submit(&self, payload: &SubmissionPayload) -> Result<PublishedLink, SubmissionError>;
}

/// Wire envelope: `{success, data: {id, url} | {message}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub data: SubmissionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionData {
    Published { id: String, url: String },
    Failed { message: String },
}

impl SubmissionResponse {
    pub fn published(link: PublishedLink) -> Self {
        Self {
            success: true,
            data: SubmissionData::Published {
                id: link.id,
                url: link.url,
            },
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: SubmissionData::Failed {
                message: message.into(),
            },
        }
    }

    pub fn into_result(self) -> Result<PublishedLink, SubmissionError> {
        match (self.success, self.data) {
            (true, SubmissionData::Published { id, url }) => Ok(PublishedLink { id, url }),
            (_, SubmissionData::Failed { message }) => Err(SubmissionError::Rejected(message)),
            (false, SubmissionData::Published { .. }) => Err(SubmissionError::Rejected(
                "submission was not accepted".to_string(),
            )),
        }
    }
}
