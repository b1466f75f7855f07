//! Files attached to a complaint. Only the name and an external URL are
//! stored; the file itself lives elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    types::{AttachmentId, ComplaintId},
    validation::rules,
};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Attachment {
    pub id: AttachmentId,
    pub complaint_id: ComplaintId,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(complaint_id: ComplaintId, input: AttachmentInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id: AttachmentId::new(),
            complaint_id,
            name: input.name,
            url: input.url,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttachmentInput {
    #[serde(deserialize_with = "rules::trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(url, custom(function = "rules::validate_web_url"))]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
/// Payload for adding attachments to an existing complaint.
pub struct AddAttachmentsRequest {
    #[validate(length(min = 1), nested)]
    pub attachments: Vec<AttachmentInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    #[schema(value_type = String)]
    pub id: AttachmentId,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Attachment> for AttachmentResponse {
    fn from(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            name: attachment.name,
            url: attachment.url,
            created_at: attachment.created_at,
        }
    }
}
