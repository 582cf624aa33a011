//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use presence_core::PresenceRecord;

use super::responses::PresenceRecordResponse;

impl From<&PresenceRecord> for PresenceRecordResponse {
    fn from(record: &PresenceRecord) -> Self {
        Self {
            session_id: record.session_id.to_string(),
            user_id: record.user_id.clone(),
            first_seen_at: record.first_seen_at,
            last_activity_at: record.last_activity_at,
            metadata: record.metadata.clone(),
        }
    }
}

impl From<PresenceRecord> for PresenceRecordResponse {
    fn from(record: PresenceRecord) -> Self {
        Self {
            session_id: record.session_id.into_inner(),
            user_id: record.user_id,
            first_seen_at: record.first_seen_at,
            last_activity_at: record.last_activity_at,
            metadata: record.metadata,
        }
    }
}
