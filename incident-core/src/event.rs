//! Audit timeline entries attached to an incident.

use serde::{Deserialize, Serialize};

/// Event discriminator as serialized by the backend. Kinds added server
/// side after this build lands decode as `Other` instead of failing the
/// whole timeline fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum EventKind {
    Creation,
    StatusChange,
    SeverityChange,
    OwnerChange,
    Comment,
    SlaBreach,
    AttachmentUpload,
    AttachmentDelete,
    Other,
}

impl From<String> for EventKind {
    fn from(code: String) -> Self {
        match code.as_str() {
            "CREATION" => EventKind::Creation,
            "STATUS_CHANGE" => EventKind::StatusChange,
            "SEVERITY_CHANGE" => EventKind::SeverityChange,
            "OWNER_CHANGE" => EventKind::OwnerChange,
            "COMMENT" => EventKind::Comment,
            "SLA_BREACH" => EventKind::SlaBreach,
            "ATTACHMENT_UPLOAD" => EventKind::AttachmentUpload,
            "ATTACHMENT_DELETE" => EventKind::AttachmentDelete,
            _ => EventKind::Other,
        }
    }
}

impl EventKind {
    /// Heading shown on a timeline row.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Creation => "Created",
            EventKind::StatusChange => "Status Update",
            EventKind::SeverityChange => "Severity Change",
            EventKind::OwnerChange => "Reassigned",
            EventKind::Comment => "Comment",
            EventKind::SlaBreach => "SLA Breach",
            EventKind::AttachmentUpload => "File Attached",
            EventKind::AttachmentDelete => "File Removed",
            EventKind::Other => "Event",
        }
    }

    /// Rows that render an old-value to new-value badge pair.
    pub fn shows_value_change(self) -> bool {
        matches!(
            self,
            EventKind::StatusChange | EventKind::SeverityChange | EventKind::OwnerChange
        )
    }

    pub fn is_breach(self) -> bool {
        matches!(self, EventKind::SlaBreach)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentEvent {
    pub id: String,
    pub event_type: EventKind,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Absent for events emitted by the scheduler rather than a person.
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_decode_from_wire_codes() {
        let kind: EventKind = serde_json::from_str("\"STATUS_CHANGE\"").unwrap();
        assert_eq!(kind, EventKind::StatusChange);
        let kind: EventKind = serde_json::from_str("\"SLA_BREACH\"").unwrap();
        assert_eq!(kind, EventKind::SlaBreach);
    }

    #[test]
    fn unknown_kind_decodes_as_other() {
        let kind: EventKind = serde_json::from_str("\"PAGER_SYNC\"").unwrap();
        assert_eq!(kind, EventKind::Other);
        assert_eq!(kind.label(), "Event");
    }

    #[test]
    fn value_change_badges_only_for_transitions() {
        assert!(EventKind::StatusChange.shows_value_change());
        assert!(EventKind::OwnerChange.shows_value_change());
        assert!(!EventKind::Comment.shows_value_change());
        assert!(!EventKind::SlaBreach.shows_value_change());
    }

    #[test]
    fn event_decodes_with_null_actor() {
        let json = r#"{
            "id": "ev-1",
            "event_type": "SLA_BREACH",
            "new_value": "SEV1",
            "actor_id": null,
            "created_at": "2024-03-01 08:00:00"
        }"#;
        let event: IncidentEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.actor_id, None);
        assert_eq!(event.event_type, EventKind::SlaBreach);
        assert_eq!(event.comment, None);
    }
}
