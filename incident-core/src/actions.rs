//! Request bodies for the incident mutation flows, built and validated
//! client side before anything goes on the wire.

use crate::incident::{Incident, Severity};
use serde::Serialize;

/// Alert text for a 403 on create. The backend refuses assignment to
/// another user for anyone below manager.
pub const CREATE_PERMISSION_DENIED: &str =
    "You do not have permission to create an incident assigned to another user.";
pub const CREATE_FAILED: &str = "Failed to create incident";

/// Comment recorded on a transition when the reporter leaves the box blank.
pub const DEFAULT_TRANSITION_COMMENT: &str = "State updated via Action Modal";

/// Pick the alert for a failed create from the HTTP status.
pub fn create_failure_message(status: Option<u16>) -> &'static str {
    match status {
        Some(403) => CREATE_PERMISSION_DENIED,
        _ => CREATE_FAILED,
    }
}

/// Body for `POST /incidents`. Self-assignment is expressed by omitting
/// `owner_id` entirely, which lets the backend default to the caller and
/// spares engineers a spurious permission check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateIncident {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl CreateIncident {
    pub fn new(
        title: &str,
        description: &str,
        severity: Severity,
        assignee_id: &str,
        acting_user_id: &str,
    ) -> Result<Self, String> {
        let title = title.trim();
        if title.is_empty() {
            return Err("Incident title is required".to_string());
        }
        let owner_id = (!assignee_id.is_empty() && assignee_id != acting_user_id)
            .then(|| assignee_id.to_string());
        Ok(CreateIncident {
            title: title.to_string(),
            description: description.trim().to_string(),
            severity,
            owner_id,
        })
    }
}

/// Body for `POST /incidents/{id}/transition`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionIncident {
    pub new_state: String,
    pub comment: String,
}

impl TransitionIncident {
    /// The target must come from the record's own `allowed_transitions`;
    /// the client never proposes a state the server did not offer.
    pub fn new(incident: &Incident, target: &str, comment: &str) -> Result<Self, String> {
        if target.is_empty() {
            return Err("Select a target status".to_string());
        }
        if !incident.allowed_transitions.iter().any(|t| t == target) {
            return Err(format!(
                "{} cannot move to {} from {}",
                incident.short_id(),
                target,
                incident.status
            ));
        }
        let comment = match comment.trim() {
            "" => DEFAULT_TRANSITION_COMMENT.to_string(),
            text => text.to_string(),
        };
        Ok(TransitionIncident {
            new_state: target.to_string(),
            comment,
        })
    }
}

/// Body for `POST /incidents/{id}/comment`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentOnIncident {
    pub comment: String,
}

impl CommentOnIncident {
    pub fn new(comment: &str) -> Result<Self, String> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err("Comment cannot be empty".to_string());
        }
        Ok(CommentOnIncident {
            comment: comment.to_string(),
        })
    }
}

/// Body for `PATCH /incidents/{id}`. Carries only the fields that
/// actually changed so the audit trail records real deltas.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EditIncident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl EditIncident {
    pub fn new(
        incident: &Incident,
        severity: Severity,
        assignee_id: &str,
        comment: &str,
    ) -> Result<Self, String> {
        let severity = (severity != incident.severity).then_some(severity);
        let owner_id = (!assignee_id.is_empty()
            && incident.owner_id.as_deref() != Some(assignee_id))
        .then(|| assignee_id.to_string());
        let comment = match comment.trim() {
            "" => None,
            text => Some(text.to_string()),
        };
        if severity.is_none() && owner_id.is_none() && comment.is_none() {
            return Err("No changes to apply".to_string());
        }
        Ok(EditIncident {
            severity,
            owner_id,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::status;
    use serde_json::json;

    fn incident_with(owner: Option<&str>, transitions: &[&str]) -> Incident {
        Incident {
            id: "inc-42aa".to_string(),
            title: "db outage".to_string(),
            description: String::new(),
            severity: Severity::Sev2,
            status: status::DETECTED.to_string(),
            owner_id: owner.map(|o| o.to_string()),
            allowed_transitions: transitions.iter().map(|t| t.to_string()).collect(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn self_assigned_create_omits_owner_id() {
        let body = CreateIncident::new("db outage", "replica lag", Severity::Sev2, "me", "me").unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"title": "db outage", "description": "replica lag", "severity": "SEV2"})
        );
    }

    #[test]
    fn assigning_someone_else_sends_owner_id() {
        let body = CreateIncident::new("db outage", "", Severity::Sev1, "u-2", "me").unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["owner_id"], "u-2");
    }

    #[test]
    fn create_requires_a_title() {
        assert!(CreateIncident::new("   ", "", Severity::Sev3, "me", "me").is_err());
    }

    #[test]
    fn forbidden_create_gets_the_assignment_alert() {
        assert_eq!(create_failure_message(Some(403)), CREATE_PERMISSION_DENIED);
        assert_eq!(create_failure_message(Some(500)), CREATE_FAILED);
        assert_eq!(create_failure_message(None), CREATE_FAILED);
    }

    #[test]
    fn transition_only_accepts_offered_states() {
        let incident = incident_with(None, &[status::INVESTIGATING, status::ESCALATED]);
        assert!(TransitionIncident::new(&incident, status::INVESTIGATING, "on it").is_ok());
        assert!(TransitionIncident::new(&incident, status::RESOLVED, "").is_err());
        assert!(TransitionIncident::new(&incident, "", "").is_err());
    }

    #[test]
    fn blank_transition_comment_gets_the_default() {
        let incident = incident_with(None, &[status::INVESTIGATING]);
        let body = TransitionIncident::new(&incident, status::INVESTIGATING, "  ").unwrap();
        assert_eq!(body.comment, DEFAULT_TRANSITION_COMMENT);

        let noted = TransitionIncident::new(&incident, status::INVESTIGATING, " paging dba ").unwrap();
        assert_eq!(noted.comment, "paging dba");
    }

    #[test]
    fn comment_body_rejects_blank_input() {
        assert!(CommentOnIncident::new("  \n ").is_err());
        let body = CommentOnIncident::new(" shipped a fix ").unwrap();
        assert_eq!(body.comment, "shipped a fix");
    }

    #[test]
    fn edit_carries_only_changed_fields() {
        let incident = incident_with(Some("u-1"), &[]);
        let body = EditIncident::new(&incident, Severity::Sev1, "u-1", "").unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({"severity": "SEV1"}));

        let body = EditIncident::new(&incident, Severity::Sev2, "u-2", "handing over").unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({"owner_id": "u-2", "comment": "handing over"}));
    }

    #[test]
    fn edit_with_no_changes_is_rejected() {
        let incident = incident_with(Some("u-1"), &[]);
        assert!(EditIncident::new(&incident, Severity::Sev2, "u-1", "  ").is_err());
    }
}
