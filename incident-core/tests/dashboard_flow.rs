//! End-to-end exercise of the client logic against realistic API JSON:
//! decode a feed, filter it, pick an action target, and build the bodies
//! a mutation would send.

use incident_core::actions::{CreateIncident, TransitionIncident};
use incident_core::filter::{filter_incidents, FilterState};
use incident_core::incident::{status, DashboardTallies, Incident, Severity};
use incident_core::upload::{SignAttachment, SignedUpload, UploadPhase};
use incident_core::user::{Role, User, UserDirectory};

const FEED: &str = r#"[
    {
        "id": "0a1b2c3d-e4f5-6789-aaaa-bbbbbbbbbbbb",
        "title": "Checkout API returning 500s",
        "description": "Spike began after the 14:00 deploy",
        "severity": "SEV1",
        "status": "INVESTIGATING",
        "owner_id": "u-ada",
        "allowed_transitions": ["MITIGATED", "ESCALATED"],
        "created_at": "2024-03-01 13:58:02",
        "updated_at": "2024-03-01 14:10:44"
    },
    {
        "id": "11112222-3333-4444-5555-666677778888",
        "title": "Stale search index",
        "severity": "SEV4",
        "status": "DETECTED",
        "owner_id": null,
        "allowed_transitions": ["INVESTIGATING", "CLOSED"],
        "updated_at": "2024-03-01T09:30:00"
    },
    {
        "id": "99990000-aaaa-bbbb-cccc-ddddeeeeffff",
        "title": "Elevated p99 on image resizer",
        "severity": "SEV3",
        "status": "RESOLVED",
        "owner_id": "u-sam",
        "allowed_transitions": ["POSTMORTEM"],
        "updated_at": "2024-02-28 22:05:11"
    }
]"#;

fn directory() -> UserDirectory {
    UserDirectory::new(vec![
        User {
            id: "u-ada".to_string(),
            full_name: "Ada Park".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Manager,
            created_at: String::new(),
        },
        User {
            id: "u-sam".to_string(),
            full_name: "Sam Low".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::Engineer,
            created_at: String::new(),
        },
    ])
}

#[test]
fn feed_decodes_filters_and_tallies() {
    let feed: Vec<Incident> = serde_json::from_str(FEED).unwrap();
    assert_eq!(feed.len(), 3);

    let tallies = DashboardTallies::tally(&feed);
    assert_eq!(tallies.critical, 1);
    assert_eq!(tallies.investigating, 1);
    assert_eq!(tallies.active, 2);

    let all = filter_incidents(&feed, &FilterState::default());
    assert_eq!(all[0].title, "Checkout API returning 500s");
    assert_eq!(all[2].title, "Elevated p99 on image resizer");

    let mut filters = FilterState::default();
    filters.search = "0a1b2c3d".to_string();
    let by_id = filter_incidents(&feed, &filters);
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].short_id(), "0a1b2c3d");
}

#[test]
fn directory_resolves_feed_owners() {
    let feed: Vec<Incident> = serde_json::from_str(FEED).unwrap();
    let dir = directory();
    assert_eq!(dir.display_name(feed[0].owner_id.as_deref()), "Ada Park");
    assert_eq!(dir.display_name(feed[1].owner_id.as_deref()), "Unassigned");
}

#[test]
fn transition_uses_the_servers_offered_states() {
    let feed: Vec<Incident> = serde_json::from_str(FEED).unwrap();
    let detected = &feed[1];

    let default_target = detected.allowed_transitions.first().unwrap();
    let body = TransitionIncident::new(detected, default_target, "").unwrap();
    assert_eq!(body.new_state, status::INVESTIGATING);

    assert!(TransitionIncident::new(detected, status::RESOLVED, "").is_err());
}

#[test]
fn create_body_respects_the_assignment_rule() {
    let manager = CreateIncident::new("Queue backlog", "", Severity::Sev2, "u-sam", "u-ada").unwrap();
    assert_eq!(manager.owner_id.as_deref(), Some("u-sam"));

    let engineer = CreateIncident::new("Queue backlog", "", Severity::Sev2, "u-sam", "u-sam").unwrap();
    assert_eq!(engineer.owner_id, None);
    let json = serde_json::to_string(&engineer).unwrap();
    assert!(!json.contains("owner_id"));
}

#[test]
fn upload_flow_builds_the_storage_form_inputs() {
    let sign = SignAttachment {
        file_name: "heap-dump.bin".to_string(),
        file_type: "application/octet-stream".to_string(),
    };
    let body = serde_json::to_string(&sign).unwrap();
    assert!(body.contains("heap-dump.bin"));

    let signed: SignedUpload = serde_json::from_str(
        r#"{
            "data": {
                "url": "https://store.example.com/incidentflow",
                "fields": {
                    "key": "org-1/inc-1/heap-dump.bin",
                    "x-amz-credential": "cred",
                    "policy": "p"
                }
            },
            "file_key": "org-1/inc-1/heap-dump.bin"
        }"#,
    )
    .unwrap();

    let phase = UploadPhase::Idle.start().unwrap().signed().unwrap();
    assert_eq!(phase, UploadPhase::Uploading { progress: 0 });
    assert_eq!(signed.data.fields.len(), 3);
    assert_eq!(signed.file_key, "org-1/inc-1/heap-dump.bin");
}
