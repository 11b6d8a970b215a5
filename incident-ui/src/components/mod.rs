pub mod action_modal;
pub mod admin;
pub mod attachments;
pub mod create_modal;
pub mod dashboard;
pub mod filters_bar;
pub mod header;
pub mod history;
pub mod metrics;
pub mod register;
pub mod stats;
pub mod user_nav;

use incident_core::incident::{status, Severity};

pub(crate) fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Sev1 => "sev1",
        Severity::Sev2 => "sev2",
        Severity::Sev3 => "sev3",
        Severity::Sev4 => "sev4",
    }
}

pub(crate) fn status_class(status: &str) -> &'static str {
    match status {
        status::DETECTED => "detected",
        status::INVESTIGATING => "investigating",
        status::MITIGATED => "mitigated",
        status::RESOLVED => "resolved",
        status::POSTMORTEM => "postmortem",
        status::CLOSED => "closed",
        status::ESCALATED => "escalated",
        _ => "other",
    }
}
