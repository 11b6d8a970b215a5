//! Incident records as the coordination API returns them, plus the
//! severity scale and the dashboard tallies derived from a loaded list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity scale, most critical first. The wire form is `SEV1`..`SEV4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "SEV1")]
    Sev1,
    #[serde(rename = "SEV2")]
    Sev2,
    #[serde(rename = "SEV3")]
    Sev3,
    #[serde(rename = "SEV4")]
    Sev4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Sev1, Severity::Sev2, Severity::Sev3, Severity::Sev4];

    /// Wire and badge form, e.g. `SEV2`.
    pub fn code(self) -> &'static str {
        match self {
            Severity::Sev1 => "SEV1",
            Severity::Sev2 => "SEV2",
            Severity::Sev3 => "SEV3",
            Severity::Sev4 => "SEV4",
        }
    }

    /// Human label shown next to the code in pickers.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Sev1 => "Critical",
            Severity::Sev2 => "High",
            Severity::Sev3 => "Moderate",
            Severity::Sev4 => "Low",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Sev4
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SEV1" => Ok(Severity::Sev1),
            "SEV2" => Ok(Severity::Sev2),
            "SEV3" => Ok(Severity::Sev3),
            "SEV4" => Ok(Severity::Sev4),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Lifecycle states the backend reports. The client never invents states;
/// it only offers the `allowed_transitions` the record carries.
pub mod status {
    pub const DETECTED: &str = "DETECTED";
    pub const INVESTIGATING: &str = "INVESTIGATING";
    pub const MITIGATED: &str = "MITIGATED";
    pub const RESOLVED: &str = "RESOLVED";
    pub const POSTMORTEM: &str = "POSTMORTEM";
    pub const CLOSED: &str = "CLOSED";
    pub const ESCALATED: &str = "ESCALATED";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    pub status: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    /// States this incident may move to next, in server order.
    #[serde(default)]
    pub allowed_transitions: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Incident {
    /// First eight characters of the id, the form shown in tables and search.
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    pub fn is_resolved(&self) -> bool {
        self.status == status::RESOLVED
    }
}

/// Headline numbers for the dashboard cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardTallies {
    /// SEV1 incidents in the list.
    pub critical: usize,
    /// Incidents currently under investigation.
    pub investigating: usize,
    /// Everything not yet resolved.
    pub active: usize,
}

impl DashboardTallies {
    pub fn tally(incidents: &[Incident]) -> Self {
        let mut out = DashboardTallies::default();
        for incident in incidents {
            if incident.severity == Severity::Sev1 {
                out.critical += 1;
            }
            if incident.status == status::INVESTIGATING {
                out.investigating += 1;
            }
            if !incident.is_resolved() {
                out.active += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str, severity: Severity, status: &str) -> Incident {
        Incident {
            id: id.to_string(),
            title: "db outage".to_string(),
            description: String::new(),
            severity,
            status: status.to_string(),
            owner_id: None,
            allowed_transitions: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn severity_round_trips_wire_codes() {
        for sev in Severity::ALL {
            let json = serde_json::to_string(&sev).unwrap();
            assert_eq!(json, format!("\"{}\"", sev.code()));
            let back: Severity = serde_json::from_str(&json).unwrap();
            assert_eq!(back, sev);
        }
    }

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!("sev1".parse::<Severity>().unwrap(), Severity::Sev1);
        assert_eq!("Sev3".parse::<Severity>().unwrap(), Severity::Sev3);
        assert!("SEV9".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_orders_most_critical_first() {
        assert!(Severity::Sev1 < Severity::Sev2);
        assert!(Severity::Sev3 < Severity::Sev4);
    }

    #[test]
    fn short_id_truncates_without_splitting_chars() {
        let inc = incident("0a1b2c3d4e5f", Severity::Sev2, status::DETECTED);
        assert_eq!(inc.short_id(), "0a1b2c3d");
        let tiny = incident("ab", Severity::Sev2, status::DETECTED);
        assert_eq!(tiny.short_id(), "ab");
    }

    #[test]
    fn tallies_count_critical_investigating_and_unresolved() {
        let list = vec![
            incident("a", Severity::Sev1, status::INVESTIGATING),
            incident("b", Severity::Sev4, status::RESOLVED),
            incident("c", Severity::Sev2, status::DETECTED),
        ];
        let tallies = DashboardTallies::tally(&list);
        assert_eq!(tallies.critical, 1);
        assert_eq!(tallies.investigating, 1);
        assert_eq!(tallies.active, 2);
    }

    #[test]
    fn incident_decodes_with_missing_optional_fields() {
        let json = r#"{"id":"x1","title":"api 500s","severity":"SEV2","status":"DETECTED"}"#;
        let inc: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(inc.owner_id, None);
        assert!(inc.allowed_transitions.is_empty());
        assert_eq!(inc.updated_at, "");
    }
}
