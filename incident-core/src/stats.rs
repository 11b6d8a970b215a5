//! Aggregates behind the admin console: org-wide counters, per-member
//! performance, and the MTTR/MTTA analytics windows.

use crate::incident::Severity;
use crate::user::Role;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_incidents: u64,
    #[serde(default)]
    pub active_incidents: u64,
    /// Keyed by severity code, e.g. `"SEV1": 3`.
    #[serde(default)]
    pub incidents_by_severity: BTreeMap<String, u64>,
    #[serde(default, alias = "user_performance")]
    pub users: Vec<UserPerformance>,
}

impl AdminStats {
    pub fn severity_count(&self, severity: Severity) -> u64 {
        self.incidents_by_severity
            .get(severity.code())
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserPerformance {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub assigned_count: u64,
    #[serde(default)]
    pub resolved_count: u64,
    #[serde(default)]
    pub comments_made: u64,
    #[serde(default)]
    pub escalations_triggered: u64,
}

impl UserPerformance {
    /// Resolved share of assigned work as a whole percentage. A member
    /// with nothing assigned scores zero rather than dividing by zero.
    pub fn resolution_rate(&self) -> u8 {
        if self.assigned_count == 0 {
            return 0;
        }
        let rate = (self.resolved_count as f64 / self.assigned_count as f64) * 100.0;
        rate.round().clamp(0.0, 100.0) as u8
    }
}

/// The three lookback windows the charts endpoint accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyticsWindow {
    Week,
    Month,
    Quarter,
}

impl AnalyticsWindow {
    pub const ALL: [AnalyticsWindow; 3] = [
        AnalyticsWindow::Week,
        AnalyticsWindow::Month,
        AnalyticsWindow::Quarter,
    ];

    pub fn days(self) -> u32 {
        match self {
            AnalyticsWindow::Week => 7,
            AnalyticsWindow::Month => 30,
            AnalyticsWindow::Quarter => 90,
        }
    }

    /// Only the supported windows map back; anything else is refused
    /// rather than forwarded to the API.
    pub fn from_days(days: u32) -> Option<AnalyticsWindow> {
        match days {
            7 => Some(AnalyticsWindow::Week),
            30 => Some(AnalyticsWindow::Month),
            90 => Some(AnalyticsWindow::Quarter),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalyticsWindow::Week => "7 days",
            AnalyticsWindow::Month => "30 days",
            AnalyticsWindow::Quarter => "90 days",
        }
    }
}

impl Default for AnalyticsWindow {
    fn default() -> Self {
        AnalyticsWindow::Month
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub time_window_days: u32,
    #[serde(default)]
    pub mttr_hours: f64,
    #[serde(default)]
    pub mtta_minutes: f64,
    /// Share of incidents that breached SLA, 0.0 to 100.0.
    #[serde(default)]
    pub sla_breach_rate: f64,
    #[serde(default)]
    pub total_breaches: u64,
    #[serde(default)]
    pub volume_trend: Vec<VolumePoint>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VolumePoint {
    pub date: String,
    pub count: u64,
}

impl Analytics {
    /// Tallest bar in the volume trend, floored at one so bar widths
    /// divide cleanly for an empty window.
    pub fn peak_volume(&self) -> u64 {
        self.volume_trend
            .iter()
            .map(|point| point.count)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_stats_decode_with_per_user_rows() {
        let stats: AdminStats = serde_json::from_str(
            r#"{
                "total_users": 4,
                "total_incidents": 12,
                "active_incidents": 5,
                "incidents_by_severity": {"SEV1": 2, "SEV3": 10},
                "users": [{
                    "id": "u-1",
                    "full_name": "Ada Park",
                    "email": "ada@example.com",
                    "role": "ADMIN",
                    "assigned_count": 8,
                    "resolved_count": 6
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(stats.severity_count(Severity::Sev1), 2);
        assert_eq!(stats.severity_count(Severity::Sev2), 0);
        assert_eq!(stats.users.len(), 1);
        assert_eq!(stats.users[0].resolution_rate(), 75);
    }

    #[test]
    fn admin_stats_accept_the_user_performance_alias() {
        let stats: AdminStats = serde_json::from_str(
            r#"{"user_performance": [{
                "id": "u-2",
                "full_name": "Sam Low",
                "email": "sam@example.com",
                "role": "ENGINEER"
            }]}"#,
        )
        .unwrap();
        assert_eq!(stats.users[0].full_name, "Sam Low");
    }

    #[test]
    fn resolution_rate_handles_zero_assignments() {
        let perf = UserPerformance {
            id: "u-1".to_string(),
            full_name: "Ada".to_string(),
            email: "a@example.com".to_string(),
            role: Role::Engineer,
            created_at: String::new(),
            assigned_count: 0,
            resolved_count: 0,
            comments_made: 0,
            escalations_triggered: 0,
        };
        assert_eq!(perf.resolution_rate(), 0);
    }

    #[test]
    fn only_supported_windows_parse() {
        assert_eq!(AnalyticsWindow::from_days(7), Some(AnalyticsWindow::Week));
        assert_eq!(AnalyticsWindow::from_days(30), Some(AnalyticsWindow::Month));
        assert_eq!(AnalyticsWindow::from_days(90), Some(AnalyticsWindow::Quarter));
        assert_eq!(AnalyticsWindow::from_days(14), None);
        assert_eq!(AnalyticsWindow::from_days(0), None);
    }

    #[test]
    fn peak_volume_never_returns_zero() {
        let empty = Analytics::default();
        assert_eq!(empty.peak_volume(), 1);

        let busy = Analytics {
            volume_trend: vec![
                VolumePoint { date: "2024-03-01".to_string(), count: 3 },
                VolumePoint { date: "2024-03-02".to_string(), count: 9 },
            ],
            ..Analytics::default()
        };
        assert_eq!(busy.peak_volume(), 9);
    }
}
