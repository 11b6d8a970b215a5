//! The dashboard filter engine.
//!
//! Facets combine with AND, selections inside a facet with OR, and an
//! empty facet never constrains. The search box matches title or id,
//! case-insensitively. Output is always newest-updated first.

use crate::incident::{Incident, Severity};
use crate::timestamp;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub severities: BTreeSet<Severity>,
    pub statuses: BTreeSet<String>,
    pub assignee_id: Option<String>,
    pub search: String,
}

impl FilterState {
    pub fn matches(&self, incident: &Incident) -> bool {
        self.matches_search(incident)
            && self.matches_severity(incident)
            && self.matches_status(incident)
            && self.matches_assignee(incident)
    }

    fn matches_search(&self, incident: &Incident) -> bool {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        incident.title.to_lowercase().contains(&query)
            || incident.id.to_lowercase().contains(&query)
    }

    fn matches_severity(&self, incident: &Incident) -> bool {
        self.severities.is_empty() || self.severities.contains(&incident.severity)
    }

    fn matches_status(&self, incident: &Incident) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&incident.status)
    }

    fn matches_assignee(&self, incident: &Incident) -> bool {
        match &self.assignee_id {
            None => true,
            Some(id) => incident.owner_id.as_deref() == Some(id.as_str()),
        }
    }

    pub fn toggle_severity(&mut self, severity: Severity) {
        if !self.severities.remove(&severity) {
            self.severities.insert(severity);
        }
    }

    pub fn toggle_status(&mut self, status: &str) {
        if !self.statuses.remove(status) {
            self.statuses.insert(status.to_string());
        }
    }

    /// Number of facet selections, excluding the search text. Drives the
    /// "Clear All" affordance.
    pub fn active_count(&self) -> usize {
        self.severities.len() + self.statuses.len() + usize::from(self.assignee_id.is_some())
    }

    /// Drop every facet selection but keep the search text.
    pub fn clear_facets(&mut self) {
        self.severities.clear();
        self.statuses.clear();
        self.assignee_id = None;
    }
}

/// Apply `filters` and order the survivors by `updated_at` descending.
/// The sort is stable, so records with equal (or unparseable) timestamps
/// keep their fetch order, and malformed timestamps sink to the end.
pub fn filter_incidents(incidents: &[Incident], filters: &FilterState) -> Vec<Incident> {
    let mut out: Vec<Incident> = incidents
        .iter()
        .filter(|incident| filters.matches(incident))
        .cloned()
        .collect();
    out.sort_by_cached_key(|incident| std::cmp::Reverse(timestamp::parse_millis(&incident.updated_at)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::status;

    fn incident(id: &str, title: &str, severity: Severity, stat: &str, updated_at: &str) -> Incident {
        Incident {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            severity,
            status: stat.to_string(),
            owner_id: None,
            allowed_transitions: vec![],
            created_at: String::new(),
            updated_at: updated_at.to_string(),
        }
    }

    fn owned(mut inc: Incident, owner: &str) -> Incident {
        inc.owner_id = Some(owner.to_string());
        inc
    }

    fn ids(list: &[Incident]) -> Vec<&str> {
        list.iter().map(|i| i.id.as_str()).collect()
    }

    fn feed() -> Vec<Incident> {
        vec![
            incident("a", "API latency", Severity::Sev2, status::DETECTED, "2024-03-01 08:00:00"),
            incident("b", "Disk full on db-2", Severity::Sev1, status::INVESTIGATING, "2024-03-02 08:00:00"),
            incident("c", "Stale cache", Severity::Sev4, status::RESOLVED, "2024-03-01 12:00:00"),
        ]
    }

    #[test]
    fn empty_filters_return_everything_newest_first() {
        let out = filter_incidents(&feed(), &FilterState::default());
        assert_eq!(ids(&out), ["b", "c", "a"]);
    }

    #[test]
    fn equal_timestamps_keep_fetch_order() {
        let list = vec![
            incident("x", "one", Severity::Sev3, status::DETECTED, "2024-03-01 08:00:00"),
            incident("y", "two", Severity::Sev3, status::DETECTED, "2024-03-01 08:00:00"),
            incident("z", "three", Severity::Sev3, status::DETECTED, "2024-03-01 08:00:00"),
        ];
        let out = filter_incidents(&list, &FilterState::default());
        assert_eq!(ids(&out), ["x", "y", "z"]);
    }

    #[test]
    fn malformed_timestamps_sink_to_the_end_stably() {
        let list = vec![
            incident("bad1", "one", Severity::Sev3, status::DETECTED, "not a date"),
            incident("good", "two", Severity::Sev3, status::DETECTED, "2024-03-01 08:00:00"),
            incident("bad2", "three", Severity::Sev3, status::DETECTED, ""),
        ];
        let out = filter_incidents(&list, &FilterState::default());
        assert_eq!(ids(&out), ["good", "bad1", "bad2"]);
    }

    #[test]
    fn space_separated_timestamps_order_like_rfc3339() {
        let list = vec![
            incident("older", "one", Severity::Sev3, status::DETECTED, "2024-03-01T08:00:00"),
            incident("newer", "two", Severity::Sev3, status::DETECTED, "2024-03-01 09:00:00"),
        ];
        let out = filter_incidents(&list, &FilterState::default());
        assert_eq!(ids(&out), ["newer", "older"]);
    }

    #[test]
    fn search_matches_title_or_id_case_insensitively() {
        let mut filters = FilterState::default();
        filters.search = "LATENCY".to_string();
        assert_eq!(ids(&filter_incidents(&feed(), &filters)), ["a"]);

        filters.search = "B".to_string();
        let out = filter_incidents(&feed(), &filters);
        assert!(out.iter().any(|i| i.id == "b"));
    }

    #[test]
    fn severity_facet_is_a_disjunction() {
        let mut filters = FilterState::default();
        filters.toggle_severity(Severity::Sev1);
        assert_eq!(ids(&filter_incidents(&feed(), &filters)), ["b"]);

        filters.toggle_severity(Severity::Sev2);
        let widened = filter_incidents(&feed(), &filters);
        assert_eq!(ids(&widened), ["b", "a"]);
    }

    #[test]
    fn toggling_a_selection_twice_removes_it() {
        let mut filters = FilterState::default();
        filters.toggle_status(status::RESOLVED);
        filters.toggle_status(status::RESOLVED);
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn assignee_facet_matches_exact_owner() {
        let list = vec![
            owned(incident("a", "one", Severity::Sev3, status::DETECTED, "2024-03-02 08:00:00"), "u-1"),
            owned(incident("b", "two", Severity::Sev3, status::DETECTED, "2024-03-01 08:00:00"), "u-2"),
            incident("c", "three", Severity::Sev3, status::DETECTED, "2024-03-03 08:00:00"),
        ];
        let mut filters = FilterState::default();
        filters.assignee_id = Some("u-1".to_string());
        assert_eq!(ids(&filter_incidents(&list, &filters)), ["a"]);
    }

    #[test]
    fn facets_combine_conjunctively() {
        let mut filters = FilterState::default();
        filters.toggle_severity(Severity::Sev1);
        filters.toggle_status(status::RESOLVED);
        assert!(filter_incidents(&feed(), &filters).is_empty());

        filters.toggle_status(status::RESOLVED);
        filters.toggle_status(status::INVESTIGATING);
        assert_eq!(ids(&filter_incidents(&feed(), &filters)), ["b"]);
    }

    #[test]
    fn clear_facets_preserves_search_text() {
        let mut filters = FilterState::default();
        filters.search = "disk".to_string();
        filters.toggle_severity(Severity::Sev1);
        filters.assignee_id = Some("u-1".to_string());
        assert_eq!(filters.active_count(), 2);

        filters.clear_facets();
        assert_eq!(filters.active_count(), 0);
        assert_eq!(filters.search, "disk");
    }
}
