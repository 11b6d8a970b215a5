//! Organization members, their roles, and the directory used to resolve
//! ids into display names across the app.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Closed role set. Anything unrecognized downgrades to `Engineer` so a
/// stale or tampered session never gains privileges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Engineer,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Engineer, Role::Manager, Role::Admin];

    /// Lenient parse for values coming out of session metadata.
    pub fn from_label_lossy(label: &str) -> Role {
        match label.to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "MANAGER" => Role::Manager,
            _ => Role::Engineer,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Role::Engineer => "ENGINEER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Label used in the role picker of the user editor.
    pub fn description(self) -> &'static str {
        match self {
            Role::Engineer => "Engineer (Standard)",
            Role::Manager => "Manager (Can Assign/Edit)",
            Role::Admin => "Admin (Full Access)",
        }
    }

    /// Change severity or reassign an incident.
    pub fn can_edit_incidents(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// Assign work to someone other than yourself at creation time.
    pub fn can_assign_others(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    /// Permanently delete an incident.
    pub fn can_delete_incidents(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Remove attachments uploaded by other people.
    pub fn can_delete_any_attachment(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Enter the admin console and manage members.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: String,
}

/// Body for `PATCH /users/{id}/role`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChangeUserRole {
    pub role: Role,
}

/// Snapshot of the org member list with id lookups on top. Rebuilt
/// wholesale whenever the member list is refetched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserDirectory {
    users: Vec<User>,
    index: HashMap<String, usize>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        let index = users
            .iter()
            .enumerate()
            .map(|(pos, user)| (user.id.clone(), pos))
            .collect();
        UserDirectory { users, index }
    }

    /// Members in server order, for dropdowns.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.index.get(id).map(|pos| &self.users[*pos])
    }

    /// Assignee column text. Unassigned and unknown ids both read as
    /// "Unassigned" so a half-loaded directory never shows raw ids.
    pub fn display_name(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.get(id))
            .map(|user| user.full_name.clone())
            .unwrap_or_else(|| "Unassigned".to_string())
    }

    /// Timeline actor text. Automatic events have no actor and read as
    /// "System"; ids missing from the directory fall back to a short id.
    pub fn actor_label(&self, id: Option<&str>) -> String {
        match id {
            None => "System".to_string(),
            Some(id) => match self.get(id) {
                Some(user) => user.full_name.clone(),
                None => {
                    let end = id
                        .char_indices()
                        .nth(8)
                        .map(|(idx, _)| idx)
                        .unwrap_or(id.len());
                    id[..end].to_string()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            full_name: name.to_string(),
            email: format!("{id}@example.com"),
            role,
            created_at: String::new(),
        }
    }

    #[test]
    fn role_decodes_wire_codes() {
        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role, Role::Manager);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn lossy_parse_downgrades_unknown_roles() {
        assert_eq!(Role::from_label_lossy("admin"), Role::Admin);
        assert_eq!(Role::from_label_lossy("Manager"), Role::Manager);
        assert_eq!(Role::from_label_lossy("SUPERUSER"), Role::Engineer);
        assert_eq!(Role::from_label_lossy(""), Role::Engineer);
    }

    #[test]
    fn engineer_has_least_privilege() {
        assert!(!Role::Engineer.can_edit_incidents());
        assert!(!Role::Engineer.can_assign_others());
        assert!(!Role::Engineer.can_delete_incidents());
        assert!(!Role::Engineer.can_manage_users());
    }

    #[test]
    fn manager_edits_but_does_not_administer() {
        assert!(Role::Manager.can_edit_incidents());
        assert!(Role::Manager.can_assign_others());
        assert!(!Role::Manager.can_delete_incidents());
        assert!(!Role::Manager.can_manage_users());
    }

    #[test]
    fn admin_has_every_capability() {
        assert!(Role::Admin.can_edit_incidents());
        assert!(Role::Admin.can_assign_others());
        assert!(Role::Admin.can_delete_incidents());
        assert!(Role::Admin.can_delete_any_attachment());
        assert!(Role::Admin.can_manage_users());
    }

    #[test]
    fn directory_resolves_names_with_fallbacks() {
        let dir = UserDirectory::new(vec![member("u-1", "Ada Park", Role::Engineer)]);
        assert_eq!(dir.display_name(Some("u-1")), "Ada Park");
        assert_eq!(dir.display_name(Some("u-404")), "Unassigned");
        assert_eq!(dir.display_name(None), "Unassigned");
    }

    #[test]
    fn actor_label_falls_back_to_short_id_and_system() {
        let dir = UserDirectory::new(vec![member("u-1", "Ada Park", Role::Engineer)]);
        assert_eq!(dir.actor_label(Some("u-1")), "Ada Park");
        assert_eq!(dir.actor_label(Some("9f8e7d6c5b4a")), "9f8e7d6c");
        assert_eq!(dir.actor_label(None), "System");
    }

    #[test]
    fn role_change_body_encodes_code() {
        let body = serde_json::to_string(&ChangeUserRole { role: Role::Manager }).unwrap();
        assert_eq!(body, r#"{"role":"MANAGER"}"#);
    }
}
