//! Session access.
//!
//! The identity provider widget runs outside this bundle and leaves its
//! session JSON in localStorage. This module is the only reader of that
//! entry: it normalizes provider metadata into a typed [`SessionUser`]
//! and exposes a reactive handle for the shell.

use incident_core::user::{Role, User};
use leptos::*;
use serde::Deserialize;

pub const SESSION_STORAGE_KEY: &str = "incidentflow.session";

#[derive(Clone, Debug, Deserialize)]
struct StoredSession {
    access_token: String,
    user: StoredUser,
}

#[derive(Clone, Debug, Deserialize)]
struct StoredUser {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    user_metadata: ProfileMetadata,
    #[serde(default)]
    app_metadata: AccessMetadata,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct ProfileMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct AccessMetadata {
    #[serde(default)]
    role: Option<String>,
}

/// The signed-in account with provider metadata flattened out.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl SessionUser {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            "User"
        } else {
            &self.full_name
        }
    }

    pub fn initials(&self) -> String {
        self.full_name
            .chars()
            .next()
            .or_else(|| self.email.chars().next())
            .unwrap_or('U')
            .to_uppercase()
            .to_string()
    }

    /// The session account as a directory-style record, for gating
    /// checks that compare against org members.
    pub fn as_member(&self) -> User {
        User {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
}

fn read_raw() -> Option<String> {
    let storage = window().local_storage().ok().flatten()?;
    storage.get_item(SESSION_STORAGE_KEY).ok().flatten()
}

/// Parse the provider session out of localStorage. `None` means signed
/// out, including the case where the stored JSON is unreadable.
pub fn load() -> Option<Session> {
    let raw = read_raw()?;
    let stored: StoredSession = match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(err) => {
            log::warn!("ignoring unreadable session entry: {err}");
            return None;
        }
    };
    let role = match stored.user.app_metadata.role.as_deref() {
        Some(label) => {
            let role = Role::from_label_lossy(label);
            if role == Role::Engineer && !label.eq_ignore_ascii_case(Role::Engineer.code()) {
                log::warn!("unrecognized role {label:?}; treating account as engineer");
            }
            role
        }
        None => Role::Engineer,
    };
    Some(Session {
        access_token: stored.access_token,
        user: SessionUser {
            id: stored.user.id,
            email: stored.user.email,
            full_name: stored.user.user_metadata.full_name.unwrap_or_default(),
            role,
        },
    })
}

/// Bearer token for one request, read fresh so a re-login in another
/// tab is picked up without reloading the app.
pub fn access_token() -> Option<String> {
    load().map(|session| session.access_token)
}

pub fn clear() {
    if let Some(storage) = window().local_storage().ok().flatten() {
        let _ = storage.remove_item(SESSION_STORAGE_KEY);
    }
}

/// Reactive view of the session, provided once at the app root.
#[derive(Clone, Copy)]
pub struct SessionStore {
    session: RwSignal<Option<Session>>,
}

impl SessionStore {
    pub fn init() -> Self {
        SessionStore {
            session: create_rw_signal(load()),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.with(|session| session.is_some())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.session
            .with(|session| session.as_ref().map(|s| s.user.clone()))
    }

    pub fn role(&self) -> Role {
        self.session
            .with(|session| session.as_ref().map(|s| s.user.role).unwrap_or(Role::Engineer))
    }

    /// Re-read localStorage, e.g. after the provider widget finishes in
    /// another tab.
    pub fn reload(&self) {
        self.session.set(load());
    }

    pub fn sign_out(&self) {
        clear();
        self.session.set(None);
    }
}

pub fn use_session() -> SessionStore {
    expect_context::<SessionStore>()
}
