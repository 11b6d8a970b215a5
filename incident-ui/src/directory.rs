//! Shared cache of the org member directory.
//!
//! Fetched once per sign-in and refreshed explicitly after any admin
//! edit. A failed refresh keeps the previous snapshot so name lookups
//! never regress to raw ids mid-session.

use incident_core::user::UserDirectory;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;

#[derive(Clone, Copy)]
pub struct DirectoryStore {
    directory: RwSignal<UserDirectory>,
}

impl DirectoryStore {
    pub fn init() -> Self {
        DirectoryStore {
            directory: create_rw_signal(UserDirectory::default()),
        }
    }

    pub fn directory(&self) -> RwSignal<UserDirectory> {
        self.directory
    }

    pub fn display_name(&self, id: Option<&str>) -> String {
        self.directory.with(|dir| dir.display_name(id))
    }

    pub fn actor_label(&self, id: Option<&str>) -> String {
        self.directory.with(|dir| dir.actor_label(id))
    }

    pub fn refresh(&self) {
        let directory = self.directory;
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(users) => directory.set(UserDirectory::new(users)),
                Err(err) => log::warn!("member directory refresh failed: {err}"),
            }
        });
    }
}

pub fn use_directory() -> DirectoryStore {
    expect_context::<DirectoryStore>()
}
