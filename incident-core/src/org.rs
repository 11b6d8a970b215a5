//! Organization profile and first-run registration.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OrgProfile {
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Body for `POST /orgs/register`, the one-time step that attaches the
/// signed-in account to a new organization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterOrg {
    pub name: String,
}

impl RegisterOrg {
    pub fn new(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Organization name is required".to_string());
        }
        Ok(RegisterOrg {
            name: name.to_string(),
        })
    }
}
