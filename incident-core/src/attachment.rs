//! Files attached to an incident.

use crate::user::User;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    /// Direct object-store URL, already scoped to the caller's org.
    pub file_url: String,
    /// Display name of the uploader as resolved by the backend.
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub created_at: String,
}

impl Attachment {
    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.file_name)
    }

    /// Admins may remove anything; everyone else only their own uploads.
    pub fn deletable_by(&self, user: &User) -> bool {
        user.role.can_delete_any_attachment() || self.uploaded_by == user.full_name
    }
}

/// Coarse file class used to pick a list icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Other,
}

impl FileKind {
    pub fn from_name(name: &str) -> FileKind {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => FileKind::Image,
            "pdf" => FileKind::Pdf,
            _ => FileKind::Other,
        }
    }
}
