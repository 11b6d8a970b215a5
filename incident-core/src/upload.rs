//! Attachment upload lifecycle.
//!
//! Uploads run in three phases: ask the API to sign the upload, POST the
//! bytes to object storage, then confirm the stored key back to the API.
//! `UploadPhase` models that lifecycle as explicit states so a view can
//! render exactly one of them, and so a failure always carries the
//! message of the phase that broke.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hard client-side cap. Files at or under this size may enter the
/// machine; anything larger is rejected before a single request is made.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const OVERSIZE_MESSAGE: &str = "File is too large (Max 10MB)";
pub const SIGN_FAILED: &str = "Failed to get presigned URL";
pub const STORE_FAILED: &str = "File upload failed";
pub const STORE_NETWORK_FAILED: &str = "Network error during file upload";
pub const CONFIRM_FAILED: &str = "Failed to confirm file upload";

pub fn fits_size_limit(bytes: u64) -> bool {
    bytes <= MAX_ATTACHMENT_BYTES
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    /// Waiting for the API to sign the upload.
    Signing,
    /// Bytes in flight to object storage. Progress is whole percent.
    Uploading { progress: u8 },
    /// Stored; waiting for the API to record the attachment.
    Saving,
    Success,
    Error { message: String },
}

impl UploadPhase {
    /// A request for this upload is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            UploadPhase::Signing | UploadPhase::Uploading { .. } | UploadPhase::Saving
        )
    }

    /// A new upload may begin. Busy phases refuse re-entry so a second
    /// file selection cannot corrupt an upload already in flight.
    pub fn can_start(&self) -> bool {
        !self.is_busy()
    }

    /// What a progress bar should show for this phase.
    pub fn percent(&self) -> u8 {
        match self {
            UploadPhase::Idle | UploadPhase::Signing | UploadPhase::Error { .. } => 0,
            UploadPhase::Uploading { progress } => *progress,
            UploadPhase::Saving | UploadPhase::Success => 100,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UploadPhase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Begin a new upload. Legal from any non-busy phase.
    pub fn start(&self) -> Option<UploadPhase> {
        self.can_start().then_some(UploadPhase::Signing)
    }

    /// The API returned a signed destination.
    pub fn signed(&self) -> Option<UploadPhase> {
        matches!(self, UploadPhase::Signing).then_some(UploadPhase::Uploading { progress: 0 })
    }

    /// A storage progress event landed. Progress never moves backwards
    /// and an unknown total leaves it where it was.
    pub fn progressed(&self, loaded: u64, total: u64) -> Option<UploadPhase> {
        let UploadPhase::Uploading { progress } = self else {
            return None;
        };
        let next = if total == 0 {
            *progress
        } else {
            let pct = ((loaded as f64 / total as f64) * 100.0).round() as u8;
            pct.clamp(0, 100).max(*progress)
        };
        Some(UploadPhase::Uploading { progress: next })
    }

    /// Storage accepted the bytes.
    pub fn stored(&self) -> Option<UploadPhase> {
        matches!(self, UploadPhase::Uploading { .. }).then_some(UploadPhase::Saving)
    }

    /// The API recorded the attachment.
    pub fn confirmed(&self) -> Option<UploadPhase> {
        matches!(self, UploadPhase::Saving).then_some(UploadPhase::Success)
    }

    /// Fail the upload. Legal from any busy phase.
    pub fn failed(&self, message: impl Into<String>) -> Option<UploadPhase> {
        self.is_busy().then(|| UploadPhase::Error {
            message: message.into(),
        })
    }

    pub fn reset(&self) -> UploadPhase {
        UploadPhase::Idle
    }
}

impl Default for UploadPhase {
    fn default() -> Self {
        UploadPhase::Idle
    }
}

/// Body for `POST /incidents/{id}/attachments/sign`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignAttachment {
    pub file_name: String,
    pub file_type: String,
}

/// Response to a sign request: where to POST the bytes and the key to
/// hand back on completion.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SignedUpload {
    pub data: PresignedPost,
    pub file_key: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PresignedPost {
    pub url: String,
    /// Form fields the store requires ahead of the file part.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// Body for `POST /incidents/{id}/attachments/complete`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompleteAttachment {
    pub file_name: String,
    pub file_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_gate_admits_exactly_ten_mib() {
        assert!(fits_size_limit(0));
        assert!(fits_size_limit(MAX_ATTACHMENT_BYTES));
        assert!(!fits_size_limit(MAX_ATTACHMENT_BYTES + 1));
    }

    #[test]
    fn happy_path_walks_every_phase_in_order() {
        let phase = UploadPhase::Idle;
        let phase = phase.start().unwrap();
        assert_eq!(phase, UploadPhase::Signing);
        let phase = phase.signed().unwrap();
        assert_eq!(phase, UploadPhase::Uploading { progress: 0 });
        let phase = phase.progressed(512, 1024).unwrap();
        assert_eq!(phase, UploadPhase::Uploading { progress: 50 });
        let phase = phase.stored().unwrap();
        assert_eq!(phase, UploadPhase::Saving);
        let phase = phase.confirmed().unwrap();
        assert_eq!(phase, UploadPhase::Success);
    }

    #[test]
    fn progress_rounds_clamps_and_never_regresses() {
        let phase = UploadPhase::Uploading { progress: 0 };
        assert_eq!(phase.progressed(1, 3), Some(UploadPhase::Uploading { progress: 33 }));
        assert_eq!(phase.progressed(2, 3), Some(UploadPhase::Uploading { progress: 67 }));

        let far = UploadPhase::Uploading { progress: 80 };
        assert_eq!(far.progressed(100, 1024), Some(UploadPhase::Uploading { progress: 80 }));
        assert_eq!(far.progressed(0, 0), Some(UploadPhase::Uploading { progress: 80 }));
        assert_eq!(far.progressed(4096, 1024), Some(UploadPhase::Uploading { progress: 100 }));
    }

    #[test]
    fn busy_phases_refuse_a_second_start() {
        assert_eq!(UploadPhase::Signing.start(), None);
        assert_eq!(UploadPhase::Uploading { progress: 10 }.start(), None);
        assert_eq!(UploadPhase::Saving.start(), None);
    }

    #[test]
    fn terminal_phases_allow_a_fresh_start() {
        assert!(UploadPhase::Success.start().is_some());
        let failed = UploadPhase::Error {
            message: SIGN_FAILED.to_string(),
        };
        assert!(failed.start().is_some());
    }

    #[test]
    fn each_busy_phase_can_fail_with_its_own_message() {
        for (phase, message) in [
            (UploadPhase::Signing, SIGN_FAILED),
            (UploadPhase::Uploading { progress: 40 }, STORE_NETWORK_FAILED),
            (UploadPhase::Saving, CONFIRM_FAILED),
        ] {
            let failed = phase.failed(message).unwrap();
            assert_eq!(failed.error_message(), Some(message));
        }
    }

    #[test]
    fn idle_and_terminal_phases_cannot_fail() {
        assert_eq!(UploadPhase::Idle.failed("x"), None);
        assert_eq!(UploadPhase::Success.failed("x"), None);
    }

    #[test]
    fn out_of_order_callbacks_are_rejected() {
        assert_eq!(UploadPhase::Idle.signed(), None);
        assert_eq!(UploadPhase::Signing.stored(), None);
        assert_eq!(UploadPhase::Uploading { progress: 10 }.confirmed(), None);
        assert_eq!(UploadPhase::Saving.progressed(1, 2), None);
    }

    #[test]
    fn percent_tracks_the_visible_phase() {
        assert_eq!(UploadPhase::Idle.percent(), 0);
        assert_eq!(UploadPhase::Uploading { progress: 42 }.percent(), 42);
        assert_eq!(UploadPhase::Saving.percent(), 100);
        assert_eq!(UploadPhase::Success.percent(), 100);
    }

    #[test]
    fn sign_bodies_and_responses_use_the_wire_names() {
        let body = serde_json::to_string(&SignAttachment {
            file_name: "trace.png".to_string(),
            file_type: "image/png".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"file_name":"trace.png","file_type":"image/png"}"#);

        let signed: SignedUpload = serde_json::from_str(
            r#"{
                "data": {
                    "url": "https://store.example.com/bucket",
                    "fields": {"key": "org/inc/trace.png", "policy": "abc"}
                },
                "file_key": "org/inc/trace.png"
            }"#,
        )
        .unwrap();
        assert_eq!(signed.file_key, "org/inc/trace.png");
        assert_eq!(signed.data.fields.len(), 2);

        let bare: SignedUpload = serde_json::from_str(
            r#"{"data": {"url": "https://store.example.com/bucket"}, "file_key": "k"}"#,
        )
        .unwrap();
        assert!(bare.data.fields.is_empty());
    }
}
