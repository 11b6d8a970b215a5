//! Platform-independent logic for the IncidentFlow client: the records
//! the coordination API serves, the dashboard filter engine, the
//! attachment upload state machine, and the request bodies for every
//! mutation flow. Nothing here touches the DOM, so the whole crate
//! compiles and tests natively.

pub mod actions;
pub mod attachment;
pub mod event;
pub mod filter;
pub mod incident;
pub mod org;
pub mod stats;
pub mod timestamp;
pub mod upload;
pub mod user;

pub use attachment::{Attachment, FileKind};
pub use event::{EventKind, IncidentEvent};
pub use filter::{filter_incidents, FilterState};
pub use incident::{DashboardTallies, Incident, Severity};
pub use stats::{AdminStats, Analytics, AnalyticsWindow, UserPerformance};
pub use upload::UploadPhase;
pub use user::{Role, User, UserDirectory};
