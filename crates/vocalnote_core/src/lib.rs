//! Core domain logic for the vocalnote voice-memo app.
//! This crate is the single source of truth for content tree invariants.

pub mod config;
pub mod format;
pub mod logging;
pub mod model;
pub mod notify;
pub mod snapshot;
pub mod store;

pub use config::{StoreConfig, BLOB_EXTENSION, SNAPSHOT_FILE_NAME};
pub use format::format_duration;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Folder, Item, ItemId, ItemKind, ItemSummary, Recording};
pub use model::tree::{Tree, TreeError, TreeResult};
pub use notify::event::{ChangeEvent, ChangeKind};
pub use notify::{Notification, Notifier, SubscriptionId};
pub use snapshot::SnapshotError;
pub use store::{Store, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
