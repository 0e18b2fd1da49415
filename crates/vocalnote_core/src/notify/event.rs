//! Store change events.
//!
//! # Responsibility
//! - Describe one structural tree mutation with enough data for an
//!   incremental view update.
//!
//! # Invariants
//! - Indices refer to positions inside `parent` at the moment of the change.
//! - `subject` is a copy; removed items no longer resolve in the tree.

use super::Notification;
use crate::model::item::{ItemId, ItemSummary};

/// Kind discriminant of a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Removed,
    Renamed,
}

impl ChangeKind {
    /// Stable lowercase label used in log metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
        }
    }
}

/// Structural change published after the tree was mutated and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// `subject` was appended to `parent` at `new_index`.
    Added {
        subject: ItemSummary,
        parent: ItemId,
        new_index: usize,
    },
    /// `subject` was removed from `parent`, where it sat at `old_index`.
    Removed {
        subject: ItemSummary,
        parent: ItemId,
        old_index: usize,
    },
    /// `subject` was renamed and re-sorted from `old_index` to `new_index`.
    Renamed {
        subject: ItemSummary,
        parent: ItemId,
        old_index: usize,
        new_index: usize,
    },
}

impl ChangeEvent {
    pub fn subject(&self) -> &ItemSummary {
        match self {
            Self::Added { subject, .. }
            | Self::Removed { subject, .. }
            | Self::Renamed { subject, .. } => subject,
        }
    }

    /// Folder whose contents changed.
    pub fn parent(&self) -> ItemId {
        match self {
            Self::Added { parent, .. }
            | Self::Removed { parent, .. }
            | Self::Renamed { parent, .. } => *parent,
        }
    }

    /// Returns whether a view showing `folder` (or `folder` itself as the
    /// subject) is affected.
    ///
    /// Subscribers that display something else should fall back to a full
    /// refresh or ignore the event.
    pub fn concerns(&self, folder: ItemId) -> bool {
        self.parent() == folder || self.subject().id == folder
    }
}

impl Notification for ChangeEvent {
    type Kind = ChangeKind;

    fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Renamed { .. } => ChangeKind::Renamed,
        }
    }
}
