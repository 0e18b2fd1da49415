//! Item domain model.
//!
//! # Responsibility
//! - Define the two node variants of the content tree: folders and recordings.
//! - Provide constructors for detached items that callers later attach.
//!
//! # Invariants
//! - `id` is stable for the item lifetime and never reused for another item.
//! - `parent` is a non-owning id link; the tree arena owns every node.
//! - A freshly constructed folder has empty `contents`.

use uuid::Uuid;

/// Stable identifier for every folder and recording.
pub type ItemId = Uuid;

/// Discriminant of [`Item`] without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Ordered container node.
    Folder,
    /// Leaf node backed by one audio blob.
    Recording,
}

impl ItemKind {
    /// Stable lowercase label used in log metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Recording => "recording",
        }
    }
}

/// Ordered container of child item ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) parent: Option<ItemId>,
    pub(crate) contents: Vec<ItemId>,
}

impl Folder {
    /// Stable folder id.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning folder id, `None` for the root or a detached folder.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Child ids in display order.
    pub fn contents(&self) -> &[ItemId] {
        &self.contents
    }

    /// Position of one child, if present.
    pub fn index_of(&self, child: ItemId) -> Option<usize> {
        self.contents.iter().position(|id| *id == child)
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }
}

/// Leaf node whose audio payload lives in an external blob addressed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) parent: Option<ItemId>,
}

impl Recording {
    /// Stable recording id; also the blob file stem.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning folder id, `None` when detached.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }
}

/// Any node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Folder(Folder),
    Recording(Recording),
}

impl Item {
    /// Creates a detached, empty folder with a generated id.
    pub fn new_folder(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), ItemKind::Folder, name)
    }

    /// Creates a detached recording with a generated id.
    ///
    /// The recorder writes audio to the blob location derived from this id
    /// before or after the item is attached; the tree never reads the blob.
    pub fn new_recording(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), ItemKind::Recording, name)
    }

    /// Creates a detached item with a caller-provided stable id.
    ///
    /// Used by import and snapshot decode paths where identity already exists.
    pub fn with_id(id: ItemId, kind: ItemKind, name: impl Into<String>) -> Self {
        let name = name.into();
        match kind {
            ItemKind::Folder => Self::Folder(Folder {
                id,
                name,
                parent: None,
                contents: Vec::new(),
            }),
            ItemKind::Recording => Self::Recording(Recording {
                id,
                name,
                parent: None,
            }),
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            Self::Folder(folder) => folder.id,
            Self::Recording(recording) => recording.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Recording(recording) => &recording.name,
        }
    }

    pub fn parent(&self) -> Option<ItemId> {
        match self {
            Self::Folder(folder) => folder.parent,
            Self::Recording(recording) => recording.parent,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Folder(_) => ItemKind::Folder,
            Self::Recording(_) => ItemKind::Recording,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Recording(_) => None,
        }
    }

    pub fn as_recording(&self) -> Option<&Recording> {
        match self {
            Self::Folder(_) => None,
            Self::Recording(recording) => Some(recording),
        }
    }

    /// Returns whether this item is currently linked under a folder.
    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    /// Lightweight copy of identity fields for event payloads.
    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id(),
            kind: self.kind(),
            name: self.name().to_string(),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Folder(folder) => folder.name = name,
            Self::Recording(recording) => recording.name = name,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ItemId>) {
        match self {
            Self::Folder(folder) => folder.parent = parent,
            Self::Recording(recording) => recording.parent = parent,
        }
    }

    pub(crate) fn folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Recording(_) => None,
        }
    }
}

/// Identity snapshot of one item at the time an event was produced.
///
/// Removed items no longer exist in the tree, so events carry this copy
/// instead of a live reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
}
