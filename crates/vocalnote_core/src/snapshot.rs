//! JSON snapshot codec for the content tree.
//!
//! # Responsibility
//! - Map the tree to and from the `store.json` wire shape.
//! - Write snapshots with whole-file atomic replace.
//!
//! # Invariants
//! - Folders encode as `{name, uuid, contents}`, recordings as `{name, uuid}`.
//! - Each content entry carries exactly one of `folder` / `recording`.
//! - Decoding stops at the first entry carrying neither key, so legacy files
//!   that end `contents` with an empty `{}` decode unchanged.
//! - Decoded parent links are rebuilt from nesting, never read from the file.

use crate::model::item::{Item, ItemId, ItemKind};
use crate::model::tree::{Tree, TreeError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

/// Errors from snapshot encode/decode and file access.
#[derive(Debug)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    Io(io::Error),
    /// Payload is not valid snapshot JSON.
    Json(serde_json::Error),
    /// Payload names the same id twice.
    DuplicateId(ItemId),
    /// Payload could not be rebuilt into a consistent tree.
    Tree(TreeError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot io error: {err}"),
            Self::Json(err) => write!(f, "invalid snapshot payload: {err}"),
            Self::DuplicateId(id) => write!(f, "snapshot contains duplicate id: {id}"),
            Self::Tree(err) => write!(f, "inconsistent snapshot tree: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
            Self::Tree(err) => Some(err),
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Wire record for one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub name: String,
    pub uuid: ItemId,
    #[serde(default)]
    pub contents: Vec<EntryRecord>,
}

/// Wire record for one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRecord {
    pub name: String,
    pub uuid: ItemId,
}

/// Wrapper object identifying the variant of one content entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<RecordingRecord>,
}

impl EntryRecord {
    fn folder(record: FolderRecord) -> Self {
        Self {
            folder: Some(record),
            recording: None,
        }
    }

    fn recording(record: RecordingRecord) -> Self {
        Self {
            folder: None,
            recording: Some(record),
        }
    }
}

/// Encodes the full tree rooted at the root folder.
pub fn encode_tree(tree: &Tree) -> FolderRecord {
    encode_folder(tree, tree.root_id())
}

fn encode_folder(tree: &Tree, folder_id: ItemId) -> FolderRecord {
    let (name, contents) = match tree.folder(folder_id) {
        Ok(folder) => (folder.name().to_string(), folder.contents().to_vec()),
        Err(_) => (String::new(), Vec::new()),
    };
    let contents = contents
        .into_iter()
        .filter_map(|child| tree.get(child))
        .map(|child| match child {
            Item::Folder(folder) => EntryRecord::folder(encode_folder(tree, folder.id())),
            Item::Recording(recording) => EntryRecord::recording(RecordingRecord {
                name: recording.name().to_string(),
                uuid: recording.id(),
            }),
        })
        .collect();
    FolderRecord {
        name,
        uuid: folder_id,
        contents,
    }
}

/// Rebuilds a tree from a decoded root record.
pub fn decode_tree(root: FolderRecord) -> Result<Tree, SnapshotError> {
    let mut tree = Tree::with_root(root.uuid, root.name);
    attach_entries(&mut tree, root.uuid, root.contents)?;
    Ok(tree)
}

fn attach_entries(
    tree: &mut Tree,
    folder_id: ItemId,
    entries: Vec<EntryRecord>,
) -> Result<(), SnapshotError> {
    for entry in entries {
        match entry {
            EntryRecord {
                folder: Some(folder),
                ..
            } => {
                let item = Item::with_id(folder.uuid, ItemKind::Folder, folder.name);
                attach(tree, folder_id, item)?;
                attach_entries(tree, folder.uuid, folder.contents)?;
            }
            EntryRecord {
                recording: Some(recording),
                ..
            } => {
                let item = Item::with_id(recording.uuid, ItemKind::Recording, recording.name);
                attach(tree, folder_id, item)?;
            }
            EntryRecord {
                folder: None,
                recording: None,
            } => break,
        }
    }
    Ok(())
}

fn attach(tree: &mut Tree, folder_id: ItemId, item: Item) -> Result<(), SnapshotError> {
    match tree.attach(folder_id, item) {
        Ok(_) => Ok(()),
        Err(TreeError::DuplicateItem(id)) => Err(SnapshotError::DuplicateId(id)),
        Err(err) => Err(SnapshotError::Tree(err)),
    }
}

/// Parses snapshot JSON. Blank input yields `Ok(None)`.
pub fn from_json(payload: &str) -> Result<Option<Tree>, SnapshotError> {
    if payload.trim().is_empty() {
        return Ok(None);
    }
    let root: FolderRecord = serde_json::from_str(payload)?;
    decode_tree(root).map(Some)
}

pub fn to_json(tree: &Tree) -> Result<Vec<u8>, SnapshotError> {
    Ok(serde_json::to_vec(&encode_tree(tree))?)
}

/// Reads a snapshot file. A missing or blank file yields `Ok(None)`.
pub fn read_snapshot(path: &Path) -> Result<Option<Tree>, SnapshotError> {
    match fs::read_to_string(path) {
        Ok(contents) => from_json(&contents),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Writes a snapshot file through a temporary sibling followed by rename.
pub fn write_snapshot(path: &Path, tree: &Tree) -> Result<usize, SnapshotError> {
    let payload = to_json(tree)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &payload)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(payload.len())
}
