//! Store location configuration.
//!
//! # Responsibility
//! - Describe where the snapshot and recording blobs live.
//! - Provide the conventional defaults used by the app.
//!
//! # Invariants
//! - A config without `base_dir` never touches the file system.

use crate::model::item::ItemId;
use std::path::{Path, PathBuf};

/// Default snapshot file name inside the base directory.
pub const SNAPSHOT_FILE_NAME: &str = "store.json";
/// Default extension of recording blob files.
pub const BLOB_EXTENSION: &str = "m4a";

/// Configuration consumed by [`crate::Store::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the snapshot and blobs. `None` means in-memory only.
    pub base_dir: Option<PathBuf>,
    pub snapshot_file_name: String,
    /// Blob extension without the leading dot.
    pub blob_extension: String,
    /// Location reported for every recording when `base_dir` is unset.
    ///
    /// Preview contexts point this at a bundled sample file. It is never
    /// deleted.
    pub placeholder: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            snapshot_file_name: SNAPSHOT_FILE_NAME.to_string(),
            blob_extension: BLOB_EXTENSION.to_string(),
            placeholder: None,
        }
    }
}

impl StoreConfig {
    /// Config rooted at one directory with default file names.
    pub fn at(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: Some(base_dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn with_snapshot_file_name(mut self, name: impl Into<String>) -> Self {
        self.snapshot_file_name = name.into();
        self
    }

    pub fn with_blob_extension(mut self, extension: impl Into<String>) -> Self {
        self.blob_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl AsRef<Path>) -> Self {
        self.placeholder = Some(placeholder.as_ref().to_path_buf());
        self
    }

    /// Absolute snapshot path, if persistence is enabled.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.base_dir
            .as_ref()
            .map(|dir| dir.join(&self.snapshot_file_name))
    }

    /// Blob path derived from a recording id, or the placeholder.
    pub fn blob_path(&self, id: ItemId) -> Option<PathBuf> {
        match &self.base_dir {
            Some(dir) => Some(dir.join(self.blob_file_name(id))),
            None => self.placeholder.clone(),
        }
    }

    /// `<uuid>.<ext>` file name for one recording.
    pub fn blob_file_name(&self, id: ItemId) -> String {
        format!("{}.{}", id.hyphenated().to_string().to_uppercase(), self.blob_extension)
    }
}
