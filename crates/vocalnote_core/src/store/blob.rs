//! Recording blob addressing and best-effort cleanup.

use super::Store;
use crate::model::item::{ItemId, ItemKind, Recording};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

impl Store {
    /// Location of the audio blob for one recording.
    ///
    /// `<base_dir>/<UUID>.<ext>`, or the configured placeholder when the
    /// store has no base directory.
    pub fn blob_location(&self, recording: &Recording) -> Option<PathBuf> {
        self.config.blob_path(recording.id())
    }

    /// Deletes the blob of one recording. Missing files and I/O errors are
    /// logged and ignored; the placeholder is never deleted.
    pub fn remove_blob(&self, recording: &Recording) {
        self.remove_blob_for(recording.id());
    }

    pub(super) fn remove_blob_for(&self, id: ItemId) {
        let Some(path) = self.config.blob_path(id) else {
            return;
        };
        if self.config.placeholder.as_ref() == Some(&path) {
            return;
        }
        match fs::remove_file(&path) {
            Ok(()) => info!("event=blob_remove module=store status=ok item_id={}", id),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                "event=blob_remove module=store status=error item_id={} error={}",
                id, err
            ),
        }
    }

    /// Blob files in the base directory that no recording references.
    ///
    /// Left behind when a blob removal failed or a recorder wrote a file for
    /// an item that was never attached. Sorted by path.
    pub fn orphaned_blobs(&self) -> Vec<PathBuf> {
        let Some(dir) = self.config.base_dir.as_ref() else {
            return Vec::new();
        };
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "event=blob_scan module=store status=error error={}",
                    err
                );
                return Vec::new();
            }
        };

        let mut orphans: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| match self.blob_id(path) {
                Some(id) => !matches!(
                    self.tree.get(id).map(|item| item.kind()),
                    Some(ItemKind::Recording)
                ),
                None => false,
            })
            .collect();
        orphans.sort();
        orphans
    }

    /// Deletes every orphaned blob and returns how many were removed.
    ///
    /// A recorder writes its file before the recording is added, so a capture
    /// in progress looks orphaned. Pass its id in `keep` to spare its blob.
    pub fn prune_orphaned_blobs(&self, keep: &[ItemId]) -> usize {
        let mut removed = 0;
        let orphans = self
            .orphaned_blobs()
            .into_iter()
            .filter(|path| self.blob_id(path).map_or(true, |id| !keep.contains(&id)));
        for path in orphans {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) => warn!(
                    "event=blob_prune module=store status=error error={}",
                    err
                ),
            }
        }
        info!(
            "event=blob_prune module=store status=ok removed={}",
            removed
        );
        removed
    }

    fn blob_id(&self, path: &Path) -> Option<ItemId> {
        let extension = path.extension()?.to_str()?;
        if !extension.eq_ignore_ascii_case(&self.config.blob_extension) {
            return None;
        }
        Uuid::parse_str(path.file_stem()?.to_str()?).ok()
    }
}
