//! Content store: tree ownership, persistence and change notification.
//!
//! # Responsibility
//! - Own the root folder and route every mutation through one place.
//! - Persist the full tree after each mutation and publish change events.
//! - Map recordings to blob files under the base directory.
//!
//! # Invariants
//! - The in-memory tree is authoritative; a failed save is logged, never
//!   rolled back and never returned from a mutation.
//! - Events are published only after the mutation and the save attempt.
//! - Startup never fails: unreadable snapshots yield an empty root.
//! - Logs carry ids and counts only, never item names.

mod blob;

use crate::config::StoreConfig;
use crate::model::item::{Folder, Item, ItemId, ItemKind, ItemSummary};
use crate::model::tree::{Tree, TreeError};
use crate::notify::event::{ChangeEvent, ChangeKind};
use crate::notify::{Notification, Notifier, SubscriptionId};
use crate::snapshot::{self, SnapshotError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Tree-level failure (unknown id, wrong kind, duplicate, cycle).
    Tree(TreeError),
    /// Explicit snapshot flush failed.
    Snapshot(SnapshotError),
}

impl StoreError {
    /// Returns whether the failure means "no such item or path".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Tree(TreeError::NotFound(_)) | Self::Tree(TreeError::PathNotFound(_))
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<TreeError> for StoreError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

impl From<SnapshotError> for StoreError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// Owner of the content tree.
///
/// Constructed explicitly and passed to callers; every mutation takes
/// `&mut self`, so there is exactly one mutator at a time.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    tree: Tree,
    notifier: Notifier<ChangeEvent>,
}

impl Store {
    /// Opens a store, loading the snapshot when one is readable.
    ///
    /// # Side effects
    /// - Reads `<base_dir>/<snapshot_file_name>` when `base_dir` is set.
    /// - Emits `store_open` logging events with status and item count.
    pub fn open(config: StoreConfig) -> Self {
        let started_at = Instant::now();
        let tree = match config.snapshot_path() {
            None => {
                info!("event=store_open module=store status=ok mode=memory");
                Tree::empty()
            }
            Some(path) => match snapshot::read_snapshot(&path) {
                Ok(Some(tree)) => {
                    info!(
                        "event=store_open module=store status=ok mode=file items={} duration_ms={}",
                        tree.len(),
                        started_at.elapsed().as_millis()
                    );
                    tree
                }
                Ok(None) => {
                    info!("event=store_open module=store status=ok mode=file snapshot=absent");
                    Tree::empty()
                }
                Err(err) => {
                    error!(
                        "event=store_open module=store status=error mode=file error_code=snapshot_decode_failed error={}",
                        err
                    );
                    Tree::empty()
                }
            },
        };

        Self {
            config,
            tree,
            notifier: Notifier::new(),
        }
    }

    /// Opens a store that never touches the file system.
    pub fn in_memory() -> Self {
        Self::open(StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read-only view of the whole tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> &Folder {
        self.tree.root()
    }

    pub fn root_id(&self) -> ItemId {
        self.tree.root_id()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.tree.get(id)
    }

    /// Registers a handler for every change event.
    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&ChangeEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(handler)
    }

    /// Registers a handler for one change kind.
    pub fn subscribe_kind(
        &mut self,
        kind: ChangeKind,
        handler: impl FnMut(&ChangeEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe_kind(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Appends a detached item to a folder.
    ///
    /// Returns the new index. The folder is not re-sorted.
    ///
    /// # Errors
    /// - `DuplicateItem` when the id is already in the tree.
    /// - `NonEmptyFolder` when a folder arrives with contents.
    /// - `NotFound` / `NotAFolder` for an invalid `folder_id`.
    pub fn add(&mut self, folder_id: ItemId, item: Item) -> StoreResult<usize> {
        let item_id = item.id();
        let kind = item.kind();
        let new_index = match self.tree.attach(folder_id, item) {
            Ok(index) => index,
            Err(err) => {
                error!(
                    "event=item_add module=store status=error item_id={} error={}",
                    item_id, err
                );
                return Err(err.into());
            }
        };
        debug!(
            "event=item_add module=store status=ok item_id={} kind={} index={}",
            item_id,
            kind.as_str(),
            new_index
        );

        let subject = self.summary_of(item_id)?;
        self.commit(vec![ChangeEvent::Added {
            subject,
            parent: folder_id,
            new_index,
        }]);
        Ok(new_index)
    }

    /// Removes a direct child of a folder, cascading into sub-folders.
    ///
    /// Returns the detached item, or `None` without side effects when the
    /// item is not a child of the folder. Blobs of every removed recording
    /// are deleted best-effort.
    pub fn remove(&mut self, folder_id: ItemId, item_id: ItemId) -> StoreResult<Option<Item>> {
        let Some(detached) = self.tree.detach(folder_id, item_id)? else {
            debug!(
                "event=item_remove module=store status=skip item_id={} reason=not_a_child",
                item_id
            );
            return Ok(None);
        };

        for node in &detached.removed {
            if node.summary.kind == ItemKind::Recording {
                self.remove_blob_for(node.summary.id);
            }
        }
        debug!(
            "event=item_remove module=store status=ok item_id={} removed={}",
            item_id,
            detached.removed.len()
        );

        let events = detached
            .removed
            .into_iter()
            .map(|node| ChangeEvent::Removed {
                subject: node.summary,
                parent: node.parent,
                old_index: node.old_index,
            })
            .collect();
        self.commit(events);
        Ok(Some(detached.item))
    }

    /// Renames an item and re-sorts its parent.
    ///
    /// Renaming the root only changes its name; nothing is saved or published.
    pub fn set_name(&mut self, item_id: ItemId, name: impl Into<String>) -> StoreResult<()> {
        let Some(resorted) = self.tree.rename(item_id, name)? else {
            return Ok(());
        };
        debug!(
            "event=item_rename module=store status=ok item_id={} old_index={} new_index={}",
            item_id, resorted.old_index, resorted.new_index
        );

        let subject = self.summary_of(item_id)?;
        self.commit(vec![ChangeEvent::Renamed {
            subject,
            parent: resorted.parent,
            old_index: resorted.old_index,
            new_index: resorted.new_index,
        }]);
        Ok(())
    }

    /// Moves an item to the end of another folder, keeping its id and blob.
    ///
    /// Publishes `Removed` for the old parent followed by `Added` for the new
    /// one. Returns the new index.
    pub fn move_item(&mut self, item_id: ItemId, new_parent: ItemId) -> StoreResult<usize> {
        let moved = self.tree.move_item(item_id, new_parent)?;
        debug!(
            "event=item_move module=store status=ok item_id={} old_index={} new_index={}",
            item_id, moved.old_index, moved.new_index
        );

        let subject = self.summary_of(item_id)?;
        self.commit(vec![
            ChangeEvent::Removed {
                subject: subject.clone(),
                parent: moved.old_parent,
                old_index: moved.old_index,
            },
            ChangeEvent::Added {
                subject,
                parent: moved.new_parent,
                new_index: moved.new_index,
            },
        ]);
        Ok(moved.new_index)
    }

    /// Resolves an id-path that starts at the root.
    pub fn lookup(&self, path: &[ItemId]) -> StoreResult<&Item> {
        self.tree.lookup(path).map_err(Into::into)
    }

    /// Root-to-item id-path used for state restoration.
    pub fn id_path(&self, item_id: ItemId) -> StoreResult<Vec<ItemId>> {
        self.tree.id_path(item_id).map_err(Into::into)
    }

    /// Writes the snapshot now and reports failure to the caller.
    ///
    /// A store without `base_dir` succeeds without writing.
    pub fn save_snapshot(&self) -> StoreResult<()> {
        let Some(path) = self.config.snapshot_path() else {
            return Ok(());
        };
        snapshot::write_snapshot(&path, &self.tree)?;
        Ok(())
    }

    fn commit(&mut self, events: Vec<ChangeEvent>) {
        self.persist();
        for event in &events {
            let delivered = self.notifier.publish(event);
            debug!(
                "event=change_publish module=store status=ok kind={} subscribers={}",
                event.kind().as_str(),
                delivered
            );
        }
    }

    fn persist(&self) {
        let Some(path) = self.config.snapshot_path() else {
            return;
        };
        let started_at = Instant::now();
        match snapshot::write_snapshot(&path, &self.tree) {
            Ok(bytes) => info!(
                "event=store_save module=store status=ok items={} bytes={} duration_ms={}",
                self.tree.len(),
                bytes,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error duration_ms={} error_code=snapshot_write_failed error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
    }

    fn summary_of(&self, item_id: ItemId) -> StoreResult<ItemSummary> {
        self.tree
            .get(item_id)
            .map(Item::summary)
            .ok_or_else(|| {
                warn!(
                    "event=item_summary module=store status=error item_id={}",
                    item_id
                );
                StoreError::Tree(TreeError::NotFound(item_id))
            })
    }
}
