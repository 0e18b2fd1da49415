//! Arena-backed content tree.
//!
//! # Responsibility
//! - Own every attached folder and recording, keyed by stable id.
//! - Apply structural mutations (attach, cascade detach, move, rename re-sort)
//!   without persistence or notification side effects.
//! - Resolve id-paths for state restoration.
//!
//! # Invariants
//! - Exactly one root folder; it has no parent and cannot be detached or moved.
//! - Ids are unique across the whole arena.
//! - Every id in a folder's `contents` resolves to a node whose `parent` is
//!   that folder, and every non-root node appears in exactly one `contents`.
//! - Re-sort is a stable ascending sort by name.

use super::item::{Folder, Item, ItemId, ItemKind, ItemSummary};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type used by tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors from tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Target item does not exist in the tree.
    NotFound(ItemId),
    /// Id-path does not resolve to an item.
    PathNotFound(Vec<ItemId>),
    /// Item exists but is a recording where a folder is required.
    NotAFolder(ItemId),
    /// An item with this id is already part of the tree.
    DuplicateItem(ItemId),
    /// Move would place a folder inside itself or one of its descendants.
    CycleDetected { item: ItemId, parent: ItemId },
    /// The root folder cannot be detached or moved.
    RootImmutable,
    /// A folder can only be attached while it has no contents.
    NonEmptyFolder(ItemId),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::PathNotFound(path) => write!(f, "no item at id-path of length {}", path.len()),
            Self::NotAFolder(id) => write!(f, "item is not a folder: {id}"),
            Self::DuplicateItem(id) => write!(f, "item already present in tree: {id}"),
            Self::CycleDetected { item, parent } => {
                write!(f, "move would create cycle: item {item} under parent {parent}")
            }
            Self::RootImmutable => write!(f, "root folder cannot be detached or moved"),
            Self::NonEmptyFolder(id) => write!(f, "folder must be empty to attach: {id}"),
        }
    }
}

impl Error for TreeError {}

/// One node removed by a cascade detach, in removal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode {
    pub summary: ItemSummary,
    /// Folder the node was removed from.
    pub parent: ItemId,
    /// Index the node had at the moment it was removed.
    pub old_index: usize,
}

/// Result of a cascade detach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    /// The detached top-level item. Folders come back empty.
    pub item: Item,
    /// Every removed node, descendants before their folder, the item last.
    pub removed: Vec<RemovedNode>,
}

/// Result of a rename that happened under a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resorted {
    pub parent: ItemId,
    pub old_index: usize,
    pub new_index: usize,
}

/// Result of moving an item between folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    pub old_parent: ItemId,
    pub old_index: usize,
    pub new_parent: ItemId,
    pub new_index: usize,
}

/// Content tree with one root folder and an id-keyed node arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: ItemId,
    nodes: HashMap<ItemId, Item>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::empty()
    }
}

impl Tree {
    /// Creates a tree holding only a fresh, unnamed root folder.
    pub fn empty() -> Self {
        Self::with_root(Uuid::new_v4(), "")
    }

    /// Creates a tree whose root has a caller-provided id and name.
    pub fn with_root(root_id: ItemId, name: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(root_id, Item::with_id(root_id, ItemKind::Folder, name));
        Self {
            root: root_id,
            nodes,
        }
    }

    pub fn root_id(&self) -> ItemId {
        self.root
    }

    pub fn root(&self) -> &Folder {
        match self.nodes.get(&self.root) {
            Some(Item::Folder(folder)) => folder,
            _ => unreachable!("tree root must be a folder"),
        }
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.root().is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.nodes.get(&id)
    }

    /// Loads one folder by id.
    pub fn folder(&self, id: ItemId) -> TreeResult<&Folder> {
        match self.nodes.get(&id) {
            Some(Item::Folder(folder)) => Ok(folder),
            Some(Item::Recording(_)) => Err(TreeError::NotAFolder(id)),
            None => Err(TreeError::NotFound(id)),
        }
    }

    /// Lists the children of one folder in display order.
    pub fn children(&self, folder_id: ItemId) -> TreeResult<Vec<&Item>> {
        let folder = self.folder(folder_id)?;
        Ok(folder
            .contents
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }

    /// Appends a detached item to the end of a folder without re-sorting.
    ///
    /// Returns the new index of the item. Folders must arrive empty; their
    /// children are attached one by one afterwards.
    pub fn attach(&mut self, folder_id: ItemId, mut item: Item) -> TreeResult<usize> {
        let item_id = item.id();
        if self.nodes.contains_key(&item_id) {
            return Err(TreeError::DuplicateItem(item_id));
        }
        if item.as_folder().is_some_and(|folder| !folder.is_empty()) {
            return Err(TreeError::NonEmptyFolder(item_id));
        }
        let folder = self.folder_mut(folder_id)?;
        folder.contents.push(item_id);
        let new_index = folder.contents.len() - 1;

        item.set_parent(Some(folder_id));
        self.nodes.insert(item_id, item);
        Ok(new_index)
    }

    /// Detaches one child of a folder together with its whole subtree.
    ///
    /// Returns `Ok(None)` when `item_id` is not a direct child of the folder.
    pub fn detach(&mut self, folder_id: ItemId, item_id: ItemId) -> TreeResult<Option<Detached>> {
        let Some(index) = self.folder(folder_id)?.index_of(item_id) else {
            return Ok(None);
        };
        let mut removed = Vec::new();
        let item = self.detach_at(folder_id, index, &mut removed)?;
        Ok(Some(Detached { item, removed }))
    }

    fn detach_at(
        &mut self,
        folder_id: ItemId,
        index: usize,
        removed: &mut Vec<RemovedNode>,
    ) -> TreeResult<Item> {
        let item_id = self.folder(folder_id)?.contents[index];
        if !self.nodes.contains_key(&item_id) {
            return Err(TreeError::NotFound(item_id));
        }

        // Children go first, always from the front of the shrinking list.
        while let Some(Item::Folder(child)) = self.nodes.get(&item_id) {
            if child.contents.is_empty() {
                break;
            }
            self.detach_at(item_id, 0, removed)?;
        }

        self.folder_mut(folder_id)?.contents.remove(index);
        let mut item = self
            .nodes
            .remove(&item_id)
            .ok_or(TreeError::NotFound(item_id))?;
        item.set_parent(None);
        removed.push(RemovedNode {
            summary: item.summary(),
            parent: folder_id,
            old_index: index,
        });
        Ok(item)
    }

    /// Changes one item's name and re-sorts its parent.
    ///
    /// Returns `None` when the item has no parent (the root).
    pub fn rename(&mut self, item_id: ItemId, name: impl Into<String>) -> TreeResult<Option<Resorted>> {
        let item = self
            .nodes
            .get_mut(&item_id)
            .ok_or(TreeError::NotFound(item_id))?;
        item.set_name(name.into());
        let Some(parent) = item.parent() else {
            return Ok(None);
        };
        let (old_index, new_index) = self.re_sort(parent, item_id)?;
        Ok(Some(Resorted {
            parent,
            old_index,
            new_index,
        }))
    }

    /// Stable-sorts a folder by name and reports where `changed` moved.
    pub fn re_sort(&mut self, folder_id: ItemId, changed: ItemId) -> TreeResult<(usize, usize)> {
        let folder = self.folder_mut(folder_id)?;
        let old_index = folder.index_of(changed).ok_or(TreeError::NotFound(changed))?;
        let mut contents = std::mem::take(&mut folder.contents);

        contents.sort_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        let new_index = contents
            .iter()
            .position(|id| *id == changed)
            .unwrap_or(old_index);

        self.folder_mut(folder_id)?.contents = contents;
        Ok((old_index, new_index))
    }

    /// Moves an attached item to the end of another folder, keeping its id.
    pub fn move_item(&mut self, item_id: ItemId, new_parent: ItemId) -> TreeResult<Moved> {
        if item_id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let old_parent = self
            .nodes
            .get(&item_id)
            .ok_or(TreeError::NotFound(item_id))?
            .parent()
            .ok_or(TreeError::NotFound(item_id))?;
        self.folder(new_parent)?;
        if self.is_self_or_descendant(new_parent, item_id) {
            return Err(TreeError::CycleDetected {
                item: item_id,
                parent: new_parent,
            });
        }

        let old_folder = self.folder_mut(old_parent)?;
        let old_index = old_folder
            .index_of(item_id)
            .ok_or(TreeError::NotFound(item_id))?;
        old_folder.contents.remove(old_index);

        let target = self.folder_mut(new_parent)?;
        target.contents.push(item_id);
        let new_index = target.contents.len() - 1;
        if let Some(item) = self.nodes.get_mut(&item_id) {
            item.set_parent(Some(new_parent));
        }

        Ok(Moved {
            old_parent,
            old_index,
            new_parent,
            new_index,
        })
    }

    /// Ids from the root down to `item_id`, inclusive.
    pub fn id_path(&self, item_id: ItemId) -> TreeResult<Vec<ItemId>> {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = Some(item_id);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                break;
            }
            let item = self.nodes.get(&current).ok_or(TreeError::NotFound(current))?;
            path.push(current);
            cursor = item.parent();
        }
        path.reverse();
        Ok(path)
    }

    /// Resolves an id-path that starts at the root.
    pub fn lookup(&self, path: &[ItemId]) -> TreeResult<&Item> {
        self.lookup_from(self.root, path)
            .ok_or_else(|| TreeError::PathNotFound(path.to_vec()))
    }

    /// Resolves an id-path that starts at `start`.
    ///
    /// A folder matches a single-element path equal to its own id, or
    /// descends into the child named by the second element. A recording
    /// matches only a single-element path equal to its id.
    pub fn lookup_from(&self, start: ItemId, path: &[ItemId]) -> Option<&Item> {
        let item = self.nodes.get(&start)?;
        match path {
            [only] => (*only == start).then_some(item),
            [first, second, ..] => {
                if *first != start {
                    return None;
                }
                let folder = item.as_folder()?;
                let child = folder.contents.iter().find(|id| **id == *second)?;
                self.lookup_from(*child, &path[1..])
            }
            [] => None,
        }
    }

    /// Pre-order traversal starting at the root, children in display order.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Every recording id in depth-first order.
    pub fn recording_ids(&self) -> Vec<ItemId> {
        self.iter_depth_first()
            .filter(|item| item.kind() == ItemKind::Recording)
            .map(Item::id)
            .collect()
    }

    fn folder_mut(&mut self, id: ItemId) -> TreeResult<&mut Folder> {
        match self.nodes.get_mut(&id) {
            Some(item) => item.folder_mut().ok_or(TreeError::NotAFolder(id)),
            None => Err(TreeError::NotFound(id)),
        }
    }

    fn name_of(&self, id: ItemId) -> &str {
        self.nodes.get(&id).map(Item::name).unwrap_or_default()
    }

    fn is_self_or_descendant(&self, candidate: ItemId, ancestor: ItemId) -> bool {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current) {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(Item::parent);
        }
        false
    }
}

/// Iterator returned by [`Tree::iter_depth_first`].
pub struct DepthFirst<'a> {
    tree: &'a Tree,
    stack: Vec<ItemId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(item) = self.tree.nodes.get(&id) else {
                continue;
            };
            if let Item::Folder(folder) = item {
                self.stack.extend(folder.contents.iter().rev().copied());
            }
            return Some(item);
        }
        None
    }
}
