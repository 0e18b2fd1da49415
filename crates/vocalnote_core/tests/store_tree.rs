use std::fs;
use vocalnote_core::{Item, ItemId, ItemKind, Store, StoreConfig, StoreError, TreeError};

fn add_folder(store: &mut Store, parent: ItemId, name: &str) -> ItemId {
    let folder = Item::new_folder(name);
    let id = folder.id();
    store.add(parent, folder).unwrap();
    id
}

fn add_recording(store: &mut Store, parent: ItemId, name: &str) -> ItemId {
    let recording = Item::new_recording(name);
    let id = recording.id();
    store.add(parent, recording).unwrap();
    id
}

fn child_names(store: &Store, folder: ItemId) -> Vec<String> {
    store
        .tree()
        .children(folder)
        .unwrap()
        .into_iter()
        .map(|item| item.name().to_string())
        .collect()
}

#[test]
fn add_appends_and_links_parent() {
    let mut store = Store::in_memory();
    let root = store.root_id();

    let zulu = add_folder(&mut store, root, "Zulu");
    let alpha = add_recording(&mut store, root, "Alpha");

    assert_eq!(store.root().contents(), &[zulu, alpha]);
    assert_eq!(store.item(alpha).unwrap().parent(), Some(root));
    assert_eq!(store.item(zulu).unwrap().kind(), ItemKind::Folder);
}

#[test]
fn add_rejects_item_already_in_tree() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let demo = add_folder(&mut store, root, "Demo");
    let clip = Item::new_recording("Clip");
    let clone = clip.clone();
    store.add(root, clip).unwrap();

    let err = store.add(demo, clone.clone()).unwrap_err();
    assert!(matches!(err, StoreError::Tree(TreeError::DuplicateItem(id)) if id == clone.id()));
    assert_eq!(store.root().len(), 2);
    assert!(store.tree().folder(demo).unwrap().is_empty());
}

#[test]
fn add_then_remove_restores_previous_contents() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    add_folder(&mut store, root, "A");
    add_recording(&mut store, root, "B");
    let before = store.root().contents().to_vec();

    let extra = add_recording(&mut store, root, "C");
    let detached = store.remove(root, extra).unwrap().expect("item should be removed");

    assert_eq!(store.root().contents(), before.as_slice());
    assert_eq!(detached.id(), extra);
    assert_eq!(detached.parent(), None);
    assert!(store.item(extra).is_none());
}

#[test]
fn add_rejects_populated_folder_clone() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let demo = add_folder(&mut store, root, "Demo");
    add_recording(&mut store, demo, "Clip");
    let populated = store.item(demo).unwrap().clone();

    let mut other = Store::in_memory();
    let other_root = other.root_id();
    let err = other.add(other_root, populated.clone()).unwrap_err();
    assert!(matches!(err, StoreError::Tree(TreeError::NonEmptyFolder(id)) if id == demo));
    assert!(other.root().is_empty());
    assert_eq!(other.tree().len(), 1);

    store.remove(root, demo).unwrap().unwrap();
    let err = store.add(root, populated).unwrap_err();
    assert!(matches!(err, StoreError::Tree(TreeError::NonEmptyFolder(_))));
    assert!(store.root().is_empty());

    let fresh = add_folder(&mut store, root, "Fresh");
    add_recording(&mut store, fresh, "Take");
    assert!(store.remove(root, fresh).unwrap().is_some());
    assert_eq!(store.tree().len(), 1);
}

#[test]
fn remove_of_non_child_is_noop() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let demo = add_folder(&mut store, root, "Demo");
    let nested = add_recording(&mut store, demo, "Nested");
    let before = store.root().contents().to_vec();

    assert!(store.remove(root, nested).unwrap().is_none());
    assert!(store.remove(root, uuid::Uuid::new_v4()).unwrap().is_none());
    assert_eq!(store.root().contents(), before.as_slice());
    assert_eq!(store.item(nested).unwrap().parent(), Some(demo));
}

#[test]
fn remove_from_unknown_folder_is_not_found() {
    let mut store = Store::in_memory();
    let missing = uuid::Uuid::new_v4();

    let err = store.remove(missing, uuid::Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn rename_resorts_parent_and_reports_indices() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    add_folder(&mut store, root, "Bravo");
    add_folder(&mut store, root, "Delta");
    let item = add_recording(&mut store, root, "Echo");

    store.set_name(item, "Charlie").unwrap();

    assert_eq!(child_names(&store, root), vec!["Bravo", "Charlie", "Delta"]);
    assert_eq!(store.root().index_of(item), Some(1));
}

#[test]
fn rename_sorts_arrival_order_items_too() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    add_folder(&mut store, root, "c");
    add_folder(&mut store, root, "a");
    let renamed = add_folder(&mut store, root, "b");

    store.set_name(renamed, "bb").unwrap();

    assert_eq!(child_names(&store, root), vec!["a", "bb", "c"]);
}

#[test]
fn rename_keeps_identity() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let demo = add_folder(&mut store, root, "Demo");
    let clip = add_recording(&mut store, demo, "Clip1");
    let path_before = store.id_path(clip).unwrap();

    store.set_name(clip, "Renamed").unwrap();

    assert_eq!(store.item(clip).unwrap().name(), "Renamed");
    assert_eq!(store.id_path(clip).unwrap(), path_before);
}

#[test]
fn rename_root_changes_name_only() {
    let mut store = Store::in_memory();
    let root = store.root_id();

    store.set_name(root, "Library").unwrap();

    assert_eq!(store.root().name(), "Library");
    assert_eq!(store.root().parent(), None);
}

#[test]
fn rename_unknown_item_is_not_found() {
    let mut store = Store::in_memory();
    let err = store.set_name(uuid::Uuid::new_v4(), "x").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn cascade_delete_removes_descendants_and_blobs() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(StoreConfig::at(dir.path()));
    let root = store.root_id();
    let outer = add_folder(&mut store, root, "Outer");
    let inner = add_folder(&mut store, outer, "Inner");
    let deep = add_recording(&mut store, inner, "Deep");
    let shallow = add_recording(&mut store, outer, "Shallow");
    let keep = add_recording(&mut store, root, "Keep");

    let mut blobs = Vec::new();
    for id in [deep, shallow, keep] {
        let recording = store.item(id).unwrap().as_recording().unwrap().clone();
        let path = store.blob_location(&recording).unwrap();
        fs::write(&path, b"audio").unwrap();
        blobs.push(path);
    }

    let detached = store.remove(root, outer).unwrap().unwrap();

    assert!(detached.as_folder().unwrap().is_empty());
    for id in [outer, inner, deep, shallow] {
        assert!(store.item(id).is_none());
    }
    assert!(!blobs[0].exists());
    assert!(!blobs[1].exists());
    assert!(blobs[2].exists());
    assert_eq!(store.root().contents(), &[keep]);
}

#[test]
fn blob_removal_failure_does_not_block_remove() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(StoreConfig::at(dir.path()));
    let root = store.root_id();
    let clip = add_recording(&mut store, root, "Clip");
    let recording = store.item(clip).unwrap().as_recording().unwrap().clone();
    // A directory at the blob path makes remove_file fail.
    fs::create_dir(store.blob_location(&recording).unwrap()).unwrap();

    assert!(store.remove(root, clip).unwrap().is_some());
    assert!(store.root().is_empty());
}

#[test]
fn lookup_resolves_full_paths_only() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let folder_a = add_folder(&mut store, root, "A");
    let recording = add_recording(&mut store, folder_a, "R");

    let found = store.lookup(&[root, folder_a, recording]).unwrap();
    assert_eq!(found.id(), recording);
    assert_eq!(store.lookup(&[root]).unwrap().id(), root);
    assert_eq!(store.lookup(&[root, folder_a]).unwrap().id(), folder_a);

    let wrong = uuid::Uuid::new_v4();
    assert!(store.lookup(&[root, wrong]).unwrap_err().is_not_found());
    assert!(store.lookup(&[root, recording]).is_err());
    assert!(store.lookup(&[folder_a, recording]).is_err());
    assert!(store.lookup(&[root, folder_a, recording, wrong]).is_err());
    assert!(store.lookup(&[]).is_err());
}

#[test]
fn id_path_walks_from_root() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let folder_a = add_folder(&mut store, root, "A");
    let folder_b = add_folder(&mut store, folder_a, "B");
    let clip = add_recording(&mut store, folder_b, "clip");

    let path = store.id_path(clip).unwrap();
    assert_eq!(path, vec![root, folder_a, folder_b, clip]);
    assert_eq!(store.lookup(&path).unwrap().id(), clip);
    assert_eq!(store.id_path(root).unwrap(), vec![root]);
}

#[test]
fn move_keeps_identity_and_blob() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(StoreConfig::at(dir.path()));
    let root = store.root_id();
    let source = add_folder(&mut store, root, "Source");
    let target = add_folder(&mut store, root, "Target");
    let clip = add_recording(&mut store, source, "Clip");
    let recording = store.item(clip).unwrap().as_recording().unwrap().clone();
    let blob = store.blob_location(&recording).unwrap();
    fs::write(&blob, b"audio").unwrap();

    let new_index = store.move_item(clip, target).unwrap();

    assert_eq!(new_index, 0);
    assert!(store.tree().folder(source).unwrap().is_empty());
    assert_eq!(store.tree().folder(target).unwrap().contents(), &[clip]);
    assert_eq!(store.id_path(clip).unwrap(), vec![root, target, clip]);
    assert!(blob.exists());
}

#[test]
fn move_rejects_cycles_and_recording_targets() {
    let mut store = Store::in_memory();
    let root = store.root_id();
    let outer = add_folder(&mut store, root, "Outer");
    let inner = add_folder(&mut store, outer, "Inner");
    let clip = add_recording(&mut store, root, "Clip");

    let err = store.move_item(outer, inner).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Tree(TreeError::CycleDetected { item, parent }) if item == outer && parent == inner
    ));
    let err = store.move_item(outer, clip).unwrap_err();
    assert!(matches!(err, StoreError::Tree(TreeError::NotAFolder(id)) if id == clip));
    assert_eq!(store.id_path(inner).unwrap(), vec![root, outer, inner]);
}
