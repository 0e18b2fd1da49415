use std::fs;
use std::path::Path;
use vocalnote_core::{Item, ItemId, ItemKind, Store, StoreConfig, Tree};

fn open(dir: &Path) -> Store {
    Store::open(StoreConfig::at(dir))
}

fn shape(tree: &Tree) -> Vec<(ItemId, String, Option<ItemId>, ItemKind)> {
    tree.iter_depth_first()
        .map(|item| (item.id(), item.name().to_string(), item.parent(), item.kind()))
        .collect()
}

#[test]
fn missing_snapshot_starts_with_empty_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());

    assert!(store.root().is_empty());
    assert_eq!(store.root().name(), "");
    assert_eq!(store.root().parent(), None);
    assert!(!dir.path().join("store.json").exists());
}

#[test]
fn demo_scenario_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (root, demo, clip) = {
        let mut store = open(dir.path());
        let root = store.root_id();
        let demo = Item::new_folder("Demo");
        let demo_id = demo.id();
        store.add(root, demo).unwrap();
        let clip = Item::new_recording("Clip1");
        let clip_id = clip.id();
        store.add(demo_id, clip).unwrap();
        store.set_name(clip_id, "AAA").unwrap();
        (root, demo_id, clip_id)
    };

    let reloaded = open(dir.path());
    assert_eq!(reloaded.root_id(), root);
    assert_eq!(reloaded.tree().len(), 3);
    let found = reloaded.lookup(&[root, demo, clip]).unwrap();
    assert_eq!(found.name(), "AAA");
    assert_eq!(found.kind(), ItemKind::Recording);
    assert_eq!(found.parent(), Some(demo));
    assert_eq!(reloaded.item(demo).unwrap().name(), "Demo");
    assert_eq!(reloaded.item(demo).unwrap().parent(), Some(root));
}

#[test]
fn reload_preserves_ids_names_order_and_parents() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path());
    let root = store.root_id();
    let first = Item::new_folder("b-folder");
    let first_id = first.id();
    store.add(root, first).unwrap();
    store.add(root, Item::new_recording("a-clip")).unwrap();
    store.add(first_id, Item::new_recording("nested")).unwrap();
    store.add(first_id, Item::new_folder("sub")).unwrap();

    let reloaded = open(dir.path());
    assert_eq!(shape(reloaded.tree()), shape(store.tree()));
}

#[test]
fn snapshot_uses_folder_and_recording_wrappers() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path());
    let root = store.root_id();
    let clip = Item::new_recording("Clip");
    let clip_id = clip.id();
    store.add(root, clip).unwrap();

    let raw = fs::read_to_string(dir.path().join("store.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["uuid"], root.to_string());
    assert_eq!(json["contents"].as_array().unwrap().len(), 1);
    assert_eq!(json["contents"][0]["recording"]["name"], "Clip");
    assert_eq!(json["contents"][0]["recording"]["uuid"], clip_id.to_string());
}

#[test]
fn remove_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path());
    let root = store.root_id();
    let clip = Item::new_recording("Clip");
    let clip_id = clip.id();
    store.add(root, clip).unwrap();
    store.remove(root, clip_id).unwrap();

    let reloaded = open(dir.path());
    assert!(reloaded.root().is_empty());
    assert_eq!(reloaded.root_id(), root);
}

#[test]
fn corrupt_snapshot_falls_back_to_empty_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("store.json"), "{\"name\": \"\", \"uuid\": 42").unwrap();

    let store = open(dir.path());
    assert!(store.root().is_empty());
}

#[test]
fn schema_mismatch_falls_back_to_empty_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("store.json"), r#"{"title": "wrong shape"}"#).unwrap();

    let store = open(dir.path());
    assert!(store.root().is_empty());
    assert_eq!(store.tree().len(), 1);
}

#[test]
fn empty_snapshot_file_is_treated_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("store.json"), "").unwrap();

    let store = open(dir.path());
    assert!(store.root().is_empty());
}

#[test]
fn legacy_snapshot_with_trailing_empty_entries_loads() {
    let dir = tempfile::tempdir().unwrap();
    let payload = r#"{
        "name": "",
        "uuid": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F",
        "contents": [
            {"folder": {
                "name": "Demo",
                "uuid": "C0FFEE00-0000-4000-8000-000000000001",
                "contents": [
                    {"recording": {"name": "Clip1", "uuid": "C0FFEE00-0000-4000-8000-000000000002"}},
                    {}
                ]
            }},
            {}
        ]
    }"#;
    fs::write(dir.path().join("store.json"), payload).unwrap();

    let store = open(dir.path());
    let root = store.root_id();
    let demo = uuid::Uuid::parse_str("C0FFEE00-0000-4000-8000-000000000001").unwrap();
    let clip = uuid::Uuid::parse_str("C0FFEE00-0000-4000-8000-000000000002").unwrap();
    assert_eq!(
        root,
        uuid::Uuid::parse_str("E621E1F8-C36C-495A-93FC-0C247A3E6E5F").unwrap()
    );
    assert_eq!(store.lookup(&[root, demo, clip]).unwrap().name(), "Clip1");
    assert_eq!(store.tree().len(), 3);
}

#[test]
fn failed_save_keeps_in_memory_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();
    let mut store = Store::open(StoreConfig::at(blocker.join("nested")));
    let root = store.root_id();

    let index = store.add(root, Item::new_folder("Kept")).unwrap();

    assert_eq!(index, 0);
    assert_eq!(store.root().len(), 1);
    assert!(store.save_snapshot().is_err());
}

#[test]
fn custom_snapshot_file_name_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::at(dir.path()).with_snapshot_file_name("library.json");
    let mut store = Store::open(config.clone());
    let root = store.root_id();
    store.add(root, Item::new_folder("Demo")).unwrap();

    assert!(dir.path().join("library.json").exists());
    assert!(!dir.path().join("store.json").exists());
    assert_eq!(Store::open(config).root().len(), 1);
}
