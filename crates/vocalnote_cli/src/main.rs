//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `vocalnote_core` linkage and print a store tree.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `vocalnote_cli [BASE_DIR]`. Without a directory an empty in-memory
//! store is printed. Set `VOCALNOTE_LOG_DIR` to an absolute path to enable
//! file logging.

use log::info;
use vocalnote_core::{default_log_level, init_logging, ItemKind, Store, StoreConfig};

const LOG_DIR_ENV: &str = "VOCALNOTE_LOG_DIR";

fn main() {
    println!("vocalnote_core version={}", vocalnote_core::core_version());
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = match std::env::args().nth(1) {
        Some(dir) => Store::open(StoreConfig::at(dir)),
        None => Store::in_memory(),
    };
    info!("event=cli_list module=cli status=start items={}", store.tree().len());

    for item in store.tree().iter_depth_first() {
        let depth = store.id_path(item.id()).map(|path| path.len()).unwrap_or(1) - 1;
        let marker = match item.kind() {
            ItemKind::Folder => "+",
            ItemKind::Recording => "-",
        };
        let label = if item.id() == store.root_id() {
            "<root>"
        } else {
            item.name()
        };
        println!("{}{} {} ({})", "  ".repeat(depth), marker, label, item.id());
    }

    println!(
        "recordings={} orphaned_blobs={}",
        store.tree().recording_ids().len(),
        store.orphaned_blobs().len()
    );
}
