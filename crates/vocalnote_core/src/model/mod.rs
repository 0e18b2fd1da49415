//! Content tree domain model.
//!
//! # Responsibility
//! - Define folder and recording nodes as one tagged `Item` type.
//! - Keep structural tree invariants in a single arena owner.
//!
//! # Invariants
//! - Every node is identified by a stable `ItemId`.
//! - Parent links are ids, never owning references.

pub mod item;
pub mod tree;
