//! Core types shared across the depot package management toolkit.
//!
//! This crate provides the foundations every other depot crate builds on:
//! - Package names, Debian-style versions and relation expressions
//! - A unified, coded error type
//! - JSON helpers for config and cache snapshots

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
mod json;
mod version;

pub use error::{Error, ErrorCode, Result};
pub use json::{from_json, from_json_slice, to_json, to_json_pretty};
pub use version::{PackageName, RelationExpr, RelationKind, RelationLine, SingleRelation, Version};

// Re-exported for crates that build on the same collection types we use
// internally (arenas, solution maps, concurrent caches).
pub use ahash::{AHashMap, AHashSet};
pub use dashmap::DashMap;
pub use parking_lot::{Mutex, RwLock};
