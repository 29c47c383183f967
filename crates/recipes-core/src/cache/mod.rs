//! Local caching module for offline data access.
//!
//! This module provides the `SnapshotStore` holding the raw bytes of the
//! last successful recipe fetch, and the `ImageCache` holding recipe
//! photos keyed by URL. Both write atomically (temp file + rename), so a
//! reader never sees a partially written file.

pub mod image;
pub mod store;

pub use image::ImageCache;
pub use store::{age_display, SnapshotStore};
