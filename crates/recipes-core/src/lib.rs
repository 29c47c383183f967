//! Core library for recipe-cache.
//!
//! Fetches a recipe list from a remote JSON endpoint, repairs known
//! mis-encoded text, and keeps a local snapshot so later launches can
//! serve the list offline.
//!
//! The entry point is [`RecipeManager`], which chooses between the cached
//! snapshot and the network and reports failures as [`RecipeError`].

pub mod api;
pub mod cache;
pub mod config;
pub mod decode;
pub mod manager;
pub mod models;
pub mod utils;

pub use api::{HttpResponse, HttpTransport, RecipeError, Transport, TransportError};
pub use cache::{ImageCache, SnapshotStore};
pub use config::Config;
pub use decode::{decode, repair_name, DecodeError};
pub use manager::RecipeManager;
pub use models::Recipe;
