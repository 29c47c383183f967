//! Data models for the recipe feed.
//!
//! - `Recipe`: a single recipe with its photo and video links
//! - `RecipeResponse`: the `{"recipes": [...]}` wire envelope

pub mod recipe;

pub use recipe::{Recipe, RecipeResponse};
