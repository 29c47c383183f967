//! Helpers the front end uses to search, group and print recipe lists.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, filter_recipes, group_by_cuisine, truncate_string};
