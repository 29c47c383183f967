//! Decoding and text repair for recipe documents.
//!
//! The feed double-encodes a handful of non-ASCII characters in recipe
//! names (UTF-8 bytes read back as Latin-1/Windows-1252). `decode` parses a
//! document and rewrites those sequences in every `name`.

use serde_json::Value;
use thiserror::Error;

use crate::models::{Recipe, RecipeResponse};

/// Literal substitutions applied to recipe names, in order.
/// Source sequences are disjoint so the order does not affect the result.
pub const NAME_REPAIRS: &[(&str, &str)] = &[("Å›", "ś"), ("Ã©", "é")];

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed recipe document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Recipe document must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Recipe at index {index} must be a JSON object, found {kind}")]
    EntryNotAnObject { index: usize, kind: &'static str },

    #[error("Recipe at index {index} has an empty id")]
    EmptyId { index: usize },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a `{"recipes": [...]}` document into recipes, repairing every name.
///
/// Fails for the whole batch if any entry is malformed or lacks an id.
pub fn decode(bytes: &[u8]) -> Result<Vec<Recipe>, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    // Derived struct visitors also accept a positional sequence; only the
    // keyed envelope is a valid document
    if !value.is_object() {
        return Err(DecodeError::NotAnObject(kind_of(&value)));
    }
    if let Some(Value::Array(entries)) = value.get("recipes") {
        if let Some((index, entry)) = entries.iter().enumerate().find(|(_, e)| !e.is_object()) {
            return Err(DecodeError::EntryNotAnObject {
                index,
                kind: kind_of(entry),
            });
        }
    }
    let recipes = serde_json::from_value::<RecipeResponse>(value)?.recipes;

    if let Some(index) = recipes.iter().position(|r| r.id.is_empty()) {
        return Err(DecodeError::EmptyId { index });
    }

    Ok(recipes
        .into_iter()
        .map(|mut recipe| {
            recipe.name = repair_name(&recipe.name);
            recipe
        })
        .collect())
}

/// Apply every `NAME_REPAIRS` substitution to `name`.
pub fn repair_name(name: &str) -> String {
    NAME_REPAIRS
        .iter()
        .fold(name.to_string(), |acc, (from, to)| acc.replace(from, to))
}
