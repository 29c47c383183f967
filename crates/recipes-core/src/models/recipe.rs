use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level document returned by the recipe endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub recipes: Vec<Recipe>,
}

/// A recipe as served by the feed.
///
/// Wire keys are snake_case and `uuid` carries the identifier; each key is
/// renamed explicitly so a rename on either side is a compile-visible change.
/// Equality and hashing only look at `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "cuisine")]
    pub cuisine: String,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "photo_url_large", default)]
    pub photo_url_large: Option<Url>,
    #[serde(rename = "photo_url_small", default)]
    pub photo_url_small: Option<Url>,
    #[serde(rename = "source_url", default)]
    pub source_url: Option<String>,
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "youtube_url", default)]
    pub youtube_url: Option<String>,
}

impl Recipe {
    /// Link to show for "view recipe": the video if present, else the source page.
    pub fn link(&self) -> Option<&str> {
        self.youtube_url
            .as_deref()
            .or(self.source_url.as_deref())
            .filter(|s| !s.is_empty())
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn recipe(id: &str, name: &str) -> Recipe {
        Recipe {
            cuisine: "British".to_string(),
            name: name.to_string(),
            photo_url_large: None,
            photo_url_small: None,
            source_url: None,
            id: id.to_string(),
            youtube_url: None,
        }
    }

    #[test]
    fn test_equality_is_keyed_on_id() {
        assert_eq!(recipe("a", "Apple Pie"), recipe("a", "Something Else"));
        assert_ne!(recipe("a", "Apple Pie"), recipe("b", "Apple Pie"));
    }

    #[test]
    fn test_hash_is_keyed_on_id() {
        let mut set = HashSet::new();
        set.insert(recipe("a", "Apple Pie"));
        set.insert(recipe("a", "Renamed"));
        set.insert(recipe("b", "Apple Pie"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_parse_wire_keys() {
        let json = r#"{
            "cuisine": "Malaysian",
            "name": "Apam Balik",
            "photo_url_large": "https://example.com/large.jpg",
            "photo_url_small": "https://example.com/small.jpg",
            "source_url": "https://www.nyonyacooking.com/recipes/apam-balik~SJ5WuvsDf9WQ",
            "uuid": "0c6ca6e7-e32a-4053-b824-1dbf749910d8",
            "youtube_url": "https://www.youtube.com/watch?v=6R8ffRRJcrg"
        }"#;

        let r: Recipe = serde_json::from_str(json).expect("Failed to parse recipe test JSON");
        assert_eq!(r.id, "0c6ca6e7-e32a-4053-b824-1dbf749910d8");
        assert_eq!(r.cuisine, "Malaysian");
        assert_eq!(
            r.photo_url_small.as_ref().map(Url::as_str),
            Some("https://example.com/small.jpg")
        );
        assert_eq!(r.link(), Some("https://www.youtube.com/watch?v=6R8ffRRJcrg"));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let json = r#"{"cuisine": "British", "name": "Bakewell Tart", "uuid": "abc"}"#;
        let r: Recipe = serde_json::from_str(json).expect("Failed to parse minimal recipe");
        assert!(r.photo_url_large.is_none());
        assert!(r.youtube_url.is_none());
        assert_eq!(r.link(), None);
    }

    #[test]
    fn test_link_falls_back_to_source() {
        let mut r = recipe("a", "Apple Pie");
        r.source_url = Some("https://example.com/pie".to_string());
        assert_eq!(r.link(), Some("https://example.com/pie"));
    }
}
