use std::collections::BTreeMap;

use crate::models::Recipe;

/// Case-insensitive substring check
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Recipes whose name or cuisine contains `query`, in their original order.
/// A blank query keeps everything.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let query = query.trim();
    recipes
        .iter()
        .filter(|r| {
            query.is_empty()
                || contains_ignore_case(&r.name, query)
                || contains_ignore_case(&r.cuisine, query)
        })
        .collect()
}

/// Group recipes by cuisine. Cuisines come out sorted; recipes keep their
/// relative order within a cuisine.
pub fn group_by_cuisine<'a, I>(recipes: I) -> BTreeMap<&'a str, Vec<&'a Recipe>>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut groups: BTreeMap<&str, Vec<&Recipe>> = BTreeMap::new();
    for recipe in recipes {
        groups.entry(recipe.cuisine.as_str()).or_default().push(recipe);
    }
    groups
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, cuisine: &str, name: &str) -> Recipe {
        Recipe {
            cuisine: cuisine.to_string(),
            name: name.to_string(),
            photo_url_large: None,
            photo_url_small: None,
            source_url: None,
            id: id.to_string(),
            youtube_url: None,
        }
    }

    fn sample() -> Vec<Recipe> {
        vec![
            recipe("1", "Malaysian", "Apam Balik"),
            recipe("2", "British", "Apple & Blackberry Crumble"),
            recipe("3", "British", "Bakewell Tart"),
            recipe("4", "French", "Crème brûlée"),
        ]
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Apam Balik", "balik"));
        assert!(contains_ignore_case("Crème Brûlée", "BRÛLÉE"));
        assert!(!contains_ignore_case("Apam Balik", "tart"));
    }

    #[test]
    fn test_filter_recipes_by_name_or_cuisine() {
        let recipes = sample();

        let ids: Vec<_> = filter_recipes(&recipes, "apple").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);

        let ids: Vec<_> = filter_recipes(&recipes, "british").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_filter_recipes_blank_query_keeps_all() {
        let recipes = sample();
        assert_eq!(filter_recipes(&recipes, "").len(), 4);
        assert_eq!(filter_recipes(&recipes, "   ").len(), 4);
    }

    #[test]
    fn test_group_by_cuisine_sorted_keys_stable_order() {
        let recipes = sample();
        let groups = group_by_cuisine(&recipes);

        let cuisines: Vec<_> = groups.keys().copied().collect();
        assert_eq!(cuisines, vec!["British", "French", "Malaysian"]);

        let british: Vec<_> = groups["British"].iter().map(|r| r.id.as_str()).collect();
        assert_eq!(british, vec!["2", "3"]);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Crème brûlée", 8), "Crème...");
    }
}
