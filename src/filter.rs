use crate::model::ContentItem;

/// Filter value meaning "no constraint on this field".
pub const ALL: &str = "all";

/// Browse-page filter state. Categorical fields hold either [`ALL`] or an
/// exact value observed in the catalog; the query is a free-text needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    pub query: String,
    pub platform: String,
    pub genre: String,
    pub content_type: String,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            platform: ALL.to_string(),
            genre: ALL.to_string(),
            content_type: ALL.to_string(),
        }
    }
}

impl ContentFilter {
    /// True when any predicate deviates from the all-pass default.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
            || self.platform != ALL
            || self.genre != ALL
            || self.content_type != ALL
    }

    /// Reset every predicate, restoring the full list on the next apply.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Derive the filtered view. Predicates are ANDed; input order is
    /// preserved. Items missing a field never match a specific categorical
    /// filter, and the text query matches case-insensitively against title
    /// or description.
    pub fn apply(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            let hit = contains_ci(item.title.as_deref(), &needle)
                || contains_ci(item.description.as_deref(), &needle);
            if !hit {
                return false;
            }
        }
        field_matches(item.streaming_platform.as_deref(), &self.platform)
            && field_matches(item.genre.as_deref(), &self.genre)
            && field_matches(item.content_type.as_deref(), &self.content_type)
    }
}

fn contains_ci(haystack: Option<&str>, lowered_needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(lowered_needle))
        .unwrap_or(false)
}

fn field_matches(value: Option<&str>, wanted: &str) -> bool {
    if wanted == ALL {
        return true;
    }
    value == Some(wanted)
}

/// Selectable values for each categorical filter, derived from whatever is
/// currently loaded rather than a fixed enum. Options grow as more pages
/// accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub platforms: Vec<String>,
    pub genres: Vec<String>,
    pub content_types: Vec<String>,
}

impl FilterOptions {
    /// Distinct non-empty values in first-seen order.
    pub fn from_items(items: &[ContentItem]) -> Self {
        Self {
            platforms: distinct(items.iter().map(|i| i.streaming_platform.as_deref())),
            genres: distinct(items.iter().map(|i| i.genre.as_deref())),
            content_types: distinct(items.iter().map(|i| i.content_type.as_deref())),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values.flatten() {
        if !v.is_empty() && !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, platform: Option<&str>, genre: Option<&str>, kind: Option<&str>) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: Some(title.to_string()),
            description: None,
            genre: genre.map(str::to_string),
            content_type: kind.map(str::to_string),
            streaming_platform: platform.map(str::to_string),
            poster_image: None,
            is_top_grossing: None,
            imdb_rating: None,
            rotten_tomatoes_rating: None,
        }
    }

    fn sample() -> Vec<ContentItem> {
        vec![
            item("1", "The Matrix", Some("Netflix"), Some("Sci-Fi"), Some("Movie")),
            item("2", "Matrix Reloaded", Some("Netflix"), Some("Sci-Fi"), Some("Movie")),
            item("3", "Paatal Lok", Some("Zee5"), Some("Thriller"), Some("Series")),
            item("4", "Untitled", None, None, None),
        ]
    }

    #[test]
    fn default_filter_is_identity() {
        let items = sample();
        assert_eq!(ContentFilter::default().apply(&items), items);
    }

    #[test]
    fn filtering_is_idempotent() {
        let filter = ContentFilter {
            platform: "Netflix".into(),
            ..Default::default()
        };
        let once = filter.apply(&sample());
        assert_eq!(filter.apply(&once), once);
    }

    #[test]
    fn specific_platform_matches_exactly() {
        let filter = ContentFilter {
            platform: "Netflix".into(),
            ..Default::default()
        };
        let out = filter.apply(&sample());
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|i| i.streaming_platform.as_deref() == Some("Netflix")));
    }

    #[test]
    fn platform_match_is_case_sensitive() {
        let filter = ContentFilter {
            platform: "netflix".into(),
            ..Default::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn missing_field_never_matches_specific_filter() {
        let filter = ContentFilter {
            genre: "Thriller".into(),
            ..Default::default()
        };
        let out = filter.apply(&sample());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
    }

    #[test]
    fn query_is_case_insensitive() {
        let upper = ContentFilter {
            query: "MATRIX".into(),
            ..Default::default()
        };
        let lower = ContentFilter {
            query: "matrix".into(),
            ..Default::default()
        };
        let items = sample();
        let a = upper.apply(&items);
        assert_eq!(a, lower.apply(&items));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn query_matches_description_too() {
        let mut items = sample();
        items[3].description = Some("A matrix of crime and politics".into());
        let filter = ContentFilter {
            query: "matrix".into(),
            ..Default::default()
        };
        let out = filter.apply(&items);
        assert_eq!(out.len(), 3);
        assert_eq!(out.last().unwrap().id, "4");
    }

    #[test]
    fn predicates_are_anded() {
        let filter = ContentFilter {
            query: "matrix".into(),
            platform: "Netflix".into(),
            genre: "Sci-Fi".into(),
            content_type: "Series".into(),
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn filtering_preserves_input_order() {
        let filter = ContentFilter {
            genre: "Sci-Fi".into(),
            ..Default::default()
        };
        let out = filter.apply(&sample());
        let ids: Vec<&str> = out.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn clear_restores_the_default() {
        let mut filter = ContentFilter {
            query: "x".into(),
            platform: "Zee5".into(),
            ..Default::default()
        };
        assert!(filter.is_active());
        filter.clear();
        assert!(!filter.is_active());
        assert_eq!(filter, ContentFilter::default());
    }

    #[test]
    fn options_skip_missing_fields() {
        let opts = FilterOptions::from_items(&sample());
        assert_eq!(opts.platforms, ["Netflix", "Zee5"]);
        assert_eq!(opts.genres, ["Sci-Fi", "Thriller"]);
        assert_eq!(opts.content_types, ["Movie", "Series"]);
    }

    #[test]
    fn options_keep_first_seen_order_without_duplicates() {
        let items = vec![
            item("1", "a", Some("Zee5"), None, None),
            item("2", "b", Some("Netflix"), None, None),
            item("3", "c", Some("Zee5"), None, None),
        ];
        let opts = FilterOptions::from_items(&items);
        assert_eq!(opts.platforms, ["Zee5", "Netflix"]);
    }
}
