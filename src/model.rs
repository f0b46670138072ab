use serde::{Deserialize, Serialize};

/// Collection id for catalog entries on the CMS backend.
pub const CONTENT_COLLECTION: &str = "ottcontent";
/// Collection id for streaming-platform records on the CMS backend.
pub const PLATFORM_COLLECTION: &str = "ottplatforms";

/// One page of a `list` response. `hasNext` is absent on backends that have
/// run out of pages, so it defaults to `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(rename = "hasNext", default)]
    pub has_next: bool,
}

/// A single streaming title. Everything past the server-assigned id is
/// optional on the wire; a missing field means the feature is absent, not
/// that the record is invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub content_type: Option<String>,
    pub streaming_platform: Option<String>,
    pub poster_image: Option<String>,
    pub is_top_grossing: Option<bool>,
    /// 0-10 scale.
    pub imdb_rating: Option<f64>,
    /// 0-100 scale.
    pub rotten_tomatoes_rating: Option<f64>,
}

/// A single streaming service record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub platform_name: Option<String>,
    pub platform_logo: Option<String>,
    pub subscription_details: Option<String>,
    pub website_link: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_item_deserializes_camel_case_wire_fields() {
        let json = r#"{
            "_id": "c1",
            "title": "The Matrix",
            "contentType": "Movie",
            "streamingPlatform": "Netflix",
            "isTopGrossing": true,
            "imdbRating": 8.7,
            "rottenTomatoesRating": 83
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "c1");
        assert_eq!(item.content_type.as_deref(), Some("Movie"));
        assert_eq!(item.streaming_platform.as_deref(), Some("Netflix"));
        assert_eq!(item.is_top_grossing, Some(true));
        assert_eq!(item.imdb_rating, Some(8.7));
        assert_eq!(item.rotten_tomatoes_rating, Some(83.0));
        assert!(item.description.is_none());
        assert!(item.poster_image.is_none());
    }

    #[test]
    fn id_only_content_item_is_valid() {
        let item: ContentItem = serde_json::from_str(r#"{"_id": "bare"}"#).unwrap();
        assert_eq!(item.id, "bare");
        assert!(item.title.is_none());
        assert!(item.genre.is_none());
    }

    #[test]
    fn page_without_has_next_defaults_to_false() {
        let page: Page<PlatformItem> =
            serde_json::from_str(r#"{"items": [{"_id": "p1", "platformName": "Zee5"}]}"#).unwrap();
        assert!(!page.has_next);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].platform_name.as_deref(), Some("Zee5"));
    }

    #[test]
    fn page_reads_has_next_flag() {
        let page: Page<ContentItem> =
            serde_json::from_str(r#"{"items": [], "hasNext": true}"#).unwrap();
        assert!(page.has_next);
        assert!(page.items.is_empty());
    }
}
