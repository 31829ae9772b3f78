// src/domain/catalog/entity.rs
//
// Catalog records as the external service returns them.
// Only the fields the application displays or stores are modelled; unknown
// fields are ignored and missing ones fall back to their defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Catalog identifier of a game, genre, platform or store
pub type CatalogId = i64;

/// Compact `{id, name, slug}` reference (genres, tags, developers...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: CatalogId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl NamedRef {
    pub fn new(id: CatalogId, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = name.to_lowercase().replace(' ', "-");
        Self { id, name, slug }
    }
}

/// Platform entry attached to a game: `{ "platform": {id, name, slug} }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRef {
    pub platform: NamedRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,
}

/// Store entry attached to a game: `{ "id": .., "store": {id, name, slug} }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    #[serde(default)]
    pub id: CatalogId,
    pub store: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortScreenshot {
    pub id: CatalogId,
    pub image: String,
}

/// A game as it appears in list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: CatalogId,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_top: Option<u32>,
    #[serde(default)]
    pub ratings_count: Option<u64>,
    #[serde(default)]
    pub metacritic: Option<u32>,
    #[serde(default)]
    pub genres: Vec<NamedRef>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub platforms: Vec<PlatformRef>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub stores: Vec<StoreRef>,
    #[serde(default)]
    pub tags: Vec<NamedRef>,
    #[serde(default)]
    pub short_screenshots: Vec<ShortScreenshot>,
}

impl Game {
    pub fn new(id: CatalogId, name: impl Into<String>) -> Self {
        Self {
            id,
            slug: String::new(),
            name: name.into(),
            released: None,
            background_image: None,
            rating: None,
            rating_top: None,
            ratings_count: None,
            metacritic: None,
            genres: Vec::new(),
            platforms: Vec::new(),
            stores: Vec::new(),
            tags: Vec::new(),
            short_screenshots: Vec::new(),
        }
    }

    /// Platform names flattened out of the nested platform entries
    pub fn platform_names(&self) -> Vec<String> {
        self.platforms.iter().map(|p| p.platform.name.clone()).collect()
    }
}

/// Full detail record of a single game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    #[serde(flatten)]
    pub game: Game,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_raw: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub playtime: Option<u32>,
    #[serde(default)]
    pub developers: Vec<NamedRef>,
    #[serde(default)]
    pub publishers: Vec<NamedRef>,
}

impl GameDetails {
    /// Plain-text description, falling back to the HTML one
    pub fn summary(&self) -> &str {
        self.description_raw
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
    #[serde(default)]
    pub year_start: Option<i32>,
    #[serde(default)]
    pub year_end: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: CatalogId,
    pub image: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Game trailer; `data` maps a quality label ("480", "max") to a video URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub id: CatalogId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Trailer {
    /// Highest quality video URL available
    pub fn best_url(&self) -> Option<&str> {
        self.data
            .get("max")
            .or_else(|| self.data.get("480"))
            .or_else(|| self.data.values().next())
            .map(String::as_str)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    /// Build a single, final page from a result list
    pub fn from_results(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// The catalog sends `null` instead of `[]` for some list fields
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_game_from_sparse_payload() {
        let game: Game = serde_json::from_value(json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "platforms": null,
            "metacritic": null,
            "added": 20000
        }))
        .unwrap();

        assert_eq!(game.id, 3498);
        assert!(game.platforms.is_empty());
        assert!(game.metacritic.is_none());
        assert!(game.background_image.is_none());
    }

    #[test]
    fn test_game_details_flatten() {
        let details: GameDetails = serde_json::from_value(json!({
            "id": 28,
            "name": "Red Dead Redemption 2",
            "genres": [{"id": 4, "name": "Action", "slug": "action"}],
            "platforms": [{"platform": {"id": 18, "name": "PlayStation 4", "slug": "playstation4"}}],
            "description": "<p>Cowboys</p>",
            "description_raw": ""
        }))
        .unwrap();

        assert_eq!(details.game.genres[0].name, "Action");
        assert_eq!(details.game.platform_names(), vec!["PlayStation 4".to_string()]);
        assert_eq!(details.summary(), "<p>Cowboys</p>");
    }

    #[test]
    fn test_page_without_next() {
        let page: Page<Genre> = serde_json::from_value(json!({
            "count": 1,
            "next": null,
            "results": [{"id": 4, "name": "Action"}]
        }))
        .unwrap();

        assert!(!page.has_next());
        assert_eq!(page.results[0].slug, "");
    }

    #[test]
    fn test_page_missing_results_defaults_empty() {
        let page: Page<Game> = serde_json::from_value(json!({"count": 0})).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_trailer_best_url() {
        let mut data = BTreeMap::new();
        data.insert("480".to_string(), "low.mp4".to_string());
        let mut trailer = Trailer { id: 1, name: "Launch".into(), preview: None, data };
        assert_eq!(trailer.best_url(), Some("low.mp4"));

        trailer.data.insert("max".to_string(), "high.mp4".to_string());
        assert_eq!(trailer.best_url(), Some("high.mp4"));
    }
}
