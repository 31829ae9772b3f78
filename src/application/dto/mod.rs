// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// PRINCIPLES:
// - DTOs are presentation-friendly, serializable structs
// - Conversion FROM domain values only (never TO), except the browse filters
//   which are the one input shape that becomes a domain query

use serde::{Deserialize, Serialize};

use crate::domain::{
    CatalogId, DateRange, FavoriteEntry, Game, GameDetails, GameOrdering, GameQuery, Genre,
    NamedRef, Page, Platform, Screenshot, Store, Trailer,
};
use crate::error::{AppError, AppResult};
use crate::services::{FavoritesStore, FetchOutcome};

// ============================================================================
// GAME DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCardDto {
    pub id: CatalogId,
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub metacritic: Option<u32>,
    pub released: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub is_favorite: bool,
    pub in_wishlist: bool,
}

impl GameCardDto {
    /// Card for a listing, with membership flags read from the store
    pub fn from_game(game: &Game, favorites: &FavoritesStore) -> Self {
        Self {
            id: game.id,
            slug: game.slug.clone(),
            name: game.name.clone(),
            image_url: game.background_image.clone(),
            rating: game.rating,
            metacritic: game.metacritic,
            released: game.released.clone(),
            genres: names(&game.genres),
            platforms: game.platform_names(),
            is_favorite: favorites.is_favorite(game.id),
            in_wishlist: favorites.is_in_wishlist(game.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetailsDto {
    #[serde(flatten)]
    pub card: GameCardDto,
    pub description: String,
    pub website: Option<String>,
    pub playtime: Option<u32>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub tags: Vec<String>,
}

impl GameDetailsDto {
    pub fn from_details(details: &GameDetails, favorites: &FavoritesStore) -> Self {
        Self {
            card: GameCardDto::from_game(&details.game, favorites),
            description: details.summary().to_string(),
            website: details.website.clone().filter(|w| !w.is_empty()),
            playtime: details.playtime,
            developers: names(&details.developers),
            publishers: names(&details.publishers),
            tags: names(&details.game.tags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailerDto {
    pub id: CatalogId,
    pub name: String,
    pub preview: Option<String>,
    pub url: Option<String>,
}

impl From<&Trailer> for TrailerDto {
    fn from(trailer: &Trailer) -> Self {
        Self {
            id: trailer.id,
            name: trailer.name.clone(),
            preview: trailer.preview.clone(),
            url: trailer.best_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotDto {
    pub id: CatalogId,
    pub image: String,
}

impl From<&Screenshot> for ScreenshotDto {
    fn from(shot: &Screenshot) -> Self {
        Self {
            id: shot.id,
            image: shot.image.clone(),
        }
    }
}

/// Secondary content shown next to a game's details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMediaDto {
    pub game_id: CatalogId,
    pub screenshots: PageDto<ScreenshotDto>,
    pub trailers: PageDto<TrailerDto>,
    pub similar: PageDto<GameCardDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeFeedDto {
    pub trending: PageDto<GameCardDto>,
    pub top_rated: PageDto<GameCardDto>,
    pub this_week: PageDto<GameCardDto>,
    pub upcoming: PageDto<GameCardDto>,
}

// ============================================================================
// REFERENCE DATA DTOs
// ============================================================================

/// Genre, platform or store as a browse filter option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRefDto {
    pub id: CatalogId,
    pub name: String,
    pub slug: String,
    pub games_count: Option<u64>,
    pub image_url: Option<String>,
}

impl From<&Genre> for CatalogRefDto {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            slug: genre.slug.clone(),
            games_count: genre.games_count,
            image_url: genre.image_background.clone(),
        }
    }
}

impl From<&Platform> for CatalogRefDto {
    fn from(platform: &Platform) -> Self {
        Self {
            id: platform.id,
            name: platform.name.clone(),
            slug: platform.slug.clone(),
            games_count: platform.games_count,
            image_url: platform.image_background.clone(),
        }
    }
}

impl From<&Store> for CatalogRefDto {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id,
            name: store.name.clone(),
            slug: store.slug.clone(),
            games_count: store.games_count,
            image_url: store.image_background.clone(),
        }
    }
}

// ============================================================================
// PAGING
// ============================================================================

/// One page of results plus whether the request behind it failed
///
/// A failed page is empty and carries the reason, so "nothing matched" and
/// "could not ask" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDto<T> {
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub results: Vec<T>,
    pub failed: bool,
    pub error: Option<String>,
}

impl<T> PageDto<T> {
    pub fn from_outcome<S, F>(outcome: FetchOutcome<Page<S>>, convert: F) -> Self
    where
        F: FnMut(&S) -> T,
    {
        let error = outcome.failure_reason().map(str::to_string);
        let page = outcome.into_inner();

        Self {
            count: page.count,
            has_next: page.has_next(),
            has_previous: page.previous.is_some(),
            results: page.results.iter().map(convert).collect(),
            failed: error.is_some(),
            error,
        }
    }
}

// ============================================================================
// COLLECTION DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntryDto {
    pub id: CatalogId,
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub released: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub added_at: String,
}

impl From<FavoriteEntry> for FavoriteEntryDto {
    fn from(entry: FavoriteEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            image_url: entry.image_url,
            rating: entry.rating,
            released: entry.release_date,
            genres: entry.genres.as_deref().map(names).unwrap_or_default(),
            platforms: entry
                .platforms
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.platform.name)
                .collect(),
            added_at: entry.added_at.to_rfc3339(),
        }
    }
}

/// Membership of one game after a collection command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipDto {
    pub game_id: CatalogId,
    pub is_favorite: bool,
    pub in_wishlist: bool,
    /// Whether the command changed anything
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummaryDto {
    pub favorites_count: usize,
    pub wishlist_count: usize,
    pub favorite_ids: Vec<CatalogId>,
    pub wishlist_ids: Vec<CatalogId>,
}

impl CollectionSummaryDto {
    pub fn from_store(store: &FavoritesStore) -> Self {
        let state = store.snapshot();
        Self {
            favorites_count: state.favorites.len(),
            wishlist_count: state.wishlist.len(),
            favorite_ids: state.favorites.iter().map(|e| e.id).collect(),
            wishlist_ids: state.wishlist.iter().map(|e| e.id).collect(),
        }
    }
}

// ============================================================================
// BROWSE INPUT
// ============================================================================

/// Filters picked on the browse page; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseFiltersDto {
    pub search: Option<String>,
    pub genre: Option<CatalogId>,
    pub platform: Option<CatalogId>,
    /// Wire ordering string such as `-rating`
    pub ordering: Option<String>,
    pub year: Option<i32>,
    pub page: Option<u32>,
}

impl BrowseFiltersDto {
    pub fn to_query(&self) -> AppResult<GameQuery> {
        let mut query = GameQuery::new();

        if let Some(text) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.search(text);
        }
        if let Some(genre) = self.genre {
            query = query.genre(genre);
        }
        if let Some(platform) = self.platform {
            query = query.platform(platform);
        }
        if let Some(raw) = self.ordering.as_deref().filter(|o| !o.is_empty()) {
            let ordering: GameOrdering = raw.parse().map_err(AppError::Domain)?;
            query = query.ordering(ordering);
        }
        if let Some(year) = self.year {
            query = query.dates(DateRange::year(year)?);
        }
        if let Some(page) = self.page {
            query = query.page(page);
        }

        Ok(query)
    }
}

fn names(refs: &[NamedRef]) -> Vec<String> {
    refs.iter().map(|r| r.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GameSnapshot;
    use crate::events::EventBus;
    use crate::repositories::InMemoryKeyValueRepository;
    use std::sync::Arc;

    fn store() -> FavoritesStore {
        FavoritesStore::open(
            Arc::new(InMemoryKeyValueRepository::new()),
            Arc::new(EventBus::new()),
        )
    }

    #[test]
    fn test_card_reflects_membership() {
        let store = store();
        let mut game = Game::new(3328, "The Witcher 3");
        game.genres = vec![NamedRef::new(4, "Action")];
        store.add_wishlist(GameSnapshot::from(&game));

        let card = GameCardDto::from_game(&game, &store);
        assert!(!card.is_favorite);
        assert!(card.in_wishlist);
        assert_eq!(card.genres, vec!["Action".to_string()]);
    }

    #[test]
    fn test_failed_page_is_flagged() {
        let outcome: FetchOutcome<Page<Game>> = FetchOutcome::Failed {
            fallback: Page::empty(),
            reason: "timeout".to_string(),
        };
        let page: PageDto<CatalogId> = PageDto::from_outcome(outcome, |g| g.id);

        assert!(page.failed);
        assert_eq!(page.error.as_deref(), Some("timeout"));
        assert!(page.results.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn test_loaded_page_keeps_cursor() {
        let page = Page {
            count: 120,
            next: Some("next".to_string()),
            previous: None,
            results: vec![Game::new(1, "One")],
        };
        let dto: PageDto<String> = PageDto::from_outcome(FetchOutcome::Loaded(page), |g| g.name.clone());

        assert!(!dto.failed);
        assert!(dto.has_next);
        assert!(!dto.has_previous);
        assert_eq!(dto.results, vec!["One".to_string()]);
    }

    #[test]
    fn test_browse_filters_to_query() {
        let filters = BrowseFiltersDto {
            search: Some("  zelda ".to_string()),
            genre: Some(4),
            ordering: Some("-metacritic".to_string()),
            year: Some(2017),
            page: Some(2),
            ..Default::default()
        };
        let query = filters.to_query().unwrap();

        assert_eq!(query.search.as_deref(), Some("zelda"));
        assert_eq!(query.genre, Some(4));
        assert_eq!(query.ordering, Some(GameOrdering::MetacriticDesc));
        assert_eq!(query.dates.unwrap().to_query_value(), "2017-01-01,2017-12-31");
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn test_browse_filters_reject_unknown_ordering() {
        let filters = BrowseFiltersDto {
            ordering: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(matches!(filters.to_query(), Err(AppError::Domain(_))));
    }

    #[test]
    fn test_entry_dto_flattens_names() {
        let mut game = Game::new(1, "Hades");
        game.genres = vec![NamedRef::new(4, "Action"), NamedRef::new(51, "Indie")];
        let entry = FavoriteEntry::capture(GameSnapshot::from(&game));

        let dto = FavoriteEntryDto::from(entry);
        assert_eq!(dto.genres, vec!["Action".to_string(), "Indie".to_string()]);
        assert!(dto.platforms.is_empty());
    }
}
