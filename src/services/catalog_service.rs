// src/services/catalog_service.rs
//
// Catalog gateway
//
// Shapes listing queries and decides what a failed request means:
// - List-style and secondary queries never fail; they return FetchOutcome
//   with an empty fallback and the failure is logged once and published
// - Single-game detail lookups propagate errors so callers can tell
//   "not found" apart from "empty"

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};

use crate::domain::{
    CatalogId, DateRange, Game, GameDetails, GameOrdering, GameQuery, Genre, Page, Platform,
    ReleaseWindow, Screenshot, Store, TopCategory, Trailer,
};
use crate::error::{AppError, AppResult};
use crate::events::{CatalogRequestFailed, EventBus};
use crate::integrations::CatalogApi;

const SHOWCASE_PAGE_SIZE: u32 = 10;
const SIMILAR_GENRE_POOL: u32 = 10;
const SIMILAR_FALLBACK_POOL: u32 = 7;
const SIMILAR_LIMIT: usize = 6;
const REVIEW_FEED_SIZE: u32 = 6;

/// Result of a request whose failure is absorbed
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    Failed { fallback: T, reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        !self.is_loaded()
    }

    pub fn value(&self) -> &T {
        match self {
            FetchOutcome::Loaded(value) => value,
            FetchOutcome::Failed { fallback, .. } => fallback,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            FetchOutcome::Loaded(value) => value,
            FetchOutcome::Failed { fallback, .. } => fallback,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Loaded(_) => None,
            FetchOutcome::Failed { reason, .. } => Some(reason),
        }
    }

    pub fn map<U, F>(self, f: F) -> FetchOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            FetchOutcome::Loaded(value) => FetchOutcome::Loaded(f(value)),
            FetchOutcome::Failed { fallback, reason } => FetchOutcome::Failed {
                fallback: f(fallback),
                reason,
            },
        }
    }
}

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
    event_bus: Arc<EventBus>,
    page_size: u32,
    clock: fn() -> NaiveDate,
}

impl CatalogService {
    pub fn new(api: Arc<dyn CatalogApi>, event_bus: Arc<EventBus>, page_size: u32) -> Self {
        Self {
            api,
            event_bus,
            page_size,
            clock: local_today,
        }
    }

    /// Replace the source of "today" used for date windows
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // ========================================================================
    // LISTINGS
    // ========================================================================

    /// Any listing; the configured page size applies unless the query sets one
    pub async fn browse(&self, query: GameQuery) -> FetchOutcome<Page<Game>> {
        self.list("browse", query).await
    }

    /// Most added games released from January last year to the end of this year
    pub async fn new_and_trending(&self, page: u32) -> FetchOutcome<Page<Game>> {
        let year = self.today().year();
        let query = match DateRange::years(year - 1, year) {
            Ok(range) => GameQuery::new().dates(range),
            Err(_) => GameQuery::new(),
        };
        self.list(
            "new_and_trending",
            query.ordering(GameOrdering::RecentlyAdded).page(page),
        )
        .await
    }

    pub async fn top_games(&self, page: u32) -> FetchOutcome<Page<Game>> {
        self.list(
            "top_games",
            GameQuery::new().ordering(GameOrdering::MetacriticDesc).page(page),
        )
        .await
    }

    pub async fn popular_games(&self, page: u32) -> FetchOutcome<Page<Game>> {
        self.list(
            "popular_games",
            GameQuery::new().ordering(GameOrdering::RatingDesc).page(page),
        )
        .await
    }

    pub async fn games_by_genre(
        &self,
        genre: CatalogId,
        ordering: Option<GameOrdering>,
        page: u32,
    ) -> FetchOutcome<Page<Game>> {
        let mut query = GameQuery::new().genre(genre).page(page);
        query.ordering = ordering;
        self.list("games_by_genre", query).await
    }

    pub async fn games_by_platform(
        &self,
        platform: CatalogId,
        ordering: Option<GameOrdering>,
        page: u32,
    ) -> FetchOutcome<Page<Game>> {
        let mut query = GameQuery::new().platform(platform).page(page);
        query.ordering = ordering;
        self.list("games_by_platform", query).await
    }

    pub async fn search_games(&self, text: &str, page: u32) -> FetchOutcome<Page<Game>> {
        self.list("search_games", GameQuery::new().search(text).page(page))
            .await
    }

    pub async fn games_by_year(&self, year: i32, page: u32) -> FetchOutcome<Page<Game>> {
        match DateRange::year(year) {
            Ok(range) => {
                self.list(
                    "games_by_year",
                    GameQuery::new()
                        .dates(range)
                        .ordering(GameOrdering::RecentlyAdded)
                        .page(page),
                )
                .await
            }
            Err(e) => self.absorb("games_by_year", Err(AppError::Domain(e)), Page::empty),
        }
    }

    /// Games released inside a named window, relative to today
    pub async fn releases(&self, window: ReleaseWindow, page: u32) -> FetchOutcome<Page<Game>> {
        let query = window.query(self.today()).page(page);
        self.list("releases", query).await
    }

    /// Games released this week (Sunday to Saturday), most added first
    pub async fn this_week_releases(&self) -> FetchOutcome<Page<Game>> {
        let query = ReleaseWindow::CurrentWeek
            .query(self.today())
            .page_size(SHOWCASE_PAGE_SIZE);
        self.list("this_week_releases", query).await
    }

    /// Releases over the next twelve months, soonest first
    ///
    /// If that request fails, the most recent releases are returned instead.
    pub async fn upcoming_releases(&self) -> FetchOutcome<Page<Game>> {
        let query = ReleaseWindow::NextTwelveMonths
            .query(self.today())
            .page_size(SHOWCASE_PAGE_SIZE);

        match self.api.list_games(&query).await {
            Ok(page) => FetchOutcome::Loaded(page),
            Err(e) => {
                log::warn!("Upcoming releases not available, using recent games: {}", e);
                let fallback = GameQuery::new()
                    .ordering(GameOrdering::ReleaseDateDesc)
                    .page_size(SHOWCASE_PAGE_SIZE);
                let result = self.api.list_games(&fallback).await;
                self.absorb("upcoming_releases", result, Page::empty)
            }
        }
    }

    pub async fn top_category(&self, category: TopCategory) -> FetchOutcome<Page<Game>> {
        match category.query() {
            Ok(query) => self.list("top_category", query).await,
            Err(e) => self.absorb("top_category", Err(AppError::Domain(e)), Page::empty),
        }
    }

    /// Latest releases shown on the reviews page
    pub async fn recent_releases_for_reviews(&self) -> FetchOutcome<Page<Game>> {
        let query = GameQuery::new()
            .ordering(GameOrdering::ReleaseDateDesc)
            .page_size(REVIEW_FEED_SIZE);
        self.list("recent_releases_for_reviews", query).await
    }

    // ========================================================================
    // REFERENCE DATA
    // ========================================================================

    pub async fn genres(&self) -> FetchOutcome<Page<Genre>> {
        let result = self.api.genres().await;
        self.absorb("genres", result, Page::empty)
    }

    pub async fn platforms(&self) -> FetchOutcome<Page<Platform>> {
        let result = self.api.platforms().await;
        self.absorb("platforms", result, Page::empty)
    }

    pub async fn stores(&self) -> FetchOutcome<Page<Store>> {
        let result = self.api.stores().await;
        self.absorb("stores", result, Page::empty)
    }

    // ========================================================================
    // SINGLE GAME
    // ========================================================================

    /// Detail record; `AppError::NotFound` for unknown ids
    pub async fn game_details(&self, id: CatalogId) -> AppResult<GameDetails> {
        self.api.game_details(id).await.map_err(|e| {
            match &e {
                AppError::NotFound => log::info!("Game {} not found", id),
                other => log::error!("Error fetching game details for {}: {}", id, other),
            }
            e
        })
    }

    pub async fn screenshots(&self, id: CatalogId) -> FetchOutcome<Page<Screenshot>> {
        let result = self.api.screenshots(id).await;
        self.absorb("screenshots", result, Page::empty)
    }

    pub async fn trailers(&self, id: CatalogId) -> FetchOutcome<Page<Trailer>> {
        let result = self.api.trailers(id).await;
        self.absorb("trailers", result, Page::empty)
    }

    /// Up to six games sharing the first genre of `id`, best rated first
    ///
    /// Games without genres get the best rated games overall. The game
    /// itself is never part of the result.
    pub async fn similar_games(&self, id: CatalogId) -> FetchOutcome<Page<Game>> {
        let result = self.find_similar(id).await;
        self.absorb("similar_games", result, Page::empty)
    }

    async fn find_similar(&self, id: CatalogId) -> AppResult<Page<Game>> {
        let details = self.api.game_details(id).await?;

        let query = match details.game.genres.first() {
            Some(genre) => GameQuery::new()
                .genre(genre.id)
                .page_size(SIMILAR_GENRE_POOL)
                .ordering(GameOrdering::RatingDesc),
            None => GameQuery::new()
                .ordering(GameOrdering::RatingDesc)
                .page_size(SIMILAR_FALLBACK_POOL),
        };

        let candidates = self.api.list_games(&query).await?;
        let similar = candidates
            .results
            .into_iter()
            .filter(|game| game.id != id)
            .take(SIMILAR_LIMIT)
            .collect();

        Ok(Page::from_results(similar))
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    async fn list(&self, operation: &str, query: GameQuery) -> FetchOutcome<Page<Game>> {
        let query = query.with_default_page_size(self.page_size);
        let result = self.api.list_games(&query).await;
        self.absorb(operation, result, Page::empty)
    }

    fn absorb<T, F>(&self, operation: &str, result: AppResult<T>, fallback: F) -> FetchOutcome<T>
    where
        F: FnOnce() -> T,
    {
        match result {
            Ok(value) => FetchOutcome::Loaded(value),
            Err(e) => {
                log::warn!("Catalog request {} failed: {}", operation, e);
                let reason = e.to_string();
                self.event_bus
                    .emit(CatalogRequestFailed::new(operation.to_string(), reason.clone()));
                FetchOutcome::Failed {
                    fallback: fallback(),
                    reason,
                }
            }
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamedRef;
    use crate::integrations::MockCatalogApi;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed_today() -> NaiveDate {
        // Wednesday
        NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
    }

    fn service(api: MockCatalogApi) -> (CatalogService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let service = CatalogService::new(Arc::new(api), Arc::clone(&bus), 20).with_clock(fixed_today);
        (service, bus)
    }

    fn games(ids: &[CatalogId]) -> Page<Game> {
        Page {
            count: ids.len() as u64,
            next: Some("https://api.rawg.io/api/games?page=2".to_string()),
            previous: None,
            results: ids.iter().map(|id| Game::new(*id, format!("Game {}", id))).collect(),
        }
    }

    fn details(id: CatalogId, genres: Vec<NamedRef>) -> GameDetails {
        let mut game = Game::new(id, "Subject");
        game.genres = genres;
        GameDetails {
            game,
            description: None,
            description_raw: None,
            website: None,
            playtime: None,
            developers: Vec::new(),
            publishers: Vec::new(),
        }
    }

    fn param(query: &GameQuery, name: &str) -> Option<String> {
        query
            .to_params()
            .into_iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    #[tokio::test]
    async fn test_top_games_query() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| {
                q.ordering == Some(GameOrdering::MetacriticDesc)
                    && q.page == Some(2)
                    && q.page_size == Some(20)
            })
            .times(1)
            .returning(|_| Ok(games(&[1, 2])));

        let (service, _) = service(api);
        let outcome = service.top_games(2).await;

        assert!(outcome.is_loaded());
        assert!(outcome.value().has_next());
        assert_eq!(outcome.into_inner().results.len(), 2);
    }

    #[tokio::test]
    async fn test_list_failure_becomes_empty_fallback() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .returning(|_| Err(AppError::Upstream { status: 500 }));

        let (service, bus) = service(api);
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&failures);
        bus.subscribe::<CatalogRequestFailed, _>(move |event| {
            assert_eq!(event.operation, "search_games");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = service.search_games("portal", 1).await;

        assert!(outcome.is_failed());
        assert!(outcome.value().is_empty());
        assert!(!outcome.value().has_next());
        assert_eq!(outcome.failure_reason(), Some("Catalog service returned status 500"));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_genuinely_empty_is_not_failure() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games().returning(|_| Ok(Page::empty()));

        let (service, _) = service(api);
        let outcome = service.search_games("zzzzzz", 1).await;

        assert!(outcome.is_loaded());
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn test_new_and_trending_date_range() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| {
                param(q, "dates").as_deref() == Some("2024-01-01,2025-12-31")
                    && q.ordering == Some(GameOrdering::RecentlyAdded)
            })
            .returning(|_| Ok(games(&[1])));

        let (service, _) = service(api);
        assert!(service.new_and_trending(1).await.is_loaded());
    }

    #[tokio::test]
    async fn test_genre_listing_keeps_ordering() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| q.genre == Some(4) && q.ordering == Some(GameOrdering::NameAsc))
            .returning(|_| Ok(games(&[1])));

        let (service, _) = service(api);
        let outcome = service.games_by_genre(4, Some(GameOrdering::NameAsc), 1).await;
        assert!(outcome.is_loaded());
    }

    #[tokio::test]
    async fn test_this_week_releases_window() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| {
                param(q, "dates").as_deref() == Some("2025-06-08,2025-06-14")
                    && q.ordering == Some(GameOrdering::RecentlyAdded)
                    && q.page_size == Some(10)
            })
            .returning(|_| Ok(games(&[1])));

        let (service, _) = service(api);
        assert!(service.this_week_releases().await.is_loaded());
    }

    #[tokio::test]
    async fn test_upcoming_falls_back_to_recent_releases() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| q.ordering == Some(GameOrdering::ReleaseDateAsc))
            .times(1)
            .returning(|_| Err(AppError::Upstream { status: 503 }));
        api.expect_list_games()
            .withf(|q| {
                q.ordering == Some(GameOrdering::ReleaseDateDesc)
                    && q.dates.is_none()
                    && q.page_size == Some(10)
            })
            .times(1)
            .returning(|_| Ok(games(&[7, 8])));

        let (service, _) = service(api);
        let outcome = service.upcoming_releases().await;

        assert!(outcome.is_loaded());
        assert_eq!(outcome.value().results.len(), 2);
    }

    #[tokio::test]
    async fn test_upcoming_double_failure_is_empty() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .times(2)
            .returning(|_| Err(AppError::Upstream { status: 503 }));

        let (service, _) = service(api);
        let outcome = service.upcoming_releases().await;

        assert!(outcome.is_failed());
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn test_release_window_query() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| {
                param(q, "dates").as_deref() == Some("2025-07-01,2025-07-31")
                    && q.ordering == Some(GameOrdering::ReleaseDateDesc)
            })
            .returning(|_| Ok(games(&[1])));

        let (service, _) = service(api);
        assert!(service.releases(ReleaseWindow::NextMonth, 1).await.is_loaded());
    }

    #[tokio::test]
    async fn test_top_category_all_time_page_size() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games()
            .withf(|q| q.page_size == Some(40) && q.ordering == Some(GameOrdering::RatingDesc))
            .returning(|_| Ok(games(&[1])));

        let (service, _) = service(api);
        assert!(service.top_category(TopCategory::AllTime).await.is_loaded());
    }

    #[tokio::test]
    async fn test_similar_games_by_first_genre() {
        let mut api = MockCatalogApi::new();
        api.expect_game_details()
            .with(eq(3))
            .returning(|id| Ok(details(id, vec![NamedRef::new(4, "Action"), NamedRef::new(5, "RPG")])));
        api.expect_list_games()
            .withf(|q| {
                q.genre == Some(4)
                    && q.page_size == Some(10)
                    && q.ordering == Some(GameOrdering::RatingDesc)
            })
            .returning(|_| Ok(games(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10])));

        let (service, _) = service(api);
        let similar = service.similar_games(3).await.into_inner();

        let ids: Vec<CatalogId> = similar.results.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5, 6, 7]);
        assert!(!similar.has_next());
    }

    #[tokio::test]
    async fn test_similar_games_without_genres() {
        let mut api = MockCatalogApi::new();
        api.expect_game_details()
            .returning(|id| Ok(details(id, Vec::new())));
        api.expect_list_games()
            .withf(|q| q.genre.is_none() && q.page_size == Some(7))
            .returning(|_| Ok(games(&[9, 1, 2])));

        let (service, _) = service(api);
        let ids: Vec<CatalogId> = service
            .similar_games(9)
            .await
            .into_inner()
            .results
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_similar_games_absorbs_missing_game() {
        let mut api = MockCatalogApi::new();
        api.expect_game_details().returning(|_| Err(AppError::NotFound));
        api.expect_list_games().never();

        let (service, _) = service(api);
        let outcome = service.similar_games(404).await;
        assert!(outcome.is_failed());
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn test_game_details_propagates_not_found() {
        let mut api = MockCatalogApi::new();
        api.expect_game_details().returning(|_| Err(AppError::NotFound));

        let (service, bus) = service(api);
        let err = service.game_details(1).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
        assert!(bus.get_event_log().is_empty());
    }

    #[tokio::test]
    async fn test_secondary_queries_absorb_failures() {
        let mut api = MockCatalogApi::new();
        api.expect_screenshots()
            .returning(|_| Err(AppError::Upstream { status: 500 }));
        api.expect_trailers()
            .returning(|_| Err(AppError::Other("connection reset".to_string())));
        api.expect_genres()
            .returning(|| Err(AppError::Upstream { status: 401 }));

        let (service, bus) = service(api);

        assert!(service.screenshots(1).await.is_failed());
        assert!(service.trailers(1).await.value().is_empty());
        assert!(service.genres().await.is_failed());
        assert_eq!(bus.get_event_log().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_year_is_absorbed() {
        let mut api = MockCatalogApi::new();
        api.expect_list_games().never();

        let (service, _) = service(api);
        let outcome = service.games_by_year(i32::MAX, 1).await;
        assert!(outcome.is_failed());
    }

    #[test]
    fn test_fetch_outcome_map() {
        let failed: FetchOutcome<Vec<u8>> = FetchOutcome::Failed {
            fallback: Vec::new(),
            reason: "offline".to_string(),
        };
        let mapped = failed.map(|v| v.len());
        assert_eq!(mapped.value(), &0);
        assert_eq!(mapped.failure_reason(), Some("offline"));

        let loaded = FetchOutcome::Loaded(vec![1u8, 2]).map(|v| v.len());
        assert_eq!(loaded, FetchOutcome::Loaded(2));
    }
}
