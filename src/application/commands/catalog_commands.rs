// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers
//
// Listings never fail at this boundary: a failed request comes back as an
// empty page with `failed` set. Only game details and bad input produce errors.

use chrono::Datelike;

use crate::application::{
    dto::*,
    error_handling::{validation_error, ToErrorResponse},
    state::AppState,
};
use crate::domain::{CatalogId, DomainError, Game, GameOrdering, Page, ReleaseWindow, TopCategory};
use crate::services::FetchOutcome;

/// Trending, top rated, this week and upcoming, fetched concurrently
pub async fn get_home_feed(state: &AppState) -> Result<HomeFeedDto, String> {
    let catalog = &state.catalog;
    let (trending, top_rated, this_week, upcoming) = tokio::join!(
        catalog.new_and_trending(1),
        catalog.top_games(1),
        catalog.this_week_releases(),
        catalog.upcoming_releases(),
    );

    Ok(HomeFeedDto {
        trending: cards(state, trending),
        top_rated: cards(state, top_rated),
        this_week: cards(state, this_week),
        upcoming: cards(state, upcoming),
    })
}

pub async fn browse_games(
    state: &AppState,
    filters: BrowseFiltersDto,
) -> Result<PageDto<GameCardDto>, String> {
    let query = filters.to_query().to_error_response()?;
    Ok(cards(state, state.catalog.browse(query).await))
}

pub async fn search_games(
    state: &AppState,
    text: String,
    page: u32,
) -> Result<PageDto<GameCardDto>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(validation_error("Search text cannot be empty"));
    }
    Ok(cards(state, state.catalog.search_games(text, page).await))
}

pub async fn get_top_games(state: &AppState, page: u32) -> Result<PageDto<GameCardDto>, String> {
    Ok(cards(state, state.catalog.top_games(page).await))
}

pub async fn get_popular_games(
    state: &AppState,
    page: u32,
) -> Result<PageDto<GameCardDto>, String> {
    Ok(cards(state, state.catalog.popular_games(page).await))
}

pub async fn get_games_by_genre(
    state: &AppState,
    genre_id: CatalogId,
    ordering: Option<String>,
    page: u32,
) -> Result<PageDto<GameCardDto>, String> {
    let ordering = parse_ordering(ordering)?;
    Ok(cards(
        state,
        state.catalog.games_by_genre(genre_id, ordering, page).await,
    ))
}

pub async fn get_games_by_platform(
    state: &AppState,
    platform_id: CatalogId,
    ordering: Option<String>,
    page: u32,
) -> Result<PageDto<GameCardDto>, String> {
    let ordering = parse_ordering(ordering)?;
    Ok(cards(
        state,
        state.catalog.games_by_platform(platform_id, ordering, page).await,
    ))
}

pub async fn get_games_by_year(
    state: &AppState,
    year: i32,
    page: u32,
) -> Result<PageDto<GameCardDto>, String> {
    Ok(cards(state, state.catalog.games_by_year(year, page).await))
}

pub async fn get_game_details(
    state: &AppState,
    game_id: CatalogId,
) -> Result<GameDetailsDto, String> {
    let details = state.catalog.game_details(game_id).await.to_error_response()?;
    Ok(GameDetailsDto::from_details(&details, &state.favorites))
}

/// Screenshots, trailers and similar games, fetched concurrently
pub async fn get_game_media(state: &AppState, game_id: CatalogId) -> Result<GameMediaDto, String> {
    let catalog = &state.catalog;
    let (screenshots, trailers, similar) = tokio::join!(
        catalog.screenshots(game_id),
        catalog.trailers(game_id),
        catalog.similar_games(game_id),
    );

    Ok(GameMediaDto {
        game_id,
        screenshots: PageDto::from_outcome(screenshots, |s| ScreenshotDto::from(s)),
        trailers: PageDto::from_outcome(trailers, |t| TrailerDto::from(t)),
        similar: cards(state, similar),
    })
}

pub async fn list_genres(state: &AppState) -> Result<PageDto<CatalogRefDto>, String> {
    Ok(PageDto::from_outcome(state.catalog.genres().await, |r| CatalogRefDto::from(r)))
}

pub async fn list_platforms(state: &AppState) -> Result<PageDto<CatalogRefDto>, String> {
    Ok(PageDto::from_outcome(state.catalog.platforms().await, |r| CatalogRefDto::from(r)))
}

pub async fn list_stores(state: &AppState) -> Result<PageDto<CatalogRefDto>, String> {
    Ok(PageDto::from_outcome(state.catalog.stores().await, |r| CatalogRefDto::from(r)))
}

/// Release calendar for a named window (`last-30-days`, `next-month`, ...)
pub async fn get_release_calendar(
    state: &AppState,
    window: String,
    page: u32,
) -> Result<PageDto<GameCardDto>, String> {
    let window: ReleaseWindow = window
        .parse()
        .map_err(|e: DomainError| validation_error(e.to_string()))?;
    Ok(cards(state, state.catalog.releases(window, page).await))
}

/// Curated top list: `best`, `popular` (both for a year, current by default) or `all-time`
pub async fn get_top_category(
    state: &AppState,
    category: String,
    year: Option<i32>,
) -> Result<PageDto<GameCardDto>, String> {
    let year = year.unwrap_or_else(|| state.catalog.today().year());
    let category = match category.trim() {
        "best" | "best-of-year" => TopCategory::BestOfYear(year),
        "popular" | "popular-in-year" => TopCategory::PopularInYear(year),
        "all-time" => TopCategory::AllTime,
        other => return Err(validation_error(format!("Unknown top category '{}'", other))),
    };
    Ok(cards(state, state.catalog.top_category(category).await))
}

pub async fn get_reviews_feed(state: &AppState) -> Result<PageDto<GameCardDto>, String> {
    Ok(cards(state, state.catalog.recent_releases_for_reviews().await))
}

// ============================================================================
// HELPERS
// ============================================================================

fn cards(state: &AppState, outcome: FetchOutcome<Page<Game>>) -> PageDto<GameCardDto> {
    PageDto::from_outcome(outcome, |game| GameCardDto::from_game(game, &state.favorites))
}

fn parse_ordering(raw: Option<String>) -> Result<Option<GameOrdering>, String> {
    raw.filter(|r| !r.trim().is_empty())
        .map(|r| r.parse::<GameOrdering>())
        .transpose()
        .map_err(|e| validation_error(e.to_string()))
}
