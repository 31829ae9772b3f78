// src/integrations/catalog_api.rs
//
// Read-only contract of the external catalog service.
// Implementations return raw outcomes; fallback policy belongs to the
// service layer, not here.

use async_trait::async_trait;

use crate::domain::{
    CatalogId, Game, GameDetails, GameQuery, Genre, Page, Platform, Screenshot, Store, Trailer,
};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// One page of games matching the query
    async fn list_games(&self, query: &GameQuery) -> AppResult<Page<Game>>;

    /// Detail record; `AppError::NotFound` when the id is unknown
    async fn game_details(&self, id: CatalogId) -> AppResult<GameDetails>;

    async fn screenshots(&self, id: CatalogId) -> AppResult<Page<Screenshot>>;

    async fn trailers(&self, id: CatalogId) -> AppResult<Page<Trailer>>;

    async fn genres(&self) -> AppResult<Page<Genre>>;

    async fn platforms(&self) -> AppResult<Page<Platform>>;

    async fn stores(&self) -> AppResult<Page<Store>>;
}
