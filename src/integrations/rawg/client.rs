// src/integrations/rawg/client.rs
//
// RAWG catalog API client
//
// ARCHITECTURE:
// - Plain HTTP GETs against a JSON REST API
// - Maps HTTP outcomes to AppError (404 -> NotFound, other non-2xx -> Upstream)
// - Returns catalog value types; never touches the favorites store
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - No fallbacks here; the service layer decides what a failure means

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::{
    CatalogId, Game, GameDetails, GameQuery, Genre, Page, Platform, Screenshot, Store, Trailer,
};
use crate::error::{AppError, AppResult};
use crate::integrations::catalog_api::CatalogApi;

pub struct RawgClient {
    base_url: String,
    api_key: Option<String>,
    http_client: Client,
}

impl RawgClient {
    /// Create a client from application configuration
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Self::with_base_url(&config.api_base_url, config.api_key.clone(), config.request_timeout)
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamehub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // INTERNAL: request execution
    // ========================================================================

    async fn get_json<T>(&self, path: &str, params: &[(&'static str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {} {:?}", path, params);

        let mut request = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json");

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogApi for RawgClient {
    async fn list_games(&self, query: &GameQuery) -> AppResult<Page<Game>> {
        self.get_json("/games", &query.to_params()).await
    }

    async fn game_details(&self, id: CatalogId) -> AppResult<GameDetails> {
        self.get_json(&format!("/games/{}", id), &[]).await
    }

    async fn screenshots(&self, id: CatalogId) -> AppResult<Page<Screenshot>> {
        self.get_json(&format!("/games/{}/screenshots", id), &[]).await
    }

    async fn trailers(&self, id: CatalogId) -> AppResult<Page<Trailer>> {
        self.get_json(&format!("/games/{}/movies", id), &[]).await
    }

    async fn genres(&self) -> AppResult<Page<Genre>> {
        self.get_json("/genres", &[]).await
    }

    async fn platforms(&self) -> AppResult<Page<Platform>> {
        self.get_json("/platforms", &[]).await
    }

    async fn stores(&self) -> AppResult<Page<Store>> {
        self.get_json("/stores", &[]).await
    }
}
