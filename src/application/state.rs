// src/application/state.rs

use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, get_connection, initialize_database, verify_database_integrity,
};
use crate::error::AppResult;
use crate::events::{create_event_bus, EventBus};
use crate::integrations::CatalogApi;
use crate::repositories::{
    InMemoryKeyValueRepository, KeyValueRepository, SqliteKeyValueRepository,
};
use crate::services::{CatalogService, FavoritesStore};

/// Application state handed to every command.
/// Built once at start-up; all fields are Arc-wrapped for sharing across tasks.
pub struct AppState {
    pub config: AppConfig,
    pub event_bus: Arc<EventBus>,
    pub favorites: Arc<FavoritesStore>,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        event_bus: Arc<EventBus>,
        favorites: Arc<FavoritesStore>,
        catalog: Arc<CatalogService>,
    ) -> Self {
        Self {
            config,
            event_bus,
            favorites,
            catalog,
        }
    }

    /// Wire the services over the given storage and catalog backends
    ///
    /// Opening the favorites store hydrates it from `storage`.
    pub fn assemble(
        config: AppConfig,
        storage: Arc<dyn KeyValueRepository>,
        api: Arc<dyn CatalogApi>,
    ) -> Self {
        let event_bus = Arc::new(create_event_bus());
        let favorites = Arc::new(FavoritesStore::open(storage, Arc::clone(&event_bus)));
        let catalog = Arc::new(CatalogService::new(
            api,
            Arc::clone(&event_bus),
            config.page_size,
        ));

        Self::new(config, event_bus, favorites, catalog)
    }
}

/// Storage backend for the collections
///
/// A database that cannot be opened, migrated or verified is logged once and
/// replaced by in-memory storage; collections then last for this run only.
pub fn open_storage(config: &AppConfig, in_memory: bool) -> Arc<dyn KeyValueRepository> {
    if in_memory {
        log::info!("Collections kept in memory for this run");
        return Arc::new(InMemoryKeyValueRepository::new());
    }

    let db_path = config.database_path();
    match open_database(&db_path) {
        Ok(repository) => Arc::new(repository),
        Err(e) => {
            log::error!(
                "Collections database at {} is unusable, keeping collections in memory: {}",
                db_path.display(),
                e
            );
            Arc::new(InMemoryKeyValueRepository::new())
        }
    }
}

fn open_database(db_path: &Path) -> AppResult<SqliteKeyValueRepository> {
    let pool = Arc::new(create_connection_pool(db_path)?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }
    Ok(SqliteKeyValueRepository::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{add_favorite, list_genres};
    use crate::domain::{Game, GameDetails};
    use crate::error::AppError;
    use crate::integrations::MockCatalogApi;
    use crate::services::FAVORITES_KEY;

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig {
            data_dir: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_open_storage_uses_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let storage = open_storage(&config, false);
        storage.set(FAVORITES_KEY, "[]").unwrap();

        assert!(config.database_path().exists());
        let reopened = open_storage(&config, false);
        assert_eq!(reopened.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_unusable_data_dir_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();
        let config = config_in(&blocker.join("gamehub"));

        let storage = open_storage(&config, false);

        storage.set(FAVORITES_KEY, "[]").unwrap();
        assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(!config.database_path().exists());
    }

    #[test]
    fn test_memory_flag_skips_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let storage = open_storage(&config, true);
        storage.set(FAVORITES_KEY, "[]").unwrap();

        assert!(!config.database_path().exists());
    }

    #[tokio::test]
    async fn test_commands_run_without_database() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();
        let config = config_in(&blocker.join("gamehub"));

        let mut api = MockCatalogApi::new();
        api.expect_genres()
            .returning(|| Err(AppError::Upstream { status: 503 }));
        api.expect_game_details().returning(|id| {
            Ok(GameDetails {
                game: Game::new(id, "Hollow Knight"),
                description: None,
                description_raw: None,
                website: None,
                playtime: None,
                developers: Vec::new(),
                publishers: Vec::new(),
            })
        });

        let storage = open_storage(&config, false);
        let state = AppState::assemble(config, storage, Arc::new(api));

        let genres = list_genres(&state).await.unwrap();
        assert!(genres.failed);
        assert!(genres.results.is_empty());

        let added = add_favorite(&state, 9).await.unwrap();
        assert!(added.is_favorite);
        assert_eq!(state.favorites.total_favorites(), 1);
    }
}
