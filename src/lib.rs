// src/lib.rs
// GameHub - Game discovery client with a persistent favorites and wishlist store
//
// Architecture:
// - Domain-centric: collection rules live in a pure reducer, catalog queries in value types
// - Event-driven: collection changes and absorbed failures are published on the event bus
// - Explicit: every dependency is wired once at start-up and passed down
// - Local-first: favorites and wishlist live on this machine only

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// INTEGRATIONS & APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    reduce,
    validate_collection_state,
    // Catalog
    CatalogId,
    // Favorites
    CollectionAction,
    CollectionKind,
    CollectionState,
    DateRange,
    DomainError,
    FavoriteEntry,
    Game,
    GameDetails,
    GameOrdering,
    GameQuery,
    GameSnapshot,
    Page,
    PersistedCollections,
    ReleaseWindow,
    TopCategory,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::AppConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    CatalogRequestFailed,
    CollectionsCleared,
    CollectionsHydrated,
    DomainEvent,
    EventBus,
    EventLogEntry,
    FavoriteAdded,
    FavoriteRemoved,
    StorageFailed,
    WishlistAdded,
    WishlistRemoved,
};

// ============================================================================
// PUBLIC API - Storage
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    InMemoryKeyValueRepository, KeyValueRepository, SqliteKeyValueRepository,
};

// ============================================================================
// PUBLIC API - Services & Integrations
// ============================================================================

pub use integrations::{CatalogApi, RawgClient};
pub use services::{CatalogService, FavoritesStore, FetchOutcome};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};
