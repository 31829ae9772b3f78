// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod catalog;
pub mod favorites;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog (read-only snapshots of the external service)
pub use catalog::{
    CatalogId, DateRange, Game, GameDetails, GameOrdering, GameQuery, Genre, MetacriticRange,
    NamedRef, Page, Platform, PlatformRef, ReleaseWindow, Screenshot, Store, TopCategory, Trailer,
};

// Favorites / wishlist
pub use favorites::{
    reduce, validate_collection_state, CollectionAction, CollectionKind, CollectionState,
    FavoriteEntry, GameSnapshot, PersistedCollections,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
