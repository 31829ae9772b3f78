// events/types.rs
//
// All events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CatalogId, CollectionKind};

/// Trait that all events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// COLLECTION EVENTS
// ============================================================================

/// A game joined the favorites sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: CatalogId,
    pub name: String,
    pub total: usize,
}

impl FavoriteAdded {
    pub fn new(game_id: CatalogId, name: String, total: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            name,
            total,
        }
    }
}

impl DomainEvent for FavoriteAdded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FavoriteAdded" }
}

/// A game left the favorites sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: CatalogId,
    pub total: usize,
}

impl FavoriteRemoved {
    pub fn new(game_id: CatalogId, total: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            total,
        }
    }
}

impl DomainEvent for FavoriteRemoved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FavoriteRemoved" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: CatalogId,
    pub name: String,
    pub total: usize,
}

impl WishlistAdded {
    pub fn new(game_id: CatalogId, name: String, total: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            name,
            total,
        }
    }
}

impl DomainEvent for WishlistAdded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "WishlistAdded" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: CatalogId,
    pub total: usize,
}

impl WishlistRemoved {
    pub fn new(game_id: CatalogId, total: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            total,
        }
    }
}

impl DomainEvent for WishlistRemoved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "WishlistRemoved" }
}

/// Both sequences were emptied; counts are what was dropped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub favorites_removed: usize,
    pub wishlist_removed: usize,
}

impl CollectionsCleared {
    pub fn new(favorites_removed: usize, wishlist_removed: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            favorites_removed,
            wishlist_removed,
        }
    }
}

impl DomainEvent for CollectionsCleared {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CollectionsCleared" }
}

/// Startup hydration finished
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsHydrated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub favorites: usize,
    pub wishlist: usize,
}

impl CollectionsHydrated {
    pub fn new(favorites: usize, wishlist: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            favorites,
            wishlist,
        }
    }
}

impl DomainEvent for CollectionsHydrated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CollectionsHydrated" }
}

// ============================================================================
// ABSORBED FAILURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageOperation {
    Read,
    Decode,
    Encode,
    Write,
}

/// A storage read or write failed and was swallowed; memory stays authoritative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub operation: StorageOperation,
    pub key: String,
    pub collection: Option<CollectionKind>,
    pub message: String,
}

impl StorageFailed {
    pub fn new(
        operation: StorageOperation,
        key: String,
        collection: Option<CollectionKind>,
        message: String,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            operation,
            key,
            collection,
            message,
        }
    }
}

impl DomainEvent for StorageFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "StorageFailed" }
}

/// A catalog request failed and the caller received a fallback value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRequestFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub operation: String,
    pub reason: String,
}

impl CatalogRequestFailed {
    pub fn new(operation: String, reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            operation,
            reason,
        }
    }
}

impl DomainEvent for CatalogRequestFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogRequestFailed" }
}
