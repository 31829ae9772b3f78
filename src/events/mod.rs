// src/events/mod.rs
//
// Internal Event System - Public API
//
// The bus is the notification channel for collection changes and the
// reporting channel for failures that are absorbed instead of returned.

pub mod bus;
pub mod types;

pub use types::{
    // Failures
    CatalogRequestFailed,
    // Collections
    CollectionsCleared,
    CollectionsHydrated,
    DomainEvent,
    FavoriteAdded,
    FavoriteRemoved,
    StorageFailed,
    StorageOperation,
    WishlistAdded,
    WishlistRemoved,
};

pub use bus::{EventBus, EventLogEntry};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
