// src/services/favorites_service.rs
//
// Favorites / wishlist store
//
// ARCHITECTURE:
// - Owns the CollectionState; nothing else can mutate it
// - Every mutation goes through `reduce`
// - Storage is written after each transition, only for sequences that changed
// - Storage failures are logged and published on the bus, never returned
// - Events are emitted after the state lock is released

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{
    reduce, validate_collection_state, CatalogId, CollectionAction, CollectionKind,
    CollectionState, FavoriteEntry, GameSnapshot, PersistedCollections,
};
use crate::events::{
    CollectionsCleared, CollectionsHydrated, EventBus, FavoriteAdded, FavoriteRemoved,
    StorageFailed, StorageOperation, WishlistAdded, WishlistRemoved,
};
use crate::repositories::KeyValueRepository;

/// Storage key of the favorites sequence
pub const FAVORITES_KEY: &str = "rawg-favorites";

/// Storage key of the wishlist sequence
pub const WISHLIST_KEY: &str = "rawg-wishlist";

pub fn storage_key(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Favorites => FAVORITES_KEY,
        CollectionKind::Wishlist => WISHLIST_KEY,
    }
}

/// Membership change produced by one transition
#[derive(Debug)]
enum Change {
    Added(CollectionKind, CatalogId, String, usize),
    Removed(CollectionKind, CatalogId, usize),
    Cleared(usize, usize),
}

pub struct FavoritesStore {
    state: RwLock<CollectionState>,
    storage: Arc<dyn KeyValueRepository>,
    event_bus: Arc<EventBus>,
}

impl FavoritesStore {
    /// Create the store and hydrate it from storage
    ///
    /// Unreadable or undecodable keys are treated as absent; `open` never fails.
    pub fn open(storage: Arc<dyn KeyValueRepository>, event_bus: Arc<EventBus>) -> Self {
        let store = Self {
            state: RwLock::new(CollectionState::empty()),
            storage,
            event_bus,
        };
        store.hydrate();
        store
    }

    fn hydrate(&self) {
        let mut failures = Vec::new();
        let persisted = PersistedCollections {
            favorites: self.load_sequence(CollectionKind::Favorites, &mut failures),
            wishlist: self.load_sequence(CollectionKind::Wishlist, &mut failures),
        };

        let (favorites, wishlist) = {
            let mut state = self.write_state();
            if !persisted.is_empty() {
                let current = std::mem::take(&mut *state);
                *state = reduce(current, CollectionAction::Load(persisted));
            }
            if let Err(e) = validate_collection_state(&state) {
                log::error!("Hydrated collections are inconsistent: {}", e);
            }
            (state.favorites.len(), state.wishlist.len())
        };

        log::info!(
            "Loaded {} favorites and {} wishlist entries",
            favorites,
            wishlist
        );

        for failure in failures {
            self.event_bus.emit(failure);
        }
        self.event_bus.emit(CollectionsHydrated::new(favorites, wishlist));
    }

    fn load_sequence(
        &self,
        kind: CollectionKind,
        failures: &mut Vec<StorageFailed>,
    ) -> Option<Vec<FavoriteEntry>> {
        let key = storage_key(kind);

        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Error reading {} from storage: {}", kind, e);
                failures.push(StorageFailed::new(
                    StorageOperation::Read,
                    key.to_string(),
                    Some(kind),
                    e.to_string(),
                ));
                return None;
            }
        };

        match serde_json::from_str::<Vec<FavoriteEntry>>(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                log::error!("Ignoring unreadable {} data in storage: {}", kind, e);
                failures.push(StorageFailed::new(
                    StorageOperation::Decode,
                    key.to_string(),
                    Some(kind),
                    e.to_string(),
                ));
                None
            }
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Returns true if the game was not a favorite before
    pub fn add_favorite(&self, game: GameSnapshot) -> bool {
        self.add(CollectionKind::Favorites, game)
    }

    /// Returns true if the game was a favorite before
    pub fn remove_favorite(&self, id: CatalogId) -> bool {
        self.remove(CollectionKind::Favorites, id)
    }

    pub fn add_wishlist(&self, game: GameSnapshot) -> bool {
        self.add(CollectionKind::Wishlist, game)
    }

    pub fn remove_wishlist(&self, id: CatalogId) -> bool {
        self.remove(CollectionKind::Wishlist, id)
    }

    /// Flip favorite membership; returns the membership afterwards
    pub fn toggle_favorite(&self, game: GameSnapshot) -> bool {
        self.toggle(CollectionKind::Favorites, game)
    }

    /// Flip wishlist membership; returns the membership afterwards
    pub fn toggle_wishlist(&self, game: GameSnapshot) -> bool {
        self.toggle(CollectionKind::Wishlist, game)
    }

    pub fn clear_all(&self) {
        self.transition(|_| Some(CollectionAction::ClearAll));
    }

    pub fn add(&self, kind: CollectionKind, game: GameSnapshot) -> bool {
        self.transition(|state| {
            if state.contains(kind, game.id) {
                None
            } else {
                Some(CollectionAction::add(kind, FavoriteEntry::capture(game)))
            }
        })
    }

    pub fn remove(&self, kind: CollectionKind, id: CatalogId) -> bool {
        self.transition(|_| Some(CollectionAction::remove(kind, id)))
    }

    pub fn toggle(&self, kind: CollectionKind, game: GameSnapshot) -> bool {
        let id = game.id;
        let mut member = false;
        self.transition(|state| {
            if state.contains(kind, id) {
                Some(CollectionAction::remove(kind, id))
            } else {
                member = true;
                Some(CollectionAction::add(kind, FavoriteEntry::capture(game)))
            }
        });
        member
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_favorite(&self, id: CatalogId) -> bool {
        self.contains(CollectionKind::Favorites, id)
    }

    pub fn is_in_wishlist(&self, id: CatalogId) -> bool {
        self.contains(CollectionKind::Wishlist, id)
    }

    pub fn contains(&self, kind: CollectionKind, id: CatalogId) -> bool {
        self.read_state().contains(kind, id)
    }

    pub fn total_favorites(&self) -> usize {
        self.total(CollectionKind::Favorites)
    }

    pub fn total_wishlist(&self) -> usize {
        self.total(CollectionKind::Wishlist)
    }

    pub fn total(&self, kind: CollectionKind) -> usize {
        self.read_state().len(kind)
    }

    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.entries(CollectionKind::Favorites)
    }

    pub fn wishlist(&self) -> Vec<FavoriteEntry> {
        self.entries(CollectionKind::Wishlist)
    }

    pub fn entries(&self, kind: CollectionKind) -> Vec<FavoriteEntry> {
        self.read_state().entries(kind).to_vec()
    }

    pub fn favorite(&self, id: CatalogId) -> Option<FavoriteEntry> {
        self.read_state().get(CollectionKind::Favorites, id).cloned()
    }

    pub fn wishlist_entry(&self, id: CatalogId) -> Option<FavoriteEntry> {
        self.read_state().get(CollectionKind::Wishlist, id).cloned()
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> CollectionState {
        self.read_state().clone()
    }

    // ========================================================================
    // INTERNAL: transition + persistence
    // ========================================================================

    /// Decide and apply one action under a single write lock.
    ///
    /// Returns true when membership changed.
    fn transition<F>(&self, decide: F) -> bool
    where
        F: FnOnce(&CollectionState) -> Option<CollectionAction>,
    {
        let (changes, failures) = {
            let mut state = self.write_state();
            let Some(action) = decide(&state) else {
                return false;
            };
            log::debug!("Applying {}", action.name());

            let next = reduce(state.clone(), action.clone());
            let favorites_changed = next.favorites != state.favorites;
            let wishlist_changed = next.wishlist != state.wishlist;
            let previous = std::mem::replace(&mut *state, next);

            let changes = describe(&action, &previous, &state, favorites_changed || wishlist_changed);
            let failures = self.persist(&state, favorites_changed, wishlist_changed);
            (changes, failures)
        };

        let changed = !changes.is_empty();
        for failure in failures {
            self.event_bus.emit(failure);
        }
        for change in changes {
            self.publish(change);
        }
        changed
    }

    fn persist(
        &self,
        state: &CollectionState,
        favorites_changed: bool,
        wishlist_changed: bool,
    ) -> Vec<StorageFailed> {
        let mut failures = Vec::new();

        for (kind, changed) in [
            (CollectionKind::Favorites, favorites_changed),
            (CollectionKind::Wishlist, wishlist_changed),
        ] {
            if !changed {
                continue;
            }
            let key = storage_key(kind);

            let encoded = match serde_json::to_string(state.entries(kind)) {
                Ok(encoded) => encoded,
                Err(e) => {
                    log::error!("Error encoding {}: {}", kind, e);
                    failures.push(StorageFailed::new(
                        StorageOperation::Encode,
                        key.to_string(),
                        Some(kind),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            if let Err(e) = self.storage.set(key, &encoded) {
                log::error!("Error saving {} to storage: {}", kind, e);
                failures.push(StorageFailed::new(
                    StorageOperation::Write,
                    key.to_string(),
                    Some(kind),
                    e.to_string(),
                ));
            }
        }

        failures
    }

    fn publish(&self, change: Change) {
        match change {
            Change::Added(CollectionKind::Favorites, id, name, total) => {
                self.event_bus.emit(FavoriteAdded::new(id, name, total))
            }
            Change::Added(CollectionKind::Wishlist, id, name, total) => {
                self.event_bus.emit(WishlistAdded::new(id, name, total))
            }
            Change::Removed(CollectionKind::Favorites, id, total) => {
                self.event_bus.emit(FavoriteRemoved::new(id, total))
            }
            Change::Removed(CollectionKind::Wishlist, id, total) => {
                self.event_bus.emit(WishlistRemoved::new(id, total))
            }
            Change::Cleared(favorites, wishlist) => {
                self.event_bus.emit(CollectionsCleared::new(favorites, wishlist))
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CollectionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CollectionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn describe(
    action: &CollectionAction,
    previous: &CollectionState,
    current: &CollectionState,
    changed: bool,
) -> Vec<Change> {
    if !changed {
        return Vec::new();
    }

    match action {
        CollectionAction::AddFavorite(entry) => vec![Change::Added(
            CollectionKind::Favorites,
            entry.id,
            entry.name.clone(),
            current.favorites.len(),
        )],
        CollectionAction::AddWishlist(entry) => vec![Change::Added(
            CollectionKind::Wishlist,
            entry.id,
            entry.name.clone(),
            current.wishlist.len(),
        )],
        CollectionAction::RemoveFavorite(id) => vec![Change::Removed(
            CollectionKind::Favorites,
            *id,
            current.favorites.len(),
        )],
        CollectionAction::RemoveWishlist(id) => vec![Change::Removed(
            CollectionKind::Wishlist,
            *id,
            current.wishlist.len(),
        )],
        CollectionAction::ClearAll => vec![Change::Cleared(
            previous.favorites.len(),
            previous.wishlist.len(),
        )],
        // Hydration reports through CollectionsHydrated
        CollectionAction::Load(_) => Vec::new(),
    }
}
