// src/domain/favorites/state.rs
//
// Favorites/wishlist state machine.
//
// `reduce` is a pure function of (state, action). Timestamps are stamped by
// whoever builds an add action, never here.

use serde::{Deserialize, Serialize};

use super::entity::FavoriteEntry;
use crate::domain::catalog::CatalogId;

/// Which of the two independent sequences an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Favorites,
    Wishlist,
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionKind::Favorites => write!(f, "favorites"),
            CollectionKind::Wishlist => write!(f, "wishlist"),
        }
    }
}

/// Both membership sequences, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionState {
    pub favorites: Vec<FavoriteEntry>,
    pub wishlist: Vec<FavoriteEntry>,
}

impl CollectionState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self, kind: CollectionKind) -> &[FavoriteEntry] {
        match kind {
            CollectionKind::Favorites => &self.favorites,
            CollectionKind::Wishlist => &self.wishlist,
        }
    }

    fn entries_mut(&mut self, kind: CollectionKind) -> &mut Vec<FavoriteEntry> {
        match kind {
            CollectionKind::Favorites => &mut self.favorites,
            CollectionKind::Wishlist => &mut self.wishlist,
        }
    }

    pub fn contains(&self, kind: CollectionKind, id: CatalogId) -> bool {
        self.entries(kind).iter().any(|entry| entry.id == id)
    }

    pub fn get(&self, kind: CollectionKind, id: CatalogId) -> Option<&FavoriteEntry> {
        self.entries(kind).iter().find(|entry| entry.id == id)
    }

    pub fn len(&self, kind: CollectionKind) -> usize {
        self.entries(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.wishlist.is_empty()
    }
}

/// Whatever storage held at startup; a missing sequence stays `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedCollections {
    pub favorites: Option<Vec<FavoriteEntry>>,
    pub wishlist: Option<Vec<FavoriteEntry>>,
}

impl PersistedCollections {
    pub fn is_empty(&self) -> bool {
        self.favorites.is_none() && self.wishlist.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction {
    AddFavorite(FavoriteEntry),
    RemoveFavorite(CatalogId),
    AddWishlist(FavoriteEntry),
    RemoveWishlist(CatalogId),
    Load(PersistedCollections),
    ClearAll,
}

impl CollectionAction {
    pub fn add(kind: CollectionKind, entry: FavoriteEntry) -> Self {
        match kind {
            CollectionKind::Favorites => CollectionAction::AddFavorite(entry),
            CollectionKind::Wishlist => CollectionAction::AddWishlist(entry),
        }
    }

    pub fn remove(kind: CollectionKind, id: CatalogId) -> Self {
        match kind {
            CollectionKind::Favorites => CollectionAction::RemoveFavorite(id),
            CollectionKind::Wishlist => CollectionAction::RemoveWishlist(id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollectionAction::AddFavorite(_) => "ADD_FAVORITE",
            CollectionAction::RemoveFavorite(_) => "REMOVE_FAVORITE",
            CollectionAction::AddWishlist(_) => "ADD_WISHLIST",
            CollectionAction::RemoveWishlist(_) => "REMOVE_WISHLIST",
            CollectionAction::Load(_) => "LOAD",
            CollectionAction::ClearAll => "CLEAR_ALL",
        }
    }
}

/// Apply one action to the state
pub fn reduce(mut state: CollectionState, action: CollectionAction) -> CollectionState {
    match action {
        CollectionAction::AddFavorite(entry) => insert(&mut state, CollectionKind::Favorites, entry),
        CollectionAction::AddWishlist(entry) => insert(&mut state, CollectionKind::Wishlist, entry),
        CollectionAction::RemoveFavorite(id) => remove(&mut state, CollectionKind::Favorites, id),
        CollectionAction::RemoveWishlist(id) => remove(&mut state, CollectionKind::Wishlist, id),
        CollectionAction::Load(persisted) => {
            if let Some(favorites) = persisted.favorites {
                state.favorites = dedup_by_id(favorites);
            }
            if let Some(wishlist) = persisted.wishlist {
                state.wishlist = dedup_by_id(wishlist);
            }
        }
        CollectionAction::ClearAll => state = CollectionState::empty(),
    }
    state
}

fn insert(state: &mut CollectionState, kind: CollectionKind, entry: FavoriteEntry) {
    if !state.contains(kind, entry.id) {
        state.entries_mut(kind).push(entry);
    }
}

fn remove(state: &mut CollectionState, kind: CollectionKind, id: CatalogId) {
    state.entries_mut(kind).retain(|entry| entry.id != id);
}

// First occurrence wins, order otherwise untouched
fn dedup_by_id(entries: Vec<FavoriteEntry>) -> Vec<FavoriteEntry> {
    let mut seen = std::collections::HashSet::with_capacity(entries.len());
    entries.into_iter().filter(|entry| seen.insert(entry.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::favorites::GameSnapshot;

    fn entry(id: CatalogId, name: &str) -> FavoriteEntry {
        FavoriteEntry::capture(GameSnapshot::new(id, name))
    }

    fn ids(entries: &[FavoriteEntry]) -> Vec<CatalogId> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut state = CollectionState::empty();
        for id in [5, 1, 9, 3] {
            state = reduce(state, CollectionAction::AddFavorite(entry(id, "game")));
        }
        assert_eq!(ids(&state.favorites), vec![5, 1, 9, 3]);
    }

    #[test]
    fn test_duplicate_add_returns_unchanged_state() {
        let state = reduce(CollectionState::empty(), CollectionAction::AddFavorite(entry(1, "Foo")));
        let again = reduce(state.clone(), CollectionAction::AddFavorite(entry(1, "Foo renamed")));

        assert_eq!(again, state);
        assert_eq!(again.favorites[0].name, "Foo");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut state = CollectionState::empty();
        state = reduce(state, CollectionAction::AddFavorite(entry(1, "a")));
        state = reduce(state, CollectionAction::AddFavorite(entry(2, "b")));

        let after = reduce(state.clone(), CollectionAction::RemoveFavorite(99));
        assert_eq!(after, state);
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut state = CollectionState::empty();
        for id in [1, 2, 3] {
            state = reduce(state, CollectionAction::AddWishlist(entry(id, "w")));
        }
        state = reduce(state, CollectionAction::RemoveWishlist(2));
        assert_eq!(ids(&state.wishlist), vec![1, 3]);
    }

    #[test]
    fn test_sequences_are_independent() {
        let mut state = CollectionState::empty();
        state = reduce(state, CollectionAction::AddFavorite(entry(1, "Foo")));
        state = reduce(state, CollectionAction::AddWishlist(entry(1, "Foo")));
        assert!(state.contains(CollectionKind::Favorites, 1));
        assert!(state.contains(CollectionKind::Wishlist, 1));

        state = reduce(state, CollectionAction::RemoveFavorite(1));
        assert!(!state.contains(CollectionKind::Favorites, 1));
        assert!(state.contains(CollectionKind::Wishlist, 1));
    }

    #[test]
    fn test_load_merges_only_present_fields() {
        let mut state = CollectionState::empty();
        state = reduce(state, CollectionAction::AddWishlist(entry(8, "kept")));

        let persisted = PersistedCollections {
            favorites: Some(vec![entry(1, "a"), entry(2, "b")]),
            wishlist: None,
        };
        state = reduce(state, CollectionAction::Load(persisted));

        assert_eq!(ids(&state.favorites), vec![1, 2]);
        assert_eq!(ids(&state.wishlist), vec![8]);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let persisted = PersistedCollections {
            favorites: Some(vec![entry(1, "first"), entry(2, "b"), entry(1, "second")]),
            wishlist: Some(Vec::new()),
        };
        let state = reduce(CollectionState::empty(), CollectionAction::Load(persisted));

        assert_eq!(ids(&state.favorites), vec![1, 2]);
        assert_eq!(state.favorites[0].name, "first");
    }

    #[test]
    fn test_clear_all() {
        let mut state = CollectionState::empty();
        state = reduce(state, CollectionAction::AddFavorite(entry(1, "a")));
        state = reduce(state, CollectionAction::AddWishlist(entry(2, "b")));
        state = reduce(state, CollectionAction::ClearAll);

        assert!(state.is_empty());
        assert_eq!(state.len(CollectionKind::Favorites), 0);
        assert_eq!(state.len(CollectionKind::Wishlist), 0);
    }

    #[test]
    fn test_action_helpers() {
        let action = CollectionAction::remove(CollectionKind::Wishlist, 3);
        assert_eq!(action, CollectionAction::RemoveWishlist(3));
        assert_eq!(action.name(), "REMOVE_WISHLIST");
        assert_eq!(CollectionAction::ClearAll.name(), "CLEAR_ALL");
    }
}
