//! Critical Favorites Invariants:
//!
//! 1. Within one sequence an id appears at most once
//! 2. Adding an id already present leaves the state unchanged
//! 3. Insertion order is the iteration order
//! 4. Favorites and wishlist are independent of each other
//! 5. `added_at` is set once, when the entry is created
//! 6. Only the store mutates the state, and only through `reduce`

pub mod entity;
pub mod state;

pub use entity::{FavoriteEntry, GameSnapshot};
pub use state::{reduce, CollectionAction, CollectionKind, CollectionState, PersistedCollections};

use std::collections::HashSet;

use crate::domain::{DomainError, DomainResult};

/// Validates the uniqueness invariant of both sequences
pub fn validate_collection_state(state: &CollectionState) -> DomainResult<()> {
    for kind in [CollectionKind::Favorites, CollectionKind::Wishlist] {
        let mut seen = HashSet::new();
        for entry in state.entries(kind) {
            if !seen.insert(entry.id) {
                return Err(DomainError::InvariantViolation(format!(
                    "Game {} appears more than once in {}",
                    entry.id, kind
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_state() {
        let mut state = CollectionState::empty();
        state = reduce(state, CollectionAction::AddFavorite(FavoriteEntry::capture(GameSnapshot::new(1, "a"))));
        state = reduce(state, CollectionAction::AddWishlist(FavoriteEntry::capture(GameSnapshot::new(1, "a"))));
        assert!(validate_collection_state(&state).is_ok());
    }

    #[test]
    fn test_duplicate_fails() {
        let entry = FavoriteEntry::capture(GameSnapshot::new(1, "a"));
        let state = CollectionState {
            favorites: Vec::new(),
            wishlist: vec![entry.clone(), entry],
        };
        let err = validate_collection_state(&state).unwrap_err();
        assert!(err.to_string().contains("wishlist"));
    }
}
