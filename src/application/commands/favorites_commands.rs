// src/application/commands/favorites_commands.rs
//
// Favorites & Wishlist Command Handlers
//
// RULES:
// - Adds fetch the game's details first so the stored entry is complete
// - Removes never touch the network
// - Storage failures are absorbed by the store, never returned here

use crate::application::{
    dto::*,
    error_handling::ToErrorResponse,
    state::AppState,
};
use crate::domain::{CatalogId, CollectionKind, GameSnapshot};

/// List favorites in insertion order
pub async fn list_favorites(state: &AppState) -> Result<Vec<FavoriteEntryDto>, String> {
    Ok(state.favorites.favorites().into_iter().map(FavoriteEntryDto::from).collect())
}

/// List wishlist in insertion order
pub async fn list_wishlist(state: &AppState) -> Result<Vec<FavoriteEntryDto>, String> {
    Ok(state.favorites.wishlist().into_iter().map(FavoriteEntryDto::from).collect())
}

pub async fn add_favorite(state: &AppState, game_id: CatalogId) -> Result<MembershipDto, String> {
    add_to(state, CollectionKind::Favorites, game_id).await
}

pub async fn remove_favorite(state: &AppState, game_id: CatalogId) -> Result<MembershipDto, String> {
    let changed = state.favorites.remove_favorite(game_id);
    Ok(membership(state, game_id, changed))
}

pub async fn toggle_favorite(state: &AppState, game_id: CatalogId) -> Result<MembershipDto, String> {
    toggle_in(state, CollectionKind::Favorites, game_id).await
}

pub async fn add_to_wishlist(state: &AppState, game_id: CatalogId) -> Result<MembershipDto, String> {
    add_to(state, CollectionKind::Wishlist, game_id).await
}

pub async fn remove_from_wishlist(
    state: &AppState,
    game_id: CatalogId,
) -> Result<MembershipDto, String> {
    let changed = state.favorites.remove_wishlist(game_id);
    Ok(membership(state, game_id, changed))
}

pub async fn toggle_wishlist(state: &AppState, game_id: CatalogId) -> Result<MembershipDto, String> {
    toggle_in(state, CollectionKind::Wishlist, game_id).await
}

/// Counts and ids of both collections
pub async fn get_collection_summary(state: &AppState) -> Result<CollectionSummaryDto, String> {
    Ok(CollectionSummaryDto::from_store(&state.favorites))
}

/// Empty both collections
pub async fn clear_collections(state: &AppState) -> Result<CollectionSummaryDto, String> {
    state.favorites.clear_all();
    Ok(CollectionSummaryDto::from_store(&state.favorites))
}

// ============================================================================
// HELPERS
// ============================================================================

async fn add_to(
    state: &AppState,
    kind: CollectionKind,
    game_id: CatalogId,
) -> Result<MembershipDto, String> {
    if state.favorites.contains(kind, game_id) {
        return Ok(membership(state, game_id, false));
    }

    let snapshot = fetch_snapshot(state, game_id).await?;
    let changed = state.favorites.add(kind, snapshot);
    Ok(membership(state, game_id, changed))
}

async fn toggle_in(
    state: &AppState,
    kind: CollectionKind,
    game_id: CatalogId,
) -> Result<MembershipDto, String> {
    if state.favorites.contains(kind, game_id) {
        let changed = state.favorites.remove(kind, game_id);
        return Ok(membership(state, game_id, changed));
    }

    // Membership was decided before the fetch; a concurrent add makes this a no-op
    let snapshot = fetch_snapshot(state, game_id).await?;
    let changed = state.favorites.add(kind, snapshot);
    Ok(membership(state, game_id, changed))
}

async fn fetch_snapshot(state: &AppState, game_id: CatalogId) -> Result<GameSnapshot, String> {
    let details = state.catalog.game_details(game_id).await.to_error_response()?;
    Ok(GameSnapshot::from(&details))
}

fn membership(state: &AppState, game_id: CatalogId, changed: bool) -> MembershipDto {
    MembershipDto {
        game_id,
        is_favorite: state.favorites.is_favorite(game_id),
        in_wishlist: state.favorites.is_in_wishlist(game_id),
        changed,
    }
}
