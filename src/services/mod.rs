// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod favorites_service;


pub use catalog_service::{CatalogService, FetchOutcome};

pub use favorites_service::{storage_key, FavoritesStore, FAVORITES_KEY, WISHLIST_KEY};
