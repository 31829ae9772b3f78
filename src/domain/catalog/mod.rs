//! Catalog value types.
//!
//! The catalog service is authoritative for every record here; nothing in
//! this module is ever persisted. Records are read-only snapshots of what the
//! service returned for one request.

pub mod entity;
pub mod query;

pub use entity::{
    CatalogId, Game, GameDetails, Genre, NamedRef, Page, Platform, PlatformRef, Screenshot,
    ShortScreenshot, Store, StoreRef, Trailer,
};
pub use query::{
    start_of_week, DateRange, GameOrdering, GameQuery, MetacriticRange, ReleaseWindow,
    TopCategory,
};
