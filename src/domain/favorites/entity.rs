// src/domain/favorites/entity.rs

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CatalogId, Game, GameDetails, NamedRef, PlatformRef};

/// The fields of a game captured when it is favorited or wishlisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: CatalogId,
    pub name: String,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub genres: Option<Vec<NamedRef>>,
    pub platforms: Option<Vec<PlatformRef>>,
}

impl GameSnapshot {
    pub fn new(id: CatalogId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: None,
            rating: None,
            release_date: None,
            genres: None,
            platforms: None,
        }
    }
}

impl From<&Game> for GameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            image_url: game.background_image.clone(),
            rating: game.rating,
            release_date: game.released.clone(),
            genres: Some(game.genres.clone()),
            platforms: Some(game.platforms.clone()),
        }
    }
}

impl From<&GameDetails> for GameSnapshot {
    fn from(details: &GameDetails) -> Self {
        Self::from(&details.game)
    }
}

/// One favorited or wishlisted game
///
/// The persisted field names (`background_image`, `released`, `addedAt`)
/// match the shape stored by earlier releases so old data keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Catalog identifier, the entry's identity
    pub id: CatalogId,

    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "background_image")]
    pub image_url: Option<String>,

    /// Rating at the time the entry was added; never refreshed
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default, rename = "released")]
    pub release_date: Option<String>,

    #[serde(default)]
    pub genres: Option<Vec<NamedRef>>,

    #[serde(default)]
    pub platforms: Option<Vec<PlatformRef>>,

    /// Insertion timestamp, immutable once set
    #[serde(rename = "addedAt", with = "added_at_format")]
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn from_snapshot(snapshot: GameSnapshot, added_at: DateTime<Utc>) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            image_url: snapshot.image_url,
            rating: snapshot.rating,
            release_date: snapshot.release_date,
            genres: snapshot.genres,
            platforms: snapshot.platforms,
            added_at,
        }
    }

    /// Stamp a snapshot with the current time, to the millisecond
    pub fn capture(snapshot: GameSnapshot) -> Self {
        Self::from_snapshot(snapshot, Utc::now().trunc_subsecs(3))
    }
}

impl std::fmt::Display for FavoriteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{}", self.id)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// `addedAt` is stored as UTC with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`
mod added_at_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        DateTime::<Utc>::deserialize(deserializer)
    }
}
