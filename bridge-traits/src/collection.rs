//! Remote Collection Abstractions
//!
//! Data model for remote playlists and the [`CollectionProvider`] contract that
//! every remote service connector implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Summary of a remote playlist.
///
/// `owned` gates every destructive operation. Connectors that cannot confirm
/// ownership from a listing must report `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: String,
    pub title: String,
    pub owned: bool,
    pub track_count: usize,
    pub year: Option<String>,
}

impl CollectionRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            owned: false,
            track_count: 0,
            year: None,
        }
    }

    pub fn with_owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }

    pub fn with_track_count(mut self, track_count: usize) -> Self {
        self.track_count = track_count;
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {} | ID: {} | Tracks: {} | year: {}",
            self.title,
            self.id,
            self.track_count,
            self.year.as_deref().unwrap_or("None")
        )
    }
}

/// Rating of a track by the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LikeStatus {
    Liked,
    NotLiked,
    Indifferent,
}

/// A track entry inside a playlist.
///
/// The same `id` may appear several times in one playlist; `entry_id`
/// identifies this particular occurrence when the service exposes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub like_status: LikeStatus,
    pub entry_id: Option<String>,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>, like_status: LikeStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            like_status,
            entry_id: None,
        }
    }

    pub fn with_entry_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "[unknown] ({})", self.id)
        } else {
            write!(f, "{}", self.title)
        }
    }
}

/// A fully fetched playlist: summary plus its ordered tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub collection: CollectionRef,
    pub tracks: Vec<Track>,
}

impl CollectionDetail {
    pub fn new(collection: CollectionRef, tracks: Vec<Track>) -> Self {
        Self { collection, tracks }
    }

    pub fn id(&self) -> &str {
        &self.collection.id
    }

    pub fn title(&self) -> &str {
        &self.collection.title
    }

    pub fn is_owned(&self) -> bool {
        self.collection.owned
    }
}

/// Remote collection service contract
///
/// Every method performs exactly one logical remote operation. Errors are
/// classified through [`BridgeError`](crate::error::BridgeError); write races
/// on the same playlist must be reported as `BridgeError::Conflict`.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::collection::CollectionProvider;
///
/// async fn count_tracks(provider: &dyn CollectionProvider) -> Result<usize> {
///     let refs = provider.list_collections().await?;
///     Ok(refs.iter().map(|r| r.track_count).sum())
/// }
/// ```
#[async_trait]
pub trait CollectionProvider: Send + Sync {
    /// List every playlist in the user's library.
    async fn list_collections(&self) -> Result<Vec<CollectionRef>>;

    /// Fetch a playlist with its tracks.
    ///
    /// `limit = None` fetches the entire track sequence.
    async fn get_collection_detail(&self, id: &str, limit: Option<usize>) -> Result<CollectionDetail>;

    /// Delete a playlist. Never retried by callers.
    async fn delete_collection(&self, id: &str) -> Result<()>;

    /// Remove one track entry from a playlist.
    async fn remove_track(&self, collection_id: &str, track: &Track) -> Result<()>;

    /// Set the user's rating of a track.
    async fn rate_track(&self, track: &Track, status: LikeStatus) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_ref_builder() {
        let collection = CollectionRef::new("PL1", "Road Trip")
            .with_owned(true)
            .with_track_count(12)
            .with_year("2021");

        assert_eq!(collection.id, "PL1");
        assert!(collection.owned);
        assert_eq!(collection.track_count, 12);
        assert_eq!(collection.year.as_deref(), Some("2021"));
    }

    #[test]
    fn test_collection_ref_display() {
        let collection = CollectionRef::new("PL1", "Road Trip").with_track_count(3);
        assert_eq!(
            collection.to_string(),
            "Title: Road Trip | ID: PL1 | Tracks: 3 | year: None"
        );
    }

    #[test]
    fn test_detail_accessors() {
        let detail = CollectionDetail::new(
            CollectionRef::new("PL2", "Focus").with_owned(true),
            vec![Track::new("v1", "Song", LikeStatus::Indifferent).with_entry_id("s1")],
        );

        assert_eq!(detail.id(), "PL2");
        assert_eq!(detail.title(), "Focus");
        assert!(detail.is_owned());
        assert_eq!(detail.tracks[0].entry_id.as_deref(), Some("s1"));
    }
}
