//! Artist record types
//!
//! Records the dashboard reads from its managed database. Field presence is
//! enforced on deserialization:
//! - plain fields are required and non-null
//! - "optional" fields may be absent but not `null`
//! - "nullable" fields must be present but may be `null`
//! - "nullable, optional" fields may be absent or `null`

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Absent is `None`, `null` is rejected
mod optional {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        T::deserialize(deserializer).map(Some)
    }
}

/// Must be present, `null` is `None`
mod nullable {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, deserialize_with = "optional::deserialize")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional::deserialize")]
    pub is_complete: Option<bool>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub rank: Option<f64>,
    #[serde(default)]
    pub rank_change: Option<f64>,
    #[serde(default)]
    pub last_rank_update: Option<String>,
    pub bio: String,
    pub gender: String,
    pub country: String,
    pub birth_date: String,
    pub image_url: String,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub genres: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPlatform {
    Spotify,
    Youtube,
    Lastfm,
    Musicbrainz,
}

/// An artist's id on an external platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistPlatformId {
    pub id: String,
    pub artist_id: String,
    pub platform: IdPlatform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlPlatform {
    Lastfm,
    Spotify,
    Youtube,
    Instagram,
    Tiktok,
    Facebook,
    Viberate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistUrl {
    pub artist_id: String,
    pub platform: UrlPlatform,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Followers,
    Views,
    Likes,
    Subscribers,
    MonthlyListeners,
    DailyViewCount,
    DailyStreamCount,
    TotalViews,
    TotalStreams,
}

/// One dated metric sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistMetric {
    pub id: String,
    #[serde(default, deserialize_with = "optional::deserialize")]
    pub artist_id: Option<String>,
    pub date: String,
    pub platform: String,
    pub metric_type: MetricType,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackPlatform {
    Spotify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub track_id: String,
    #[serde(default, deserialize_with = "optional::deserialize")]
    pub platform: Option<TrackPlatform>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub stream_count_total: Option<f64>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub stream_count_daily: Option<f64>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub thumbnail_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPlatform {
    Youtube,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub video_id: String,
    #[serde(default, deserialize_with = "optional::deserialize")]
    pub platform: Option<VideoPlatform>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub view_count: Option<f64>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub daily_view_count: Option<f64>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "nullable::deserialize")]
    pub published_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistTrack {
    pub artist_id: String,
    pub track_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistVideo {
    pub artist_id: String,
    pub video_id: String,
}

/// Names each record schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Artist,
    PlatformIds,
    Urls,
    Metrics,
    Tracks,
    Videos,
    ArtistTracks,
    ArtistVideos,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        RecordKind::Artist,
        RecordKind::PlatformIds,
        RecordKind::Urls,
        RecordKind::Metrics,
        RecordKind::Tracks,
        RecordKind::Videos,
        RecordKind::ArtistTracks,
        RecordKind::ArtistVideos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Artist => "artist",
            RecordKind::PlatformIds => "platform-ids",
            RecordKind::Urls => "urls",
            RecordKind::Metrics => "metrics",
            RecordKind::Tracks => "tracks",
            RecordKind::Videos => "videos",
            RecordKind::ArtistTracks => "artist-tracks",
            RecordKind::ArtistVideos => "artist-videos",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown record kind: {0}")]
    UnknownKind(String),

    #[error("invalid {kind} document: {source}")]
    Invalid {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Validates a JSON document against a record schema
///
/// `artist` documents are a single object, every other kind is an array.
/// Returns the number of records in the document.
pub fn validate(kind: RecordKind, json: &str) -> Result<usize, SchemaError> {
    fn count<T: for<'de> Deserialize<'de>>(json: &str) -> Result<usize, serde_json::Error> {
        serde_json::from_str::<Vec<T>>(json).map(|records| records.len())
    }

    let result = match kind {
        RecordKind::Artist => serde_json::from_str::<Artist>(json).map(|_| 1),
        RecordKind::PlatformIds => count::<ArtistPlatformId>(json),
        RecordKind::Urls => count::<ArtistUrl>(json),
        RecordKind::Metrics => count::<ArtistMetric>(json),
        RecordKind::Tracks => count::<Track>(json),
        RecordKind::Videos => count::<Video>(json),
        RecordKind::ArtistTracks => count::<ArtistTrack>(json),
        RecordKind::ArtistVideos => count::<ArtistVideo>(json),
    };

    result.map_err(|source| SchemaError::Invalid { kind, source })
}
